//! Time values and prescaler tick conversion

use core::fmt;
use crate::{RtcError, RtcResult};

/// Nanoseconds per second
pub const NSEC_PER_SEC: u32 = 1_000_000_000;

/// Convert a prescaler tick count to nanoseconds at `frequency_hz`.
///
/// Computed in 64 bits so no precision is lost to a pre-divided tick period.
/// A prescaler counts below `frequency_hz`; larger `ticks` saturate at the
/// last nanosecond of the second.
pub const fn ticks_to_nanos(ticks: u32, frequency_hz: u32) -> u32 {
    if ticks >= frequency_hz {
        return NSEC_PER_SEC - 1;
    }
    ((ticks as u64 * NSEC_PER_SEC as u64) / frequency_hz as u64) as u32
}

/// Convert nanoseconds to a prescaler tick count at `frequency_hz`.
pub const fn nanos_to_ticks(nanos: u32, frequency_hz: u32) -> u32 {
    ((nanos as u64 * frequency_hz as u64) / NSEC_PER_SEC as u64) as u32
}

/// Wall-clock time as whole seconds plus a sub-second part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
    seconds: u32,
    nanoseconds: u32,
}

impl Timespec {
    /// The counter's reference point
    pub const ZERO: Self = Self { seconds: 0, nanoseconds: 0 };

    /// Create a time value, rejecting a sub-second part of one second or more
    pub const fn new(seconds: u32, nanoseconds: u32) -> RtcResult<Self> {
        if nanoseconds >= NSEC_PER_SEC {
            Err(RtcError::InvalidTime)
        } else {
            Ok(Self { seconds, nanoseconds })
        }
    }

    /// Whole seconds, no sub-second part
    pub const fn from_secs(seconds: u32) -> Self {
        Self { seconds, nanoseconds: 0 }
    }

    /// Build from a seconds register value and a prescaler value.
    ///
    /// The sub-second part stays below one second even for an out-of-range
    /// prescaler value (see [`ticks_to_nanos`]).
    pub const fn from_ticks(seconds: u32, ticks: u32, frequency_hz: u32) -> Self {
        Self {
            seconds,
            nanoseconds: ticks_to_nanos(ticks, frequency_hz),
        }
    }

    /// Seconds component
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Nanoseconds component, always below one second
    pub const fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Sub-second part expressed as prescaler ticks
    pub const fn ticks(&self, frequency_hz: u32) -> u32 {
        nanos_to_ticks(self.nanoseconds, frequency_hz)
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.seconds, self.nanoseconds)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Timespec {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}s+{}ns", self.seconds, self.nanoseconds);
    }
}
