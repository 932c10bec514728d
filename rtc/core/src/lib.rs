#![no_std]
#![forbid(unsafe_code)]

//! # RTC Core
//!
//! Core types shared by the real-time-clock driver and its callers: the
//! seconds/nanoseconds time value, the driver configuration and the error
//! taxonomy. Nothing in here touches hardware.

use core::fmt;

use hal::HalError;

pub mod config;
pub mod time;

pub use config::*;
pub use time::*;

#[cfg(feature = "std")]
extern crate std;

/// RTC core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the RTC driver
pub type RtcResult<T> = Result<T, RtcError>;

/// Error types for RTC operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    /// An alarm is already armed
    Busy,
    /// No alarm is pending
    NoAlarm,
    /// The driver was configured without an alarm interrupt line
    AlarmUnavailable,
    /// `initialize` already ran on this driver
    AlreadyInitialized,
    /// Operation issued before `initialize`
    NotInitialized,
    /// Nanoseconds field out of range
    InvalidTime,
    /// Configuration rejected
    InvalidConfig,
    /// A collaborator (clock gate, interrupt controller) failed
    Hal(HalError),
}

impl RtcError {
    /// Negated errno equivalent, for callers that speak C return codes.
    pub const fn errno(self) -> i32 {
        match self {
            RtcError::Busy => -16,
            RtcError::NoAlarm => -61,
            RtcError::AlarmUnavailable => -38,
            RtcError::AlreadyInitialized => -114,
            RtcError::NotInitialized => -11,
            RtcError::InvalidTime | RtcError::InvalidConfig => -22,
            RtcError::Hal(_) => -5,
        }
    }
}

impl From<HalError> for RtcError {
    fn from(err: HalError) -> Self {
        RtcError::Hal(err)
    }
}

impl fmt::Display for RtcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtcError::Busy => write!(f, "Alarm already armed"),
            RtcError::NoAlarm => write!(f, "No alarm pending"),
            RtcError::AlarmUnavailable => write!(f, "Alarm interrupt not configured"),
            RtcError::AlreadyInitialized => write!(f, "RTC already initialized"),
            RtcError::NotInitialized => write!(f, "RTC not initialized"),
            RtcError::InvalidTime => write!(f, "Invalid time value"),
            RtcError::InvalidConfig => write!(f, "Invalid RTC configuration"),
            RtcError::Hal(err) => write!(f, "Collaborator failure: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RtcError {}

#[cfg(feature = "defmt")]
impl defmt::Format for RtcError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RtcError::Busy => defmt::write!(fmt, "Busy"),
            RtcError::NoAlarm => defmt::write!(fmt, "NoAlarm"),
            RtcError::AlarmUnavailable => defmt::write!(fmt, "AlarmUnavailable"),
            RtcError::AlreadyInitialized => defmt::write!(fmt, "AlreadyInitialized"),
            RtcError::NotInitialized => defmt::write!(fmt, "NotInitialized"),
            RtcError::InvalidTime => defmt::write!(fmt, "InvalidTime"),
            RtcError::InvalidConfig => defmt::write!(fmt, "InvalidConfig"),
            RtcError::Hal(err) => defmt::write!(fmt, "Hal({})", err),
        }
    }
}
