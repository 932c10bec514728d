//! Driver configuration and its builder

use core::ops::BitOr;

use hal::{InterruptPriority, IrqNumber};

use crate::{RtcError, RtcResult};

/// Default prescaler frequency: a 32.768 kHz watch crystal
pub const DEFAULT_FREQUENCY_HZ: u32 = 32_768;

/// Load capacitance switched onto the oscillator pins.
///
/// Values combine with `|`; the default (16 pF + 4 pF) matches the common
/// 12.5 pF crystals used on evaluation boards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OscillatorLoad(u8);

impl OscillatorLoad {
    /// No extra load
    pub const NONE: Self = Self(0);
    /// 2 pF
    pub const PF2: Self = Self(1 << 0);
    /// 4 pF
    pub const PF4: Self = Self(1 << 1);
    /// 8 pF
    pub const PF8: Self = Self(1 << 2);
    /// 16 pF
    pub const PF16: Self = Self(1 << 3);

    /// Raw selection mask, bit 0 = 2 pF through bit 3 = 16 pF
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every capacitor in `other` is selected
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Total added capacitance in picofarads
    pub const fn picofarads(self) -> u8 {
        let mut total = 0;
        if self.contains(Self::PF2) {
            total += 2;
        }
        if self.contains(Self::PF4) {
            total += 4;
        }
        if self.contains(Self::PF8) {
            total += 8;
        }
        if self.contains(Self::PF16) {
            total += 16;
        }
        total
    }
}

impl BitOr for OscillatorLoad {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Interrupt line used for the alarm match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmIrq {
    pub irq: IrqNumber,
    pub priority: InterruptPriority,
}

/// RTC driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcConfig {
    /// Prescaler ticks per second
    pub frequency_hz: u32,
    /// Oscillator load capacitance
    pub oscillator_load: OscillatorLoad,
    /// Read the prescaler along with the seconds register
    pub high_resolution: bool,
    /// Alarm interrupt line; `None` builds a driver without alarm support
    pub alarm_irq: Option<AlarmIrq>,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            oscillator_load: OscillatorLoad::PF16 | OscillatorLoad::PF4,
            high_resolution: true,
            alarm_irq: None,
        }
    }
}

impl RtcConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RtcConfigBuilder {
        RtcConfigBuilder::default()
    }

    /// Checks the configuration before it reaches hardware.
    pub fn validate(&self) -> RtcResult<()> {
        if self.frequency_hz == 0 {
            return Err(RtcError::InvalidConfig);
        }
        Ok(())
    }
}

/// Builder for ergonomic RTC configuration construction.
#[derive(Debug, Clone, Default)]
pub struct RtcConfigBuilder {
    config: RtcConfig,
}

impl RtcConfigBuilder {
    /// Sets the prescaler frequency.
    pub fn frequency_hz(mut self, hz: u32) -> Self {
        self.config.frequency_hz = hz;
        self
    }

    /// Sets the oscillator load capacitance.
    pub fn oscillator_load(mut self, load: OscillatorLoad) -> Self {
        self.config.oscillator_load = load;
        self
    }

    /// Selects between prescaler-resolution reads and seconds-only reads.
    pub fn high_resolution(mut self, enabled: bool) -> Self {
        self.config.high_resolution = enabled;
        self
    }

    /// Enables alarm support on interrupt line `irq`.
    pub fn alarm_irq(mut self, irq: IrqNumber, priority: InterruptPriority) -> Self {
        self.config.alarm_irq = Some(AlarmIrq { irq, priority });
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> RtcConfig {
        self.config
    }
}
