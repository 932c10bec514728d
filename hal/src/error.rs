//! Common error types for HAL operations

use core::fmt;

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Interrupt line or priority out of range
    InvalidParameter,
    /// Interrupt line already has a handler attached
    AlreadyAttached,
    /// No room left in the handler table
    TableFull,
    /// Peripheral clock could not be enabled
    ClockGateFailed,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::AlreadyAttached => write!(f, "interrupt handler already attached"),
            Self::TableFull => write!(f, "interrupt handler table full"),
            Self::ClockGateFailed => write!(f, "peripheral clock gate failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidParameter => defmt::write!(fmt, "InvalidParameter"),
            Self::AlreadyAttached => defmt::write!(fmt, "AlreadyAttached"),
            Self::TableFull => defmt::write!(fmt, "TableFull"),
            Self::ClockGateFailed => defmt::write!(fmt, "ClockGateFailed"),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;
