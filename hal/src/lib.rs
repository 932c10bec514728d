//! Hardware Abstraction Layer (HAL) for the RTC driver
//!
//! This crate provides the vendor-agnostic collaborator traits the RTC core
//! consumes: the peripheral clock gate and the interrupt controller. Board
//! support packages implement them; the driver never touches SIM or NVIC
//! registers directly.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod clock;
pub mod error;
pub mod interrupt;

// Re-export commonly used types
pub use clock::ClockGate;
pub use error::{HalError, HalResult};
pub use interrupt::{InterruptController, InterruptPriority, IrqHandler, IrqNumber};
