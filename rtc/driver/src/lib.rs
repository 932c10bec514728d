//! # rtc-driver
//!
//! Time keeping and a single-slot alarm for a seconds + prescaler RTC block.
//!
//! ## Module Overview
//! - [`regs`]   – register surface and the memory-mapped block.
//! - [`clock`]  – race-free counter reads and ordered writes.
//! - [`alarm`]  – the one pending alarm, shared with the interrupt.
//! - [`irq`]    – alarm match entry point.
//! - [`driver`] – [`Rtc`], the facade the OS clock subsystem calls.
//! - `nvic`     – Cortex-M interrupt controller binding (`cortex-m` feature).
//!
//! Mainline code and the match interrupt share the alarm slot and the alarm
//! registers; all of it is guarded by `critical-section`, which on the
//! target masks interrupts.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

use core::sync::atomic::{AtomicBool, Ordering};

pub mod alarm;
pub mod clock;
pub mod driver;
pub mod irq;
#[cfg(feature = "cortex-m")]
pub mod nvic;
pub mod regs;

pub use alarm::{AlarmCallback, AlarmScheduler};
pub use clock::ClockCore;
pub use driver::Rtc;
pub use irq::{service_alarm, AlarmMatchHandler};
pub use regs::{Register, RtcBlock, RtcRegisters};
pub use rtc_core::{OscillatorLoad, RtcConfig, RtcError, RtcResult, Timespec};

#[cfg(test)]
mod tests;

static RTC_ENABLED: AtomicBool = AtomicBool::new(false);

/// True once an RTC has been initialized and is counting
pub fn is_enabled() -> bool {
    RTC_ENABLED.load(Ordering::Acquire)
}

fn set_enabled() {
    RTC_ENABLED.store(true, Ordering::Release);
}
