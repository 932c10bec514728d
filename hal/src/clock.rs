//! Peripheral clock gating

use crate::error::HalResult;

/// Gate that supplies the bus clock to a peripheral block.
///
/// Called once while the owning driver initializes. Implementations are
/// expected to be idempotent: enabling an already running gate is not an
/// error.
pub trait ClockGate {
    /// Enable the clock for the peripheral
    fn enable(&mut self) -> HalResult<()>;
}
