//! Interrupt controller abstraction

use crate::error::HalResult;

/// Interrupt priority (0 = highest on most platforms)
pub type InterruptPriority = u8;

/// Interrupt line number as seen by the controller
pub type IrqNumber = u16;

/// Handler invoked by the platform's interrupt dispatch.
///
/// Runs in interrupt context. Implementations must not block and must not
/// try to acquire a lock that mainline code could be holding outside a
/// masked critical section, or mainline and handler deadlock.
pub trait IrqHandler: Sync {
    /// Service interrupt `irq`
    fn handle(&self, irq: IrqNumber);
}

/// Interrupt controller abstraction
pub trait InterruptController: Send + Sync {
    /// Attach a handler to an interrupt line
    fn attach(&mut self, irq: IrqNumber, handler: &'static dyn IrqHandler) -> HalResult<()>;

    /// Remove the handler attached to an interrupt line
    fn detach(&mut self, irq: IrqNumber) -> HalResult<()>;

    /// Enable interrupt
    fn enable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()>;

    /// Disable interrupt
    fn disable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()>;

    /// Set interrupt priority
    fn set_priority(&mut self, irq: IrqNumber, priority: InterruptPriority) -> HalResult<()>;

    /// Check if interrupt is pending
    fn is_pending(&self, irq: IrqNumber) -> bool;

    /// Clear pending interrupt
    fn clear_pending(&mut self, irq: IrqNumber) -> HalResult<()>;
}
