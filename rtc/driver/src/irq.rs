//! Alarm match interrupt entry point

use hal::{IrqHandler, IrqNumber};
use log::{debug, warn};

use crate::alarm::AlarmScheduler;
use crate::driver::Rtc;
use crate::regs::RtcRegisters;

/// Handler for the hardware alarm match.
///
/// Called in interrupt context when TSR equals TAR with TAIE set.
/// Implementations must not block and must not take a lock that mainline
/// code may hold outside a masked critical section.
pub trait AlarmMatchHandler: Sync {
    /// Service one alarm match
    fn on_alarm_match(&self);
}

/// Run the firing transition for `alarm`.
///
/// The callback is invoked after the critical section is released, with the
/// slot already idle, so it may arm the next alarm itself.
pub fn service_alarm<R: RtcRegisters>(alarm: &AlarmScheduler, regs: &R) {
    match alarm.take_for_fire(regs) {
        Some(callback) => {
            debug!("alarm fired");
            callback();
        }
        None => warn!("alarm match with no alarm armed"),
    }
}

impl<R: RtcRegisters> AlarmMatchHandler for Rtc<R> {
    fn on_alarm_match(&self) {
        service_alarm(self.scheduler(), self.registers());
    }
}

impl<R: RtcRegisters> IrqHandler for Rtc<R> {
    fn handle(&self, irq: IrqNumber) {
        match self.config().alarm_irq {
            Some(line) if line.irq == irq => self.on_alarm_match(),
            _ => warn!("rtc handler invoked for foreign irq {}", irq),
        }
    }
}
