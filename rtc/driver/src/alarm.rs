//! Single-slot alarm
//!
//! The slot and the alarm registers are shared with the match interrupt, so
//! every access happens inside `critical_section::with`. Outside a critical
//! section the slot is occupied exactly when TAIE is set and TAR holds the
//! occupant's deadline.

use alloc::boxed::Box;
use core::cell::RefCell;

use critical_section::{CriticalSection, Mutex};
use log::{debug, warn};
use rtc_core::{RtcError, RtcResult};

use crate::regs::{ier, Register, RtcRegisters};

/// Callback run once, in interrupt context, when the alarm matches
pub type AlarmCallback = Box<dyn FnOnce() + Send + 'static>;

/// Owner of the pending-alarm slot
pub struct AlarmScheduler {
    slot: Mutex<RefCell<Option<AlarmCallback>>>,
}

impl Default for AlarmScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmScheduler {
    /// Create an idle scheduler
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Arm the alarm for the absolute second `deadline`.
    ///
    /// Fails with [`RtcError::Busy`] if an alarm is already armed; the
    /// existing deadline and callback are left alone.
    pub fn set_alarm<R: RtcRegisters>(
        &self,
        regs: &R,
        deadline: u32,
        callback: AlarmCallback,
    ) -> RtcResult<()> {
        critical_section::with(|cs| self.arm(cs, regs, deadline, callback))
    }

    /// Arm the alarm `delta` seconds after the current TSR value.
    ///
    /// The counter is sampled inside the same critical section that arms the
    /// slot. Returns the programmed deadline.
    pub fn set_alarm_in<R: RtcRegisters>(
        &self,
        regs: &R,
        delta: u32,
        callback: AlarmCallback,
    ) -> RtcResult<u32> {
        critical_section::with(|cs| {
            let deadline = regs.read(Register::Tsr).wrapping_add(delta);
            self.arm(cs, regs, deadline, callback)?;
            Ok(deadline)
        })
    }

    /// Disarm the pending alarm without running its callback.
    ///
    /// TAR keeps the stale deadline; with TAIE clear it cannot fire and the
    /// next arm overwrites it.
    pub fn cancel_alarm<R: RtcRegisters>(&self, regs: &R) -> RtcResult<()> {
        let cancelled = critical_section::with(|cs| {
            let callback = self.slot.borrow_ref_mut(cs).take();
            if callback.is_some() {
                regs.modify(Register::Ier, |v| v & !ier::TAIE);
            }
            callback
        });

        match cancelled {
            Some(callback) => {
                // dropped outside the critical section
                drop(callback);
                debug!("alarm cancelled");
                Ok(())
            }
            None => {
                warn!("cancel requested with no alarm pending");
                Err(RtcError::NoAlarm)
            }
        }
    }

    /// True while an alarm is armed
    pub fn is_armed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }

    /// Deadline of the armed alarm
    pub fn deadline<R: RtcRegisters>(&self, regs: &R) -> Option<u32> {
        critical_section::with(|cs| {
            self.slot
                .borrow_ref(cs)
                .as_ref()
                .map(|_| regs.read(Register::Tar))
        })
    }

    /// Firing transition: empty the slot and quiesce the alarm hardware.
    ///
    /// Cleanup runs whether or not the slot was occupied, so a spurious or
    /// already-cancelled match still leaves TAR zeroed and TAIE clear.
    pub(crate) fn take_for_fire<R: RtcRegisters>(&self, regs: &R) -> Option<AlarmCallback> {
        critical_section::with(|cs| {
            let callback = self.slot.borrow_ref_mut(cs).take();
            regs.write(Register::Tar, 0);
            regs.modify(Register::Ier, |v| v & !ier::TAIE);
            callback
        })
    }

    fn arm<R: RtcRegisters>(
        &self,
        cs: CriticalSection<'_>,
        regs: &R,
        deadline: u32,
        callback: AlarmCallback,
    ) -> RtcResult<()> {
        let mut slot = self.slot.borrow_ref_mut(cs);
        if slot.is_some() {
            warn!("alarm for {} rejected, slot busy", deadline);
            return Err(RtcError::Busy);
        }

        *slot = Some(callback);
        // TAR first: the write also clears a stale TAF before TAIE goes on
        regs.write(Register::Tar, deadline);
        regs.modify(Register::Ier, |v| v | ier::TAIE);
        debug!("alarm armed for second {}", deadline);
        Ok(())
    }
}
