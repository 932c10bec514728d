//! Driver facade used by the OS clock subsystem

use core::cell::Cell;

use alloc::boxed::Box;
use critical_section::Mutex;
use hal::{ClockGate, InterruptController, IrqHandler};
use log::{info, warn};
use rtc_core::{AlarmIrq, RtcConfig, RtcError, RtcResult, Timespec};

use crate::alarm::AlarmScheduler;
use crate::clock::ClockCore;
use crate::regs::RtcRegisters;

/// RTC driver: clock counter plus the single alarm slot
pub struct Rtc<R> {
    clock: ClockCore<R>,
    alarm: AlarmScheduler,
    config: RtcConfig,
    initialized: Mutex<Cell<bool>>,
}

impl<R: RtcRegisters> Rtc<R> {
    /// Create a driver over `regs`. Nothing touches hardware until
    /// [`Rtc::initialize`].
    pub const fn new(regs: R, config: RtcConfig) -> Self {
        Self {
            clock: ClockCore::new(regs, config.frequency_hz),
            alarm: AlarmScheduler::new(),
            config,
            initialized: Mutex::new(Cell::new(false)),
        }
    }

    /// Bring up the peripheral. Runs once per driver; later calls return
    /// [`RtcError::AlreadyInitialized`] without touching hardware.
    ///
    /// When the configuration names an alarm line, the driver attaches itself
    /// as that line's handler and enables it.
    pub fn initialize(
        &'static self,
        gate: &mut dyn ClockGate,
        intc: &mut dyn InterruptController,
    ) -> RtcResult<()>
    where
        R: 'static,
    {
        self.config.validate()?;

        let first = critical_section::with(|cs| !self.initialized.borrow(cs).replace(true));
        if !first {
            warn!("rtc initialize called twice");
            return Err(RtcError::AlreadyInitialized);
        }

        let result = self.clock.initialize(gate, self.config.oscillator_load, || {
            match self.config.alarm_irq {
                Some(line) => attach_alarm_line(intc, line, self),
                None => Ok(()),
            }
        });

        if let Err(err) = result {
            warn!("rtc initialize failed: {}", err);
            critical_section::with(|cs| self.initialized.borrow(cs).set(false));
            return Err(err);
        }

        crate::set_enabled();
        info!("rtc enabled");
        Ok(())
    }

    /// True once [`Rtc::initialize`] succeeded
    pub fn is_initialized(&self) -> bool {
        critical_section::with(|cs| self.initialized.borrow(cs).get())
    }

    /// Current time with prescaler resolution
    pub fn read_time(&self) -> RtcResult<Timespec> {
        self.ensure_initialized()?;
        Ok(self.clock.read_time())
    }

    /// Current whole seconds
    pub fn read_seconds(&self) -> RtcResult<u32> {
        self.ensure_initialized()?;
        Ok(self.clock.read_seconds())
    }

    /// Current time at the configured resolution
    pub fn now(&self) -> RtcResult<Timespec> {
        if self.config.high_resolution {
            self.read_time()
        } else {
            self.read_seconds().map(Timespec::from_secs)
        }
    }

    /// Set the clock. A pending alarm stays armed.
    pub fn write_time(&self, time: Timespec) -> RtcResult<()> {
        self.ensure_initialized()?;
        self.clock.write_time(time);
        Ok(())
    }

    /// Arm the alarm for absolute second `deadline`
    pub fn set_alarm<F>(&self, deadline: u32, callback: F) -> RtcResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ensure_alarm()?;
        self.alarm
            .set_alarm(self.clock.regs(), deadline, Box::new(callback))
    }

    /// Arm the alarm `delta` seconds from now; returns the deadline
    pub fn set_alarm_in<F>(&self, delta: u32, callback: F) -> RtcResult<u32>
    where
        F: FnOnce() + Send + 'static,
    {
        self.ensure_alarm()?;
        self.alarm
            .set_alarm_in(self.clock.regs(), delta, Box::new(callback))
    }

    /// Disarm the pending alarm without running it
    pub fn cancel_alarm(&self) -> RtcResult<()> {
        self.ensure_alarm()?;
        self.alarm.cancel_alarm(self.clock.regs())
    }

    /// True while an alarm is armed
    pub fn is_armed(&self) -> bool {
        self.alarm.is_armed()
    }

    /// Deadline of the armed alarm
    pub fn alarm_deadline(&self) -> Option<u32> {
        self.alarm.deadline(self.clock.regs())
    }

    /// Driver configuration
    pub fn config(&self) -> &RtcConfig {
        &self.config
    }

    /// Underlying register block
    pub fn registers(&self) -> &R {
        self.clock.regs()
    }

    pub(crate) fn scheduler(&self) -> &AlarmScheduler {
        &self.alarm
    }

    fn ensure_initialized(&self) -> RtcResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RtcError::NotInitialized)
        }
    }

    fn ensure_alarm(&self) -> RtcResult<()> {
        self.ensure_initialized()?;
        if self.config.alarm_irq.is_none() {
            return Err(RtcError::AlarmUnavailable);
        }
        Ok(())
    }
}

/// Attach, prioritise and unmask the alarm line. A failure after the attach
/// detaches again so a later `initialize` starts from a clean controller.
fn attach_alarm_line(
    intc: &mut dyn InterruptController,
    line: AlarmIrq,
    handler: &'static dyn IrqHandler,
) -> RtcResult<()> {
    intc.attach(line.irq, handler)?;

    let configured = intc
        .set_priority(line.irq, line.priority)
        .and_then(|()| intc.enable_interrupt(line.irq));
    if let Err(err) = configured {
        if let Err(detach_err) = intc.detach(line.irq) {
            warn!("detaching irq {} failed: {}", line.irq, detach_err);
        }
        return Err(err.into());
    }
    Ok(())
}
