//! # rtc-sim
//!
//! Host-side software model of the RTC block and its collaborators, used to
//! drive the driver in tests without hardware.
//!
//! [`SimulatedRtc`] reproduces the register side effects the driver relies
//! on: TSR and TAR writes clear latched flags, the prescaler carries into
//! TSR, and TAF latches when TSR reaches TAR. Time moves only when the test
//! says so, either explicitly through [`SimulatedRtc::advance`] or
//! implicitly on every register read (see [`SimulatedRtc::set_ticks_per_read`]).

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use hal::{
    ClockGate, HalError, HalResult, InterruptController, InterruptPriority, IrqHandler, IrqNumber,
};

use rtc_driver::regs::{ier, sr, Register, RtcRegisters};

/// Handler table capacity of [`SimulatedNvic`]
pub const MAX_LINES: usize = 8;

/// Lines the modelled controller implements; higher numbers are rejected
pub const IRQ_LINES: IrqNumber = 240;

#[allow(clippy::declare_interior_mutable_const)]
const ZERO: AtomicU32 = AtomicU32::new(0);

/// Simulated RTC register block
pub struct SimulatedRtc {
    regs: [AtomicU32; 8],
    frequency_hz: u32,
    ticks_per_read: AtomicU32,
    prescaler_reads: AtomicU32,
}

impl SimulatedRtc {
    /// Powered-off block whose prescaler wraps at `frequency_hz`
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            regs: [ZERO; 8],
            frequency_hz,
            ticks_per_read: AtomicU32::new(0),
            prescaler_reads: AtomicU32::new(0),
        }
    }

    /// Advance the counter by `ticks` if TCE is set.
    ///
    /// Each carry into TSR is compared against TAR and latches TAF on a match.
    pub fn advance(&self, ticks: u32) {
        if self.peek(Register::Sr) & sr::TCE == 0 {
            return;
        }

        let total = self.peek(Register::Tpr) as u64 + ticks as u64;
        let carries = total / self.frequency_hz as u64;
        self.poke(Register::Tpr, (total % self.frequency_hz as u64) as u32);

        for _ in 0..carries {
            let seconds = self.peek(Register::Tsr).wrapping_add(1);
            self.poke(Register::Tsr, seconds);
            if seconds == self.peek(Register::Tar) {
                self.set_flags(sr::TAF);
            }
        }
    }

    /// Advance the counter by whole seconds
    pub fn advance_secs(&self, seconds: u32) {
        self.advance(seconds.saturating_mul(self.frequency_hz));
    }

    /// Let `ticks` elapse after every register read
    pub fn set_ticks_per_read(&self, ticks: u32) {
        self.ticks_per_read.store(ticks, Ordering::SeqCst);
    }

    /// Number of TPR reads so far
    pub fn prescaler_reads(&self) -> u32 {
        self.prescaler_reads.load(Ordering::SeqCst)
    }

    /// Alarm interrupt request line: TAF latched and TAIE set
    pub fn alarm_asserted(&self) -> bool {
        self.peek(Register::Sr) & sr::TAF != 0 && self.peek(Register::Ier) & ier::TAIE != 0
    }

    /// Register value, without side effects or elapsed time
    pub fn peek(&self, reg: Register) -> u32 {
        self.regs[reg.index()].load(Ordering::SeqCst)
    }

    /// Store a raw register value, without side effects
    pub fn poke(&self, reg: Register, value: u32) {
        self.regs[reg.index()].store(value, Ordering::SeqCst);
    }

    fn set_flags(&self, flags: u32) {
        self.regs[Register::Sr.index()].fetch_or(flags, Ordering::SeqCst);
    }

    fn clear_flags(&self, flags: u32) {
        self.regs[Register::Sr.index()].fetch_and(!flags, Ordering::SeqCst);
    }
}

impl RtcRegisters for SimulatedRtc {
    fn read(&self, reg: Register) -> u32 {
        let value = self.peek(reg);
        if reg == Register::Tpr {
            self.prescaler_reads.fetch_add(1, Ordering::SeqCst);
        }
        let elapsed = self.ticks_per_read.load(Ordering::SeqCst);
        if elapsed > 0 {
            self.advance(elapsed);
        }
        value
    }

    fn write(&self, reg: Register, value: u32) {
        match reg {
            Register::Tsr => {
                self.poke(reg, value);
                self.clear_flags(sr::FLAGS);
            }
            Register::Tar => {
                self.poke(reg, value);
                self.clear_flags(sr::TAF);
            }
            Register::Sr => {
                let flags = self.peek(Register::Sr) & sr::FLAGS;
                self.poke(reg, flags | (value & sr::TCE));
            }
            _ => self.poke(reg, value),
        }
    }
}

/// Clock gate that records whether it was enabled
#[derive(Debug, Default)]
pub struct SimulatedGate {
    enabled: AtomicBool,
    fail: bool,
}

impl SimulatedGate {
    /// Gate that succeeds
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            fail: false,
        }
    }

    /// Gate whose `enable` reports [`HalError::ClockGateFailed`]
    pub const fn failing() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            fail: true,
        }
    }

    /// True once `enable` succeeded
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

impl ClockGate for SimulatedGate {
    fn enable(&mut self) -> HalResult<()> {
        if self.fail {
            return Err(HalError::ClockGateFailed);
        }
        self.enabled.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Line {
    irq: IrqNumber,
    handler: Option<&'static dyn IrqHandler>,
    enabled: bool,
    pending: bool,
    priority: InterruptPriority,
}

impl Line {
    const fn new(irq: IrqNumber) -> Self {
        Self {
            irq,
            handler: None,
            enabled: false,
            pending: false,
            priority: 0,
        }
    }
}

/// Interrupt controller model: attach table, enable and pending bits
#[derive(Default)]
pub struct SimulatedNvic {
    lines: heapless::Vec<Line, MAX_LINES>,
}

impl SimulatedNvic {
    /// Controller with no lines configured
    pub const fn new() -> Self {
        Self {
            lines: heapless::Vec::new(),
        }
    }

    /// Signal `irq`. Dispatches to the attached handler when the line is
    /// enabled, otherwise leaves it pending. Returns true if dispatched.
    pub fn raise(&mut self, irq: IrqNumber) -> bool {
        let Ok(line) = self.line_mut(irq) else {
            return false;
        };
        line.pending = true;
        if !line.enabled {
            return false;
        }
        let Some(handler) = line.handler else {
            return false;
        };
        line.pending = false;
        handler.handle(irq);
        true
    }

    /// Forward the RTC's alarm request line to `irq`, as the hardware would
    pub fn sample(&mut self, rtc: &SimulatedRtc, irq: IrqNumber) -> bool {
        rtc.alarm_asserted() && self.raise(irq)
    }

    /// True if `irq` is enabled
    pub fn is_enabled(&self, irq: IrqNumber) -> bool {
        self.line(irq).map_or(false, |line| line.enabled)
    }

    /// Priority of `irq`
    pub fn priority(&self, irq: IrqNumber) -> Option<InterruptPriority> {
        self.line(irq).map(|line| line.priority)
    }

    /// True if a handler is attached to `irq`
    pub fn is_attached(&self, irq: IrqNumber) -> bool {
        self.line(irq).map_or(false, |line| line.handler.is_some())
    }

    fn line(&self, irq: IrqNumber) -> Option<&Line> {
        self.lines.iter().find(|line| line.irq == irq)
    }

    fn line_mut(&mut self, irq: IrqNumber) -> HalResult<&mut Line> {
        if irq >= IRQ_LINES {
            return Err(HalError::InvalidParameter);
        }
        let index = match self.lines.iter().position(|line| line.irq == irq) {
            Some(index) => index,
            None => {
                self.lines
                    .push(Line::new(irq))
                    .map_err(|_| HalError::TableFull)?;
                self.lines.len() - 1
            }
        };
        Ok(&mut self.lines[index])
    }
}

impl InterruptController for SimulatedNvic {
    fn attach(&mut self, irq: IrqNumber, handler: &'static dyn IrqHandler) -> HalResult<()> {
        let line = self.line_mut(irq)?;
        if line.handler.is_some() {
            return Err(HalError::AlreadyAttached);
        }
        line.handler = Some(handler);
        Ok(())
    }

    fn detach(&mut self, irq: IrqNumber) -> HalResult<()> {
        let line = self.line_mut(irq)?;
        line.handler = None;
        line.enabled = false;
        Ok(())
    }

    fn enable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()> {
        self.line_mut(irq)?.enabled = true;
        Ok(())
    }

    fn disable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()> {
        self.line_mut(irq)?.enabled = false;
        Ok(())
    }

    fn set_priority(&mut self, irq: IrqNumber, priority: InterruptPriority) -> HalResult<()> {
        self.line_mut(irq)?.priority = priority;
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> bool {
        self.line(irq).map_or(false, |line| line.pending)
    }

    fn clear_pending(&mut self, irq: IrqNumber) -> HalResult<()> {
        self.line_mut(irq)?.pending = false;
        Ok(())
    }
}
