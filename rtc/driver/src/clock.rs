//! Time counter access
//!
//! The counter is two registers advanced by hardware: TPR counts ticks within
//! the second and carries into TSR on overflow. Software can neither stop
//! nor observe that carry atomically, so reads use a re-read loop and writes
//! stop the counter first.

use hal::ClockGate;
use log::{debug, trace};
use rtc_core::{OscillatorLoad, RtcResult, Timespec};

use crate::regs::{cr, sr, Register, RtcRegisters};

/// Race-free read/write of the seconds + prescaler counter
pub struct ClockCore<R> {
    regs: R,
    frequency_hz: u32,
}

impl<R: RtcRegisters> ClockCore<R> {
    /// Wrap a register block whose prescaler runs at `frequency_hz`
    pub const fn new(regs: R, frequency_hz: u32) -> Self {
        Self { regs, frequency_hz }
    }

    /// Underlying register block
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Prescaler ticks per second
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Bring the counter up.
    ///
    /// `attach_alarm` runs after every interrupt source is disabled and before
    /// the counter restarts; it is where the alarm line gets registered. If it
    /// fails the counter is still restarted and the error returned.
    pub fn initialize<F>(
        &self,
        gate: &mut dyn ClockGate,
        load: OscillatorLoad,
        attach_alarm: F,
    ) -> RtcResult<()>
    where
        F: FnOnce() -> RtcResult<()>,
    {
        gate.enable()?;

        self.regs.write(Register::Sr, 0);
        self.regs.write(Register::Cr, cr::OSCE | cr::load_bits(load));

        // Latched flags only clear on a TSR write. Writing back the value
        // just read keeps the stored time.
        let seconds = self.regs.read(Register::Tsr);
        self.regs.write(Register::Tsr, seconds);

        self.regs.write(Register::Ier, 0);

        let attached = attach_alarm();

        // Restart even on failure: a counter keeping time across resets must
        // not be left frozen by a collaborator error.
        self.regs.write(Register::Sr, sr::TCE);
        attached?;

        debug!(
            "rtc counter running at {} Hz, load {} pF, seconds={}",
            self.frequency_hz,
            load.picofarads(),
            seconds
        );
        Ok(())
    }

    /// Current time with prescaler resolution
    pub fn read_time(&self) -> Timespec {
        let (seconds, ticks) = critical_section::with(|_| self.snapshot());
        Timespec::from_ticks(seconds, ticks, self.frequency_hz)
    }

    /// Current whole seconds; one register read, so never torn
    pub fn read_seconds(&self) -> u32 {
        self.regs.read(Register::Tsr)
    }

    /// Set the counter to `time`.
    ///
    /// Does not touch a pending alarm, even though the TSR write clears the
    /// latched match flag.
    pub fn write_time(&self, time: Timespec) {
        let ticks = time.ticks(self.frequency_hz);
        critical_section::with(|_| {
            self.regs.write(Register::Sr, 0);
            // TPR before TSR: the TSR write is what clears the match status
            self.regs.write(Register::Tpr, ticks);
            self.regs.write(Register::Tsr, time.seconds());
            self.regs.write(Register::Sr, sr::TCE);
        });
        debug!("rtc time set to {}", time);
    }

    /// Consistent (seconds, ticks) pair.
    ///
    /// Within one second the prescaler only counts up, so `after < before`
    /// means it wrapped, and TSR may have moved, somewhere between the reads.
    /// The window is three bus accesses, orders of magnitude shorter than a
    /// second, so the next pass cannot see another wrap and the loop ends.
    fn snapshot(&self) -> (u32, u32) {
        loop {
            let before = self.regs.read(Register::Tpr);
            let seconds = self.regs.read(Register::Tsr);
            let after = self.regs.read(Register::Tpr);
            if after >= before {
                return (seconds, after);
            }
            trace!("prescaler wrapped during read ({} -> {}), retrying", before, after);
        }
    }
}
