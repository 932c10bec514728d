use std::sync::Mutex;
use std::vec::Vec;

use hal::{ClockGate, HalError, HalResult};
use rtc_core::{OscillatorLoad, RtcError, Timespec};

use crate::clock::ClockCore;
use crate::regs::{cr, sr, Register, RtcRegisters};

const FREQ: u32 = 32_768;

/// Register block that logs every write and reads back a fixed TSR
#[derive(Default)]
struct Recorder {
    seconds: u32,
    writes: Mutex<Vec<(Register, u32)>>,
}

impl Recorder {
    fn writes(&self) -> Vec<(Register, u32)> {
        self.writes.lock().unwrap().clone()
    }
}

impl RtcRegisters for Recorder {
    fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::Tsr => self.seconds,
            _ => 0,
        }
    }

    fn write(&self, reg: Register, value: u32) {
        self.writes.lock().unwrap().push((reg, value));
    }
}

struct Gate;

impl ClockGate for Gate {
    fn enable(&mut self) -> HalResult<()> {
        Ok(())
    }
}

#[test]
fn initialize_write_sequence() {
    let recorder = Recorder {
        seconds: 1000,
        ..Default::default()
    };
    let clock = ClockCore::new(&recorder, FREQ);

    clock
        .initialize(&mut Gate, OscillatorLoad::PF16 | OscillatorLoad::PF4, || Ok(()))
        .unwrap();

    assert_eq!(
        recorder.writes(),
        [
            (Register::Sr, 0),
            (Register::Cr, cr::OSCE | cr::SC16P | cr::SC4P),
            (Register::Tsr, 1000),
            (Register::Ier, 0),
            (Register::Sr, sr::TCE),
        ]
    );
}

#[test]
fn initialize_restarts_counter_when_attach_fails() {
    let recorder = Recorder {
        seconds: 1000,
        ..Default::default()
    };
    let clock = ClockCore::new(&recorder, FREQ);

    let result = clock.initialize(&mut Gate, OscillatorLoad::NONE, || {
        Err(RtcError::Hal(HalError::TableFull))
    });

    assert_eq!(result, Err(RtcError::Hal(HalError::TableFull)));
    assert_eq!(recorder.writes().last(), Some(&(Register::Sr, sr::TCE)));
}

#[test]
fn write_time_orders_prescaler_before_seconds() {
    let recorder = Recorder::default();
    let clock = ClockCore::new(&recorder, FREQ);

    clock.write_time(Timespec::new(77, 500_000_000).unwrap());

    assert_eq!(
        recorder.writes(),
        [
            (Register::Sr, 0),
            (Register::Tpr, FREQ / 2),
            (Register::Tsr, 77),
            (Register::Sr, sr::TCE),
        ]
    );
}
