//! Counter read/write behaviour against the simulated block

mod common;

use std::cell::Cell;

use rtc_core::{OscillatorLoad, RtcError, Timespec, NSEC_PER_SEC};
use rtc_driver::regs::{cr, ier, sr, Register};
use rtc_driver::ClockCore;
use rtc_sim::{SimulatedGate, SimulatedRtc};

use common::{running_block, FREQ};

#[test]
fn initialize_keeps_time_and_clears_flags() {
    let sim = SimulatedRtc::new(FREQ);
    sim.poke(Register::Tsr, 1234);
    sim.poke(Register::Sr, sr::TAF | sr::TOF);
    sim.poke(Register::Ier, ier::TAIE | ier::TOIE);
    let mut gate = SimulatedGate::new();

    let clock = ClockCore::new(&sim, FREQ);
    clock
        .initialize(&mut gate, OscillatorLoad::PF16 | OscillatorLoad::PF4, || Ok(()))
        .unwrap();

    assert!(gate.is_enabled());
    assert_eq!(sim.peek(Register::Tsr), 1234);
    assert_eq!(sim.peek(Register::Sr), sr::TCE);
    assert_eq!(sim.peek(Register::Ier), 0);
    assert_eq!(sim.peek(Register::Cr), cr::OSCE | cr::SC16P | cr::SC4P);
}

#[test]
fn initialize_attaches_alarm_before_counter_starts() {
    let sim = SimulatedRtc::new(FREQ);
    sim.poke(Register::Ier, ier::TOIE);
    let mut gate = SimulatedGate::new();
    let attached = Cell::new(false);

    let clock = ClockCore::new(&sim, FREQ);
    clock
        .initialize(&mut gate, OscillatorLoad::NONE, || {
            assert_eq!(sim.peek(Register::Sr) & sr::TCE, 0);
            assert_eq!(sim.peek(Register::Ier), 0);
            attached.set(true);
            Ok(())
        })
        .unwrap();

    assert!(attached.get());
    assert_eq!(sim.peek(Register::Cr), cr::OSCE);
}

#[test]
fn initialize_attach_failure_keeps_counter_running() {
    let sim = SimulatedRtc::new(FREQ);
    sim.poke(Register::Tsr, 1000);
    sim.poke(Register::Sr, sr::TCE);
    let mut gate = SimulatedGate::new();

    let clock = ClockCore::new(&sim, FREQ);
    let result = clock.initialize(&mut gate, OscillatorLoad::NONE, || {
        Err(RtcError::Hal(hal::HalError::TableFull))
    });

    assert_eq!(result, Err(RtcError::Hal(hal::HalError::TableFull)));
    assert_eq!(sim.peek(Register::Sr) & sr::TCE, sr::TCE);
    sim.advance_secs(2);
    assert_eq!(clock.read_seconds(), 1002);
}

#[test]
fn initialize_stops_on_gate_failure() {
    let sim = SimulatedRtc::new(FREQ);
    let mut gate = SimulatedGate::failing();

    let clock = ClockCore::new(&sim, FREQ);
    let result = clock.initialize(&mut gate, OscillatorLoad::NONE, || Ok(()));

    assert_eq!(result, Err(RtcError::Hal(hal::HalError::ClockGateFailed)));
    assert_eq!(sim.peek(Register::Sr) & sr::TCE, 0);
    assert_eq!(sim.peek(Register::Cr), 0);
}

#[test]
fn read_time_subseconds_stay_below_frequency() {
    let sim = running_block(10);
    let clock = ClockCore::new(sim, FREQ);

    for step in [1, 7, 4095, 16_383, 32_767, 32_768, 50_000] {
        sim.advance(step);
        let now = clock.read_time();
        assert!(now.nanoseconds() < NSEC_PER_SEC);
        assert!(now.ticks(FREQ) < FREQ);
    }
}

#[test]
fn read_time_without_wrap_reads_prescaler_twice() {
    let sim = running_block(42);
    sim.advance(FREQ / 2);
    let clock = ClockCore::new(sim, FREQ);

    let now = clock.read_time();

    assert_eq!(now, Timespec::from_ticks(42, FREQ / 2, FREQ));
    assert_eq!(sim.prescaler_reads(), 2);
}

#[test]
fn read_time_retries_when_prescaler_wraps() {
    let sim = running_block(100);
    sim.poke(Register::Tpr, FREQ - 1);
    // One tick elapses per bus access: the first TPR read sees the last tick
    // of second 100 and the carry lands before TSR is read.
    sim.set_ticks_per_read(1);
    let clock = ClockCore::new(sim, FREQ);

    let now = clock.read_time();

    assert_eq!(sim.prescaler_reads(), 4);
    assert_eq!(now, Timespec::from_ticks(101, 4, FREQ));
}

#[test]
fn read_time_is_monotonic() {
    let sim = running_block(7);
    sim.set_ticks_per_read(997);
    let clock = ClockCore::new(sim, FREQ);

    let mut previous = clock.read_time();
    for _ in 0..500 {
        let now = clock.read_time();
        assert!(now.seconds() >= previous.seconds());
        assert!(now >= previous);
        previous = now;
    }
    assert!(previous.seconds() > 7);
}

#[test]
fn read_seconds_skips_prescaler() {
    let sim = running_block(99);
    let clock = ClockCore::new(sim, FREQ);

    assert_eq!(clock.read_seconds(), 99);
    assert_eq!(sim.prescaler_reads(), 0);
}

#[test]
fn write_time_round_trip_within_one_tick() {
    let sim = running_block(0);
    let clock = ClockCore::new(sim, FREQ);
    let tick_nanos = NSEC_PER_SEC / FREQ + 1;

    for nanos in [0, 1, 30_518, 123_456_789, 500_000_000, NSEC_PER_SEC - 1] {
        let time = Timespec::new(500, nanos).unwrap();
        clock.write_time(time);
        let read = clock.read_time();

        assert_eq!(read.seconds(), 500);
        assert!(nanos - read.nanoseconds() < tick_nanos);
    }
}

#[test]
fn write_time_leaves_alarm_registers() {
    let sim = running_block(5);
    sim.poke(Register::Tar, 60);
    sim.poke(Register::Ier, ier::TAIE);
    let clock = ClockCore::new(sim, FREQ);

    clock.write_time(Timespec::from_secs(30));

    assert_eq!(sim.peek(Register::Tar), 60);
    assert_eq!(sim.peek(Register::Ier), ier::TAIE);
    assert_eq!(sim.peek(Register::Sr) & sr::TCE, sr::TCE);
}
