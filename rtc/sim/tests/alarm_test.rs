//! Single-slot alarm behaviour against the simulated block

mod common;

use rtc_core::RtcError;
use rtc_driver::regs::{ier, sr, Register};
use rtc_driver::{service_alarm, AlarmScheduler};

use common::{running_block, Hits};

#[test]
fn set_alarm_programs_compare_and_enables() {
    let sim = running_block(10);
    let alarm = AlarmScheduler::new();
    let hits = Hits::default();

    alarm.set_alarm(&sim, 15, hits.callback()).unwrap();

    assert!(alarm.is_armed());
    assert_eq!(sim.peek(Register::Tar), 15);
    assert_eq!(sim.peek(Register::Ier) & ier::TAIE, ier::TAIE);
    assert_eq!(alarm.deadline(&sim), Some(15));
    assert_eq!(hits.count(), 0);
}

#[test]
fn set_alarm_clears_stale_match_flag() {
    let sim = running_block(10);
    sim.poke(Register::Sr, sr::TCE | sr::TAF);
    let alarm = AlarmScheduler::new();

    alarm.set_alarm(&sim, 20, Hits::default().callback()).unwrap();

    assert_eq!(sim.peek(Register::Sr) & sr::TAF, 0);
    assert!(!sim.alarm_asserted());
}

#[test]
fn set_alarm_while_armed_is_busy() {
    let sim = running_block(10);
    let alarm = AlarmScheduler::new();
    let first = Hits::default();
    let second = Hits::default();

    alarm.set_alarm(&sim, 15, first.callback()).unwrap();
    let result = alarm.set_alarm(&sim, 30, second.callback());

    assert_eq!(result, Err(RtcError::Busy));
    assert_eq!(sim.peek(Register::Tar), 15);
    assert_eq!(alarm.deadline(&sim), Some(15));
    // rejected callback is dropped, never stored
    assert_eq!(second.holders(), 1);

    service_alarm(&alarm, &sim);
    assert_eq!(first.count(), 1);
    assert_eq!(second.count(), 0);
}

#[test]
fn set_alarm_in_counts_from_current_second() {
    let sim = running_block(1000);
    let alarm = AlarmScheduler::new();

    let deadline = alarm.set_alarm_in(&sim, 5, Hits::default().callback()).unwrap();

    assert_eq!(deadline, 1005);
    assert_eq!(sim.peek(Register::Tar), 1005);
}

#[test]
fn set_alarm_in_wraps_with_the_counter() {
    let sim = running_block(u32::MAX - 1);
    let alarm = AlarmScheduler::new();

    let deadline = alarm.set_alarm_in(&sim, 3, Hits::default().callback()).unwrap();

    assert_eq!(deadline, 1);
}

#[test]
fn cancel_while_idle_is_no_alarm() {
    let sim = running_block(10);
    sim.poke(Register::Tar, 44);
    sim.poke(Register::Ier, ier::TOIE);
    let alarm = AlarmScheduler::new();

    assert_eq!(alarm.cancel_alarm(&sim), Err(RtcError::NoAlarm));
    assert_eq!(sim.peek(Register::Tar), 44);
    assert_eq!(sim.peek(Register::Ier), ier::TOIE);
    assert!(!alarm.is_armed());
}

#[test]
fn cancel_disables_interrupt_and_keeps_compare() {
    let sim = running_block(10);
    let alarm = AlarmScheduler::new();
    let hits = Hits::default();

    alarm.set_alarm(&sim, 15, hits.callback()).unwrap();
    assert_eq!(hits.holders(), 2);
    alarm.cancel_alarm(&sim).unwrap();

    assert!(!alarm.is_armed());
    assert_eq!(alarm.deadline(&sim), None);
    assert_eq!(sim.peek(Register::Ier) & ier::TAIE, 0);
    assert_eq!(sim.peek(Register::Tar), 15);
    assert_eq!(hits.count(), 0);
    assert_eq!(hits.holders(), 1);
}

#[test]
fn cancel_then_rearm() {
    let sim = running_block(10);
    let alarm = AlarmScheduler::new();
    let hits = Hits::default();

    alarm.set_alarm(&sim, 15, hits.callback()).unwrap();
    alarm.cancel_alarm(&sim).unwrap();
    alarm.set_alarm(&sim, 25, hits.callback()).unwrap();

    assert_eq!(sim.peek(Register::Tar), 25);
    assert_eq!(alarm.cancel_alarm(&sim), Ok(()));
    assert_eq!(alarm.cancel_alarm(&sim), Err(RtcError::NoAlarm));
}
