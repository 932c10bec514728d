#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rtc_driver::regs::{sr, Register, RtcRegisters};
use rtc_driver::AlarmCallback;
use rtc_sim::SimulatedRtc;

pub const FREQ: u32 = 32_768;

/// Leaked, running simulated block at `seconds`
pub fn running_block(seconds: u32) -> &'static SimulatedRtc {
    let sim: &'static SimulatedRtc = Box::leak(Box::new(SimulatedRtc::new(FREQ)));
    sim.write(Register::Tsr, seconds);
    sim.write(Register::Sr, sr::TCE);
    sim
}

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn callback(&self) -> AlarmCallback {
        let hits = self.0.clone();
        Box::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn holders(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}
