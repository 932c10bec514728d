//! Cortex-M NVIC binding
//!
//! The vector table is fixed at link time, so attaching a handler records it
//! in a static table and the board's vector calls [`dispatch`]:
//!
//! ```ignore
//! #[interrupt]
//! fn RTC() {
//!     rtc_driver::nvic::dispatch(Interrupt::RTC as u16);
//! }
//! ```

use core::cell::RefCell;

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use critical_section::Mutex;
use hal::{HalError, HalResult, InterruptController, InterruptPriority, IrqHandler, IrqNumber};

/// Maximum number of attached handlers
pub const MAX_HANDLERS: usize = 8;

/// Device interrupt lines the NVIC architecture can address
pub const NVIC_LINES: IrqNumber = 496;

type HandlerTable = heapless::Vec<(IrqNumber, &'static dyn IrqHandler), MAX_HANDLERS>;

static HANDLERS: Mutex<RefCell<HandlerTable>> = Mutex::new(RefCell::new(heapless::Vec::new()));

#[derive(Clone, Copy)]
struct Line(IrqNumber);

impl Line {
    fn new(irq: IrqNumber) -> HalResult<Self> {
        if irq < NVIC_LINES {
            Ok(Self(irq))
        } else {
            Err(HalError::InvalidParameter)
        }
    }
}

// SAFETY: `Line::new` only admits numbers inside the NVIC's line range.
unsafe impl InterruptNumber for Line {
    fn number(self) -> u16 {
        self.0
    }
}

/// [`InterruptController`] over the core's NVIC
pub struct CortexNvic {
    _private: (),
}

impl CortexNvic {
    /// Take control of the NVIC
    pub fn new(_nvic: NVIC) -> Self {
        Self { _private: () }
    }
}

impl InterruptController for CortexNvic {
    fn attach(&mut self, irq: IrqNumber, handler: &'static dyn IrqHandler) -> HalResult<()> {
        Line::new(irq)?;
        critical_section::with(|cs| {
            let mut table = HANDLERS.borrow_ref_mut(cs);
            if table.iter().any(|(line, _)| *line == irq) {
                return Err(HalError::AlreadyAttached);
            }
            table.push((irq, handler)).map_err(|_| HalError::TableFull)
        })
    }

    fn detach(&mut self, irq: IrqNumber) -> HalResult<()> {
        NVIC::mask(Line::new(irq)?);
        critical_section::with(|cs| {
            HANDLERS.borrow_ref_mut(cs).retain(|(line, _)| *line != irq);
        });
        Ok(())
    }

    fn enable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()> {
        let line = Line::new(irq)?;
        // SAFETY: the handler was attached before the line is unmasked and
        // only runs inside `dispatch`, which does not break critical sections.
        unsafe { NVIC::unmask(line) };
        Ok(())
    }

    fn disable_interrupt(&mut self, irq: IrqNumber) -> HalResult<()> {
        NVIC::mask(Line::new(irq)?);
        Ok(())
    }

    fn set_priority(&mut self, irq: IrqNumber, priority: InterruptPriority) -> HalResult<()> {
        // SAFETY: `CortexNvic` owns the NVIC (taken in `new`); nothing else
        // writes priorities.
        let line = Line::new(irq)?;
        unsafe {
            let mut nvic = cortex_m::Peripherals::steal().NVIC;
            nvic.set_priority(line, priority);
        }
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> bool {
        Line::new(irq).map_or(false, NVIC::is_pending)
    }

    fn clear_pending(&mut self, irq: IrqNumber) -> HalResult<()> {
        NVIC::unpend(Line::new(irq)?);
        Ok(())
    }
}

/// Route interrupt `irq` to its attached handler. Call from the vector.
pub fn dispatch(irq: IrqNumber) {
    let handler = critical_section::with(|cs| {
        HANDLERS
            .borrow_ref(cs)
            .iter()
            .find(|(line, _)| *line == irq)
            .map(|(_, handler)| *handler)
    });

    match handler {
        Some(handler) => handler.handle(irq),
        None => log::warn!("irq {} has no handler attached", irq),
    }
}
