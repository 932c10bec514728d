//! Register surface of the RTC block
//!
//! The driver talks to the peripheral only through [`RtcRegisters`], so the
//! same code runs against memory-mapped hardware ([`RtcBlock`]) and against
//! the software model used by the host tests.

/// Registers the driver touches
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Time seconds
    Tsr,
    /// Time prescaler (sub-second ticks)
    Tpr,
    /// Time alarm compare
    Tar,
    /// Time compensation
    Tcr,
    /// Control: oscillator enable and load capacitance
    Cr,
    /// Status: latched flags and counter enable
    Sr,
    /// Lock
    Lr,
    /// Interrupt enable
    Ier,
}

impl Register {
    /// Every register, in address order
    pub const ALL: [Register; 8] = [
        Register::Tsr,
        Register::Tpr,
        Register::Tar,
        Register::Tcr,
        Register::Cr,
        Register::Sr,
        Register::Lr,
        Register::Ier,
    ];

    /// Byte offset from the block base
    pub const fn offset(self) -> usize {
        self.index() * 4
    }

    /// Position in [`Register::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Register::Tsr => 0,
            Register::Tpr => 1,
            Register::Tar => 2,
            Register::Tcr => 3,
            Register::Cr => 4,
            Register::Sr => 5,
            Register::Lr => 6,
            Register::Ier => 7,
        }
    }
}

/// Control register bits
pub mod cr {
    use rtc_core::OscillatorLoad;

    /// Oscillator enable
    pub const OSCE: u32 = 1 << 8;
    /// 16 pF load
    pub const SC16P: u32 = 1 << 10;
    /// 8 pF load
    pub const SC8P: u32 = 1 << 11;
    /// 4 pF load
    pub const SC4P: u32 = 1 << 12;
    /// 2 pF load
    pub const SC2P: u32 = 1 << 13;

    /// Capacitor select bits for `load`
    pub const fn load_bits(load: OscillatorLoad) -> u32 {
        let mut bits = 0;
        if load.contains(OscillatorLoad::PF2) {
            bits |= SC2P;
        }
        if load.contains(OscillatorLoad::PF4) {
            bits |= SC4P;
        }
        if load.contains(OscillatorLoad::PF8) {
            bits |= SC8P;
        }
        if load.contains(OscillatorLoad::PF16) {
            bits |= SC16P;
        }
        bits
    }
}

/// Status register bits
pub mod sr {
    /// Time invalid
    pub const TIF: u32 = 1 << 0;
    /// Time overflow
    pub const TOF: u32 = 1 << 1;
    /// Time alarm matched
    pub const TAF: u32 = 1 << 2;
    /// Time counter enable
    pub const TCE: u32 = 1 << 4;

    /// Read-only latched flags
    pub const FLAGS: u32 = TIF | TOF | TAF;
}

/// Interrupt enable register bits
pub mod ier {
    /// Time invalid interrupt enable
    pub const TIIE: u32 = 1 << 0;
    /// Time overflow interrupt enable
    pub const TOIE: u32 = 1 << 1;
    /// Time alarm interrupt enable
    pub const TAIE: u32 = 1 << 2;
}

/// Raw access to the RTC registers.
///
/// Accesses go straight to the device: writes have the side effects the
/// hardware documents (writing TSR or TAR clears latched flags), so callers
/// order them deliberately.
pub trait RtcRegisters: Sync {
    /// Read a register
    fn read(&self, reg: Register) -> u32;

    /// Write a register
    fn write(&self, reg: Register, value: u32);

    /// Read-modify-write. Not atomic; run it inside a critical section.
    fn modify<F>(&self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

impl<T: RtcRegisters + ?Sized> RtcRegisters for &T {
    fn read(&self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}

/// Memory-mapped RTC register block
#[derive(Debug)]
pub struct RtcBlock {
    base: usize,
}

impl RtcBlock {
    /// Base address of the RTC on Kinetis K-series parts
    pub const KINETIS_BASE: usize = 0x4003_D000;

    /// Create an accessor for the block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an RTC register block that stays mapped
    /// for the lifetime of the accessor, and no other code may drive the
    /// block's time or alarm registers.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn addr(&self, reg: Register) -> *mut u32 {
        (self.base + reg.offset()) as *mut u32
    }
}

impl RtcRegisters for RtcBlock {
    fn read(&self, reg: Register) -> u32 {
        // SAFETY: `new` guarantees the block is mapped at `base`.
        unsafe { core::ptr::read_volatile(self.addr(reg)) }
    }

    fn write(&self, reg: Register, value: u32) {
        // SAFETY: as above.
        unsafe { core::ptr::write_volatile(self.addr(reg), value) }
    }
}
