/// The five interrupt lines, in priority order (V-blank highest).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Interrupt {
    VBlank = 0,
    Stat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    #[inline]
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Fixed handler vector: 0x40, 0x48, 0x50, 0x58, 0x60.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }
}

/// Pending/enabled interrupt bitmaps (IF at 0xFF0F, IE at 0xFFFF).
///
/// Peripherals raise lines through `request`; the CPU polls
/// `pending & enabled` and services the lowest set bit. There is no
/// queueing beyond the bitmap: simultaneous requests within the same
/// instruction simply set multiple bits.
#[derive(Default)]
pub(crate) struct Interrupts {
    iflags: u8,
    ienable: u8,
}

impl Interrupts {
    pub(crate) fn request(&mut self, line: Interrupt) {
        self.iflags |= line.mask();
    }

    /// IF read: only the low 5 bits exist, the rest read back as 1.
    #[inline]
    pub(crate) fn read_pending(&self) -> u8 {
        self.iflags | 0b1110_0000
    }

    #[inline]
    pub(crate) fn write_pending(&mut self, value: u8) {
        self.iflags = value & 0x1F;
    }

    #[inline]
    pub(crate) fn read_enabled(&self) -> u8 {
        self.ienable
    }

    #[inline]
    pub(crate) fn write_enabled(&mut self, value: u8) {
        self.ienable = value;
    }
}
