use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Read the 8-bit operand selected by a 3-bit opcode field, in the
    /// standard table order: B, C, D, E, H, L, (HL), A.
    #[inline]
    pub(super) fn read_reg8<B: Bus>(&mut self, bus: &mut B, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read8(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write counterpart of `read_reg8`, same encoding.
    #[inline]
    pub(super) fn write_reg8<B: Bus>(&mut self, bus: &mut B, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write8(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// Decode a 2-bit condition field: NZ, Z, NC, C.
    #[inline]
    pub(super) fn condition(&self, index: u8) -> bool {
        match index & 0x03 {
            0 => !self.flag(Flag::Z),
            1 => self.flag(Flag::Z),
            2 => !self.flag(Flag::C),
            _ => self.flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        if self.halt_bug {
            // The fetch after a buggy HALT reads the byte without
            // advancing PC, so the opcode runs twice.
            self.halt_bug = false;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
        }
        value
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        let hi = bus.read8(self.regs.sp.wrapping_add(1));
        self.regs.sp = self.regs.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }
}
