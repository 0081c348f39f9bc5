use super::{Cpu, Flag};

impl Cpu {
    #[inline]
    fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.regs.f = (z as u8) << 7 | (n as u8) << 6 | (h as u8) << 5 | (c as u8) << 4;
    }

    /// ADD A,v / ADC A,v.
    pub(super) fn add_a(&mut self, value: u8, with_carry: bool) {
        let carry_in = u8::from(with_carry && self.flag(Flag::C));
        let a = self.regs.a;
        let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let result = full as u8;
        self.set_flags(result == 0, false, half > 0x0F, full > 0xFF);
        self.regs.a = result;
    }

    /// SUB v / SBC A,v.
    pub(super) fn sub_a(&mut self, value: u8, with_carry: bool) {
        let carry_in = i16::from(with_carry && self.flag(Flag::C));
        let a = self.regs.a;
        let full = i16::from(a) - i16::from(value) - carry_in;
        let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - carry_in;
        let result = full as u8;
        self.set_flags(result == 0, true, half < 0, full < 0);
        self.regs.a = result;
    }

    pub(super) fn and_a(&mut self, value: u8) {
        self.regs.a &= value;
        let z = self.regs.a == 0;
        self.set_flags(z, false, true, false);
    }

    pub(super) fn or_a(&mut self, value: u8) {
        self.regs.a |= value;
        let z = self.regs.a == 0;
        self.set_flags(z, false, false, false);
    }

    pub(super) fn xor_a(&mut self, value: u8) {
        self.regs.a ^= value;
        let z = self.regs.a == 0;
        self.set_flags(z, false, false, false);
    }

    /// CP v: flags of `A - v` without writing A back.
    pub(super) fn cp_a(&mut self, value: u8) {
        let a = self.regs.a;
        self.set_flags(
            a == value,
            true,
            (a & 0x0F) < (value & 0x0F),
            a < value,
        );
    }

    /// Decimal-adjust A after BCD arithmetic. The correction value is
    /// derived from N, H, C and the accumulator itself.
    pub(super) fn daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust = if self.flag(Flag::C) { 0x60u8 } else { 0x00 };
        if self.flag(Flag::H) {
            adjust |= 0x06;
        }
        if !self.flag(Flag::N) {
            if a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        } else {
            a = a.wrapping_sub(adjust);
        }
        self.set_flag(Flag::Z, a == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, adjust >= 0x60);
        self.regs.a = a;
    }

    /// INC r / INC (HL): Z, N, H updated, C untouched.
    #[inline]
    pub(super) fn inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL): Z, N, H updated, C untouched.
    #[inline]
    pub(super) fn dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, value & 0x0F == 0);
        result
    }

    /// ADD HL,rr: Z untouched, H/C computed on the full 16-bit add.
    pub(super) fn add_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, u32::from(hl) + u32::from(value) > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// Signed-immediate 16-bit add used by ADD SP,r8 and LD HL,SP+r8.
    /// Z and N are cleared; H and C come from the low byte only.
    pub(super) fn add_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = i16::from(imm8 as i8) as u16;
        self.set_flags(
            false,
            false,
            (base & 0x000F) + (offset & 0x000F) > 0x000F,
            (base & 0x00FF) + (offset & 0x00FF) > 0x00FF,
        );
        base.wrapping_add(offset)
    }

    // Rotate and shift primitives, shared between the CB-prefixed forms
    // (Z set from the result) and the bare A rotates (which clear Z
    // afterwards at the call site).

    pub(super) fn rlc_value(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(1);
        self.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    pub(super) fn rrc_value(&mut self, value: u8) -> u8 {
        let result = value.rotate_right(1);
        self.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn rl_value(&mut self, value: u8) -> u8 {
        let result = (value << 1) | u8::from(self.flag(Flag::C));
        self.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    pub(super) fn rr_value(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (u8::from(self.flag(Flag::C)) << 7);
        self.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn sla_value(&mut self, value: u8) -> u8 {
        let result = value << 1;
        self.set_flags(result == 0, false, false, value & 0x80 != 0);
        result
    }

    /// Arithmetic shift right: bit 7 is preserved.
    pub(super) fn sra_value(&mut self, value: u8) -> u8 {
        let result = (value >> 1) | (value & 0x80);
        self.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn srl_value(&mut self, value: u8) -> u8 {
        let result = value >> 1;
        self.set_flags(result == 0, false, false, value & 0x01 != 0);
        result
    }

    pub(super) fn swap_value(&mut self, value: u8) -> u8 {
        let result = value.rotate_left(4);
        self.set_flags(result == 0, false, false, false);
        result
    }
}
