use super::super::{Bus, Cpu};

impl Cpu {
    /// LD rr,d16 for BC/DE/HL/SP.
    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let value = self.fetch16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
        12
    }

    /// LD r,d8 and LD (HL),d8.
    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.fetch8(bus);
        self.write_reg8(bus, target, value);
        if target == 6 {
            12
        } else {
            8
        }
    }

    /// The LD r,r' quarter of the opcode map (HALT is handled before
    /// dispatch reaches here).
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, value);
        if dst == 6 || src == 6 {
            8
        } else {
            4
        }
    }

    /// LD (BC)/(DE)/(HL+)/(HL-),A.
    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a);
        8
    }

    /// LD A,(BC)/(DE)/(HL+)/(HL-).
    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr);
        8
    }

    /// Address for the indirect A loads, applying the HL post-increment
    /// or post-decrement where the opcode asks for it.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    /// LD (a16),SP: store SP little-endian at an absolute address.
    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let addr = self.fetch16(bus);
        bus.write8(addr, self.regs.sp as u8);
        bus.write8(addr.wrapping_add(1), (self.regs.sp >> 8) as u8);
        20
    }

    /// LDH (a8),A / LDH A,(a8): high-page access at 0xFF00+a8.
    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let addr = 0xFF00 | u16::from(self.fetch8(bus));
        if opcode == 0xE0 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        12
    }

    /// LD (C),A / LD A,(C): high-page access at 0xFF00+C.
    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let addr = 0xFF00 | u16::from(self.regs.c);
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        8
    }

    /// LD (a16),A / LD A,(a16).
    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let addr = self.fetch16(bus);
        if opcode == 0xEA {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
        16
    }

    /// LD HL,SP+r8.
    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        let result = self.add_signed(self.regs.sp, imm);
        self.regs.set_hl(result);
        12
    }
}
