use super::super::{Bus, Cpu};

impl Cpu {
    /// INC rr: no flags touched.
    pub(super) fn exec_inc_rr(&mut self, opcode: u8) -> u32 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_add(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_add(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_add(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_add(1),
        }
        8
    }

    /// DEC rr: no flags touched.
    pub(super) fn exec_dec_rr(&mut self, opcode: u8) -> u32 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(self.regs.bc().wrapping_sub(1)),
            1 => self.regs.set_de(self.regs.de().wrapping_sub(1)),
            2 => self.regs.set_hl(self.regs.hl().wrapping_sub(1)),
            _ => self.regs.sp = self.regs.sp.wrapping_sub(1),
        }
        8
    }

    /// INC r and INC (HL).
    pub(super) fn exec_inc_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, target);
        let result = self.inc8(value);
        self.write_reg8(bus, target, result);
        if target == 6 {
            12
        } else {
            4
        }
    }

    /// DEC r and DEC (HL).
    pub(super) fn exec_dec_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let target = (opcode >> 3) & 0x07;
        let value = self.read_reg8(bus, target);
        let result = self.dec8(value);
        self.write_reg8(bus, target, result);
        if target == 6 {
            12
        } else {
            4
        }
    }
}
