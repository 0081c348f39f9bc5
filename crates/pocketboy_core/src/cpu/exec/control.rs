use super::super::{Bus, Cpu};

impl Cpu {
    /// JR [cc,]r8: signed displacement relative to the following byte.
    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
            12
        } else {
            8
        }
    }

    /// JP [cc,]a16.
    pub(super) fn exec_jp<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let addr = self.fetch16(bus);
        if taken {
            self.regs.pc = addr;
            16
        } else {
            12
        }
    }

    /// CALL [cc,]a16.
    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, taken: bool) -> u32 {
        let addr = self.fetch16(bus);
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
            24
        } else {
            12
        }
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        16
    }

    /// RET cc costs more than plain RET when taken (extra condition
    /// check cycle).
    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        if self.condition(opcode >> 3) {
            self.regs.pc = self.pop_u16(bus);
            20
        } else {
            8
        }
    }

    /// RETI: return and enable interrupts immediately, without the EI
    /// one-instruction delay.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        16
    }

    /// RST: call to a fixed vector encoded in the opcode.
    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = u16::from(opcode & 0x38);
        16
    }
}
