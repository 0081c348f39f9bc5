use super::super::{Bus, Cpu};

impl Cpu {
    /// PUSH rr for BC/DE/HL/AF.
    pub(super) fn exec_push_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        };
        self.push_u16(bus, value);
        16
    }

    /// POP rr for BC/DE/HL/AF. POP AF masks the low nibble of F.
    pub(super) fn exec_pop_rr<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let value = self.pop_u16(bus);
        match (opcode >> 4) & 0x03 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.set_af(value),
        }
        12
    }
}
