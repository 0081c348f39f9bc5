use super::super::{Bus, Cpu, Flag};

impl Cpu {
    /// The ALU quarter of the opcode map (0x80-0xBF): eight operations
    /// by eight operands.
    pub(super) fn exec_alu_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let value = self.read_reg8(bus, opcode & 0x07);
        self.alu_dispatch((opcode >> 3) & 0x07, value);
        if opcode & 0x07 == 6 {
            8
        } else {
            4
        }
    }

    /// The immediate forms of the same eight operations.
    pub(super) fn exec_alu_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let value = self.fetch8(bus);
        self.alu_dispatch((opcode >> 3) & 0x07, value);
        8
    }

    fn alu_dispatch(&mut self, operation: u8, value: u8) {
        match operation {
            0 => self.add_a(value, false),
            1 => self.add_a(value, true),
            2 => self.sub_a(value, false),
            3 => self.sub_a(value, true),
            4 => self.and_a(value),
            5 => self.xor_a(value),
            6 => self.or_a(value),
            _ => self.cp_a(value),
        }
    }

    /// RLCA/RRCA/RLA/RRA. Unlike their CB twins these always clear Z.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        let a = self.regs.a;
        self.regs.a = match opcode {
            0x07 => self.rlc_value(a),
            0x0F => self.rrc_value(a),
            0x17 => self.rl_value(a),
            _ => self.rr_value(a),
        };
        self.set_flag(Flag::Z, false);
        4
    }

    /// ADD HL,rr.
    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        let value = match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        };
        self.add_hl(value);
        8
    }

    /// ADD SP,r8.
    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let imm = self.fetch8(bus);
        self.regs.sp = self.add_signed(self.regs.sp, imm);
        16
    }

    /// CPL: complement A.
    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
        4
    }

    /// SCF: set carry.
    pub(super) fn exec_scf(&mut self) -> u32 {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
        4
    }

    /// CCF: complement carry.
    pub(super) fn exec_ccf(&mut self) -> u32 {
        let carry = self.flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
        4
    }
}
