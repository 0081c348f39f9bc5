mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu};

impl Cpu {
    /// Decode and execute one opcode, returning its T-cycle cost.
    /// Conditional instructions return the cost of the path taken.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        match opcode {
            // NOP
            0x00 => 4,

            // CB prefix page.
            0xCB => self.exec_cb(bus),

            // HALT sits in the middle of the LD r,r' block.
            0x76 => self.exec_halt(bus),

            // Loads.
            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(bus, opcode),
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                self.exec_ld_r_d8(bus, opcode)
            }
            0x08 => self.exec_ld_a16_sp(bus),
            0x40..=0x7F => self.exec_ld_r_r(bus, opcode),
            0xE0 | 0xF0 => self.exec_ldh_a8(bus, opcode),
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),
            0xEA | 0xFA => self.exec_ld_a16_a(bus, opcode),
            0xF8 => self.exec_ld_hl_sp_r8(bus),
            0xF9 => {
                self.regs.sp = self.regs.hl();
                8
            }

            // Increments and decrements.
            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc_rr(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec_rr(opcode),
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => self.exec_inc_r(bus, opcode),
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => self.exec_dec_r(bus, opcode),

            // 8-bit ALU.
            0x80..=0xBF => self.exec_alu_r(bus, opcode),
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => self.exec_alu_d8(bus, opcode),
            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),
            0x27 => {
                self.daa();
                4
            }
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            // 16-bit ALU.
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(opcode),
            0xE8 => self.exec_add_sp_r8(bus),

            // Control flow.
            0x18 => self.exec_jr(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => {
                let taken = self.condition(opcode >> 3);
                self.exec_jr(bus, taken)
            }
            0xC3 => self.exec_jp(bus, true),
            0xC2 | 0xCA | 0xD2 | 0xDA => {
                let taken = self.condition(opcode >> 3);
                self.exec_jp(bus, taken)
            }
            0xE9 => {
                self.regs.pc = self.regs.hl();
                4
            }
            0xCD => self.exec_call(bus, true),
            0xC4 | 0xCC | 0xD4 | 0xDC => {
                let taken = self.condition(opcode >> 3);
                self.exec_call(bus, taken)
            }
            0xC9 => self.exec_ret(bus),
            0xC0 | 0xC8 | 0xD0 | 0xD8 => self.exec_ret_cc(bus, opcode),
            0xD9 => self.exec_reti(bus),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(bus, opcode),

            // Stack.
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push_rr(bus, opcode),
            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop_rr(bus, opcode),

            // Interrupt master control and STOP.
            0xF3 => self.exec_di(),
            0xFB => self.exec_ei(),
            0x10 => self.exec_stop(bus),

            // Opcode holes (0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC,
            // 0xED, 0xF4, 0xFC, 0xFD): the CPU hard-locks until reset.
            _ => {
                let at = self.regs.pc.wrapping_sub(1);
                log::error!(
                    "[cpu] locked on invalid opcode 0x{opcode:02X} at 0x{at:04X} \
                     (AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X} SP=0x{:04X})",
                    self.regs.af(),
                    self.regs.bc(),
                    self.regs.de(),
                    self.regs.hl(),
                    self.regs.sp,
                );
                self.locked = true;
                0
            }
        }
    }
}
