use super::{Bus, Cpu, Flag};

impl Cpu {
    /// CB-prefixed page: rotates, shifts, SWAP, and the BIT/RES/SET
    /// families. The operand is always the register selected by the low
    /// three bits, with index 6 going through (HL).
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let op = self.fetch8(bus);
        let target = op & 0x07;
        let bit = (op >> 3) & 0x07;

        match op >> 6 {
            0 => {
                let value = self.read_reg8(bus, target);
                let result = match bit {
                    0 => self.rlc_value(value),
                    1 => self.rrc_value(value),
                    2 => self.rl_value(value),
                    3 => self.rr_value(value),
                    4 => self.sla_value(value),
                    5 => self.sra_value(value),
                    6 => self.swap_value(value),
                    _ => self.srl_value(value),
                };
                self.write_reg8(bus, target, result);
                if target == 6 {
                    16
                } else {
                    8
                }
            }
            1 => {
                // BIT b,r: read-only, C preserved.
                let value = self.read_reg8(bus, target);
                self.set_flag(Flag::Z, value & (1 << bit) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
                if target == 6 {
                    12
                } else {
                    8
                }
            }
            2 => {
                let value = self.read_reg8(bus, target) & !(1 << bit);
                self.write_reg8(bus, target, value);
                if target == 6 {
                    16
                } else {
                    8
                }
            }
            _ => {
                let value = self.read_reg8(bus, target) | (1 << bit);
                self.write_reg8(bus, target, value);
                if target == 6 {
                    16
                } else {
                    8
                }
            }
        }
    }
}
