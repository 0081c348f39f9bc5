mod alu;
mod cb;
mod exec;
mod helpers;


/// Register file for the Game Boy CPU (Sharp LR35902).
///
/// Eight 8-bit registers pairable into AF/BC/DE/HL, plus SP and PC.
#[derive(Clone, Copy, Debug, Default)]
pub struct Regs {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

macro_rules! reg_pair {
    ($get:ident, $set:ident, $hi:ident, $lo:ident) => {
        #[inline]
        pub fn $get(&self) -> u16 {
            u16::from_be_bytes([self.$hi, self.$lo])
        }

        #[inline]
        pub fn $set(&mut self, value: u16) {
            let [hi, lo] = value.to_be_bytes();
            self.$hi = hi;
            self.$lo = lo;
        }
    };
}

impl Regs {
    reg_pair!(bc, set_bc, b, c);
    reg_pair!(de, set_de, d, e);
    reg_pair!(hl, set_hl, h, l);

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // The low nibble of F does not exist in hardware.
        self.f = f & 0xF0;
    }
}

/// Flag bits in the F register, as masks.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 0x80,
    N = 0x40,
    H = 0x20,
    C = 0x10,
}

/// What the CPU sees of the rest of the machine.
///
/// The system bus implements this; tests substitute a flat RAM image.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Advance bus-side peripherals by the given number of T-cycles.
    /// Called once per completed instruction or interrupt entry.
    fn tick(&mut self, _cycles: u32) {}

    /// Commit a speed switch armed through KEY1, if any. Returns true
    /// when a switch happened, in which case STOP behaves as a NOP.
    fn perform_speed_switch(&mut self) -> bool {
        false
    }
}

/// Instruction-level LR35902 interpreter.
///
/// `step` runs exactly one instruction (or one interrupt entry) to
/// completion and reports its T-cycle cost; the bus is ticked with the
/// same amount so peripherals stay in lockstep.
pub struct Cpu {
    pub regs: Regs,
    pub ime: bool,
    pub halted: bool,
    /// STOP low-power state: the clocks freeze until a joypad line goes
    /// low. Modeled by polling P1 on each step while stopped.
    stopped: bool,
    halt_bug: bool,
    // EI takes effect after the following instruction; the two flags
    // implement that one-instruction delay.
    ime_enable_pending: bool,
    ime_enable_delay: bool,
    /// Set after executing one of the opcode holes (0xD3, 0xDB, ...),
    /// which hard-lock the CPU until power-off on hardware. A locked
    /// CPU reports 0 cycles from `step` so drivers can bail out.
    locked: bool,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A CPU in the state the DMG boot ROM leaves behind at 0x0100.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Regs::default(),
            ime: false,
            halted: false,
            stopped: false,
            halt_bug: false,
            ime_enable_pending: false,
            ime_enable_delay: false,
            locked: false,
        };
        cpu.regs.set_af(0x01B0);
        cpu.regs.set_bc(0x0013);
        cpu.regs.set_de(0x00D8);
        cpu.regs.set_hl(0x014D);
        cpu.regs.sp = 0xFFFE;
        cpu.regs.pc = 0x0100;
        cpu
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        self.regs.f & flag as u8 != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.regs.f |= flag as u8;
        } else {
            self.regs.f &= !(flag as u8);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Execute one instruction (or service one interrupt) and return
    /// its cost in T-cycles.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.locked {
            return 0;
        }

        if self.stopped {
            // STOP freezes the clocks, so the bus is not ticked; a low
            // joypad input line resumes execution.
            if bus.read8(0xFF00) & 0x0F != 0x0F {
                self.stopped = false;
            }
            return 4;
        }

        if let Some(cycles) = self.service_interrupt(bus) {
            bus.tick(cycles);
            return cycles;
        }

        if self.halted {
            // HALT burns cycles until an interrupt line wakes us.
            bus.tick(4);
            return 4;
        }

        let opcode = self.fetch8(bus);
        let cycles = self.exec_opcode(bus, opcode);
        bus.tick(cycles);
        self.apply_ime_delay();
        cycles
    }

    /// Take the highest-priority pending-and-enabled interrupt, if IME
    /// allows. A pending line always clears HALT, serviced or not.
    fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let pending = bus.read8(0xFF0F) & bus.read8(0xFFFF) & 0x1F;
        if pending == 0 {
            return None;
        }
        self.halted = false;
        if !self.ime {
            return None;
        }

        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;

        // Lowest set bit wins: V-blank > STAT > timer > serial > joypad.
        let index = pending.trailing_zeros() as u8;
        let iflags = bus.read8(0xFF0F);
        bus.write8(0xFF0F, iflags & !(1 << index));

        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        self.regs.pc = 0x0040 + u16::from(index) * 8;
        log::trace!(
            "[cpu] interrupt {} taken, pc 0x{pc:04X} -> 0x{:04X}",
            index,
            self.regs.pc
        );

        // Two idle cycles, two stack pushes, one jump cycle.
        Some(20)
    }

    fn apply_ime_delay(&mut self) {
        if self.ime_enable_pending {
            if self.ime_enable_delay {
                self.ime_enable_delay = false;
            } else {
                self.ime = true;
                self.ime_enable_pending = false;
            }
        }
    }
}
