use super::super::{Bus, Cpu};

impl Cpu {
    /// HALT: sleep until an interrupt line is raised.
    ///
    /// Entering HALT with IME clear while an enabled interrupt is
    /// already pending triggers the hardware HALT bug instead: the CPU
    /// does not halt and the next opcode fetch fails to advance PC.
    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let pending = bus.read8(0xFF0F) & bus.read8(0xFFFF) & 0x1F;
        if !self.ime && pending != 0 {
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
        4
    }

    /// STOP (0x10 0x00).
    ///
    /// With a speed switch armed through KEY1 this commits the switch
    /// and continues; otherwise the clocks freeze until a joypad line
    /// goes low.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> u32 {
        // Skip the padding byte.
        let _ = self.fetch8(bus);
        if !bus.perform_speed_switch() {
            self.stopped = true;
        }
        4
    }

    /// DI: interrupts off at once, cancelling any pending EI.
    pub(super) fn exec_di(&mut self) -> u32 {
        self.ime = false;
        self.ime_enable_pending = false;
        self.ime_enable_delay = false;
        4
    }

    /// EI: interrupts come on after the *next* instruction.
    pub(super) fn exec_ei(&mut self) -> u32 {
        if !self.ime {
            self.ime_enable_pending = true;
            self.ime_enable_delay = true;
        }
        4
    }
}
