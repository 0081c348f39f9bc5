use super::interrupts::{Interrupt, Interrupts};

/// TIMA tick periods in T-cycles for TAC bits 1:0, i.e. the four
/// selectable rates 4096 / 262144 / 65536 / 16384 Hz at 4.194304 MHz.
const TIMA_PERIODS: [u32; 4] = [1024, 16, 64, 256];

/// DIV increments every 256 T-cycles at single speed.
const DIV_PERIOD: u32 = 256;

/// Timer / divider unit.
///
/// Advanced in batches by the frame driver: `advance(cycles)` accumulates
/// elapsed T-cycles against two independent thresholds, one for the
/// free-running divider and one for the programmable counter. The
/// accumulators carry their remainder across calls so no cycles are lost.
pub(crate) struct Timer {
    /// DIV (FF04). Writing any value clears it.
    div: u8,
    /// TIMA (FF05).
    tima: u8,
    /// TMA (FF06): value reloaded into TIMA on overflow.
    tma: u8,
    /// TAC (FF07): bit 2 = start, bits 1:0 = rate select.
    tac: u8,
    div_acc: u32,
    tima_acc: u32,
}

impl Timer {
    pub(crate) fn new() -> Self {
        Self {
            div: 0,
            tima: 0,
            tma: 0,
            tac: 0,
            div_acc: 0,
            tima_acc: 0,
        }
    }

    /// Advance the timer by `cycles` display-clock T-cycles.
    ///
    /// DIV and TIMA are clocked by the CPU, so in double-speed mode the
    /// thresholds halve: one display-clock cycle is two CPU cycles, and
    /// both counters tick twice as fast in wall-clock terms.
    pub(crate) fn advance(&mut self, cycles: u32, double_speed: bool, ints: &mut Interrupts) {
        let div_period = if double_speed {
            DIV_PERIOD / 2
        } else {
            DIV_PERIOD
        };
        self.div_acc += cycles;
        while self.div_acc >= div_period {
            self.div_acc -= div_period;
            self.div = self.div.wrapping_add(1);
        }

        if self.tac & 0x04 == 0 {
            return;
        }

        let mut period = TIMA_PERIODS[(self.tac & 0x03) as usize];
        if double_speed {
            period /= 2;
        }
        self.tima_acc += cycles;
        while self.tima_acc >= period {
            self.tima_acc -= period;
            let (next, overflow) = self.tima.overflowing_add(1);
            if overflow {
                // Reload from TMA and raise the timer interrupt, once
                // per overflow.
                self.tima = self.tma;
                ints.request(Interrupt::Timer);
            } else {
                self.tima = next;
            }
        }
    }

    pub(crate) fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => self.div,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0b1111_1000,
            _ => 0xFF,
        }
    }

    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF04 => {
                // Writing DIV always resets it, regardless of the value.
                self.div = 0;
                self.div_acc = 0;
            }
            0xFF05 => self.tima = value,
            0xFF06 => self.tma = value,
            0xFF07 => {
                log::debug!("[timer] TAC = 0x{value:02X}");
                self.tac = value & 0x07;
            }
            _ => {}
        }
    }
}
