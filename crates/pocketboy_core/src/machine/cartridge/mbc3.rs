use std::time::{SystemTime, UNIX_EPOCH};

/// MBC3 real-time clock.
///
/// Backed by the host wall clock: a latch write captures a consistent
/// snapshot of seconds/minutes/hours/days that the RTC register block
/// then reads from. Register writes adjust the snapshot only; they do
/// not move the host clock.
pub(super) struct Rtc {
    seconds: u8,
    minutes: u8,
    hours: u8,
    /// Day counter, 9 bits; bit 8 lives in the DH register.
    days: u16,
    /// DH bit 7: sticky carry, set when the day counter wraps past 511.
    day_carry: bool,
    /// DH bit 6: halt flag.
    halted: bool,
    latch_prev: u8,
}

impl Rtc {
    fn new() -> Self {
        let mut rtc = Self {
            seconds: 0,
            minutes: 0,
            hours: 0,
            days: 0,
            day_carry: false,
            halted: false,
            latch_prev: 0xFF,
        };
        rtc.capture();
        rtc
    }

    /// Capture the current wall-clock time into the latched registers.
    fn capture(&mut self) {
        if self.halted {
            return;
        }
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.seconds = (secs % 60) as u8;
        self.minutes = (secs / 60 % 60) as u8;
        self.hours = (secs / 3600 % 24) as u8;
        let days = (secs / 86400 % 512) as u16;
        // The carry is sticky: once the counter wraps past 511 it stays
        // set until software clears it through DH.
        if days < self.days {
            self.day_carry = true;
        }
        self.days = days;
    }

    /// Latch sequence: a 0x00 write followed by a 0x01 write takes a
    /// fresh snapshot.
    pub(super) fn latch_write(&mut self, value: u8) {
        if self.latch_prev == 0x00 && value == 0x01 {
            self.capture();
            log::debug!(
                "[mbc] RTC latched {:02}:{:02}:{:02} day {}",
                self.hours,
                self.minutes,
                self.seconds,
                self.days
            );
        }
        self.latch_prev = value;
    }

    pub(super) fn read(&self, reg: u8) -> u8 {
        match reg {
            0x08 => self.seconds,
            0x09 => self.minutes,
            0x0A => self.hours,
            0x0B => self.days as u8,
            0x0C => {
                let mut dh = ((self.days >> 8) & 0x01) as u8;
                if self.halted {
                    dh |= 0x40;
                }
                if self.day_carry {
                    dh |= 0x80;
                }
                dh
            }
            _ => 0xFF,
        }
    }

    pub(super) fn write(&mut self, reg: u8, value: u8) {
        match reg {
            0x08 => self.seconds = value % 60,
            0x09 => self.minutes = value % 60,
            0x0A => self.hours = value % 24,
            0x0B => self.days = (self.days & 0x100) | u16::from(value),
            0x0C => {
                self.days = (self.days & 0xFF) | (u16::from(value & 0x01) << 8);
                self.halted = value & 0x40 != 0;
                self.day_carry = value & 0x80 != 0;
            }
            _ => {}
        }
    }
}

/// MBC3 banking state: 7-bit ROM bank select (zero reads as one), a
/// combined RAM-bank / RTC-register selector, and the clock block.
pub(super) struct Mbc3 {
    pub(super) ram_rtc_enable: bool,
    pub(super) rtc: Rtc,
    rom_bank: u8,
    /// 0x00-0x03 selects a RAM bank; 0x08-0x0C selects an RTC register.
    ram_rtc_select: u8,
    rom_banks: u16,
}

impl Mbc3 {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            ram_rtc_enable: false,
            rtc: Rtc::new(),
            rom_bank: 1,
            ram_rtc_select: 0,
            rom_banks: (rom.len() / 0x4000).max(1) as u16,
        }
    }

    pub(super) fn control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.ram_rtc_enable = value & 0x0F == 0x0A;
            }
            0x2000..=0x3FFF => {
                let mut bank = value & 0x7F;
                if bank == 0 {
                    bank = 1;
                }
                self.rom_bank = bank;
            }
            0x4000..=0x5FFF => {
                self.ram_rtc_select = value & 0x0F;
            }
            0x6000..=0x7FFF => {
                self.rtc.latch_write(value);
            }
            _ => {}
        }
    }

    /// The RTC register currently mapped at 0xA000, if any.
    pub(super) fn rtc_register(&self) -> Option<u8> {
        if (0x08..=0x0C).contains(&self.ram_rtc_select) {
            Some(self.ram_rtc_select)
        } else {
            None
        }
    }

    pub(super) fn rom_offset(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 {
            0
        } else {
            u16::from(self.rom_bank) % self.rom_banks
        };
        (bank as usize) * 0x4000 + (addr as usize & 0x3FFF)
    }

    pub(super) fn ram_offset(&self, addr: u16) -> usize {
        let bank = self.ram_rtc_select & 0x03;
        (bank as usize) * 0x2000 + (addr as usize & 0x1FFF)
    }
}
