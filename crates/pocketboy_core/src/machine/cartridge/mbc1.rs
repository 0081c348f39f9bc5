/// MBC1 banking state.
///
/// ROM banking uses a 5-bit low register plus a 2-bit high register; a
/// mode flag decides whether the high bits extend the ROM bank number
/// (mode 0) or select the RAM bank (mode 1). Writing zero to the low
/// register selects bank 1: bank 0 is never reachable through the
/// switchable window.
pub(super) struct Mbc1 {
    pub(super) ram_enable: bool,
    bank_lo5: u8,
    bank_hi2: u8,
    /// 0 = ROM banking mode, 1 = RAM banking mode.
    mode: u8,
    rom_banks: u16,
}

impl Mbc1 {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            ram_enable: false,
            bank_lo5: 1,
            bank_hi2: 0,
            mode: 0,
            rom_banks: (rom.len() / 0x4000).max(1) as u16,
        }
    }

    pub(super) fn control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.ram_enable = value & 0x0F == 0x0A;
            }
            0x2000..=0x3FFF => {
                let mut bank = value & 0x1F;
                if bank == 0 {
                    bank = 1;
                }
                self.bank_lo5 = bank;
            }
            0x4000..=0x5FFF => {
                self.bank_hi2 = value & 0x03;
            }
            0x6000..=0x7FFF => {
                self.mode = value & 0x01;
            }
            _ => {}
        }
    }

    /// Translate a ROM-window address into a physical ROM offset.
    pub(super) fn rom_offset(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 {
            0
        } else if self.mode == 0 {
            u16::from(self.bank_lo5) | (u16::from(self.bank_hi2) << 5)
        } else {
            // RAM banking mode: only banks 0x01-0x1F reachable.
            u16::from(self.bank_lo5)
        };
        let bank = bank % self.rom_banks;
        (bank as usize) * 0x4000 + (addr as usize & 0x3FFF)
    }

    pub(super) fn ram_offset(&self, addr: u16) -> usize {
        let bank = if self.mode == 1 { self.bank_hi2 } else { 0 };
        (bank as usize) * 0x2000 + (addr as usize & 0x1FFF)
    }
}
