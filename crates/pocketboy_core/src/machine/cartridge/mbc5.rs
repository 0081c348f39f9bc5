/// MBC5 banking state.
///
/// The ROM bank number is 9 bits (low 8 at 0x2000-0x2FFF, bit 8 at
/// 0x3000-0x3FFF). Unlike MBC1/MBC3, bank 0 really is selectable in the
/// switchable window.
pub(super) struct Mbc5 {
    pub(super) ram_enable: bool,
    rom_bank: u16,
    ram_bank: u8,
    rom_banks: u16,
}

impl Mbc5 {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            ram_enable: false,
            rom_bank: 1,
            ram_bank: 0,
            rom_banks: (rom.len() / 0x4000).max(1) as u16,
        }
    }

    pub(super) fn control_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                self.ram_enable = value & 0x0F == 0x0A;
            }
            0x2000..=0x2FFF => {
                self.rom_bank = (self.rom_bank & 0x100) | u16::from(value);
            }
            0x3000..=0x3FFF => {
                self.rom_bank = (self.rom_bank & 0xFF) | (u16::from(value & 0x01) << 8);
            }
            0x4000..=0x5FFF => {
                self.ram_bank = value & 0x0F;
            }
            _ => {}
        }
    }

    pub(super) fn rom_offset(&self, addr: u16) -> usize {
        let bank = if addr < 0x4000 {
            0
        } else {
            self.rom_bank % self.rom_banks
        };
        (bank as usize) * 0x4000 + (addr as usize & 0x3FFF)
    }

    pub(super) fn ram_offset(&self, addr: u16) -> usize {
        (self.ram_bank as usize) * 0x2000 + (addr as usize & 0x1FFF)
    }
}
