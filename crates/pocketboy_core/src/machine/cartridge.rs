mod mbc1;
mod mbc3;
mod mbc5;

use std::path::PathBuf;

use mbc1::Mbc1;
use mbc3::Mbc3;
use mbc5::Mbc5;

/// Fixed-offset cartridge header fields the core cares about.
#[derive(Clone, Debug)]
pub struct Header {
    /// Title, 16 bytes at 0x134, trimmed of padding.
    pub title: String,
    /// Color-compatibility byte at 0x143 (0x80 = enhanced, 0xC0 = CGB-only).
    pub cgb_flag: u8,
    /// Cartridge/controller type byte at 0x147.
    pub cart_type: u8,
    /// RAM size code at 0x149.
    pub ram_size_code: u8,
}

impl Header {
    pub fn parse(rom: &[u8]) -> Self {
        let title_bytes = rom.get(0x134..0x144).unwrap_or(&[]);
        let title: String = title_bytes
            .iter()
            .take_while(|&&b| b != 0)
            .filter(|b| b.is_ascii_graphic() || **b == b' ')
            .map(|&b| b as char)
            .collect();
        Self {
            title,
            cgb_flag: rom.get(0x143).copied().unwrap_or(0),
            cart_type: rom.get(0x147).copied().unwrap_or(0),
            ram_size_code: rom.get(0x149).copied().unwrap_or(0),
        }
    }

    /// External RAM size for the header's RAM size code.
    pub fn ram_size_bytes(&self) -> usize {
        match self.ram_size_code {
            0x01 => 0x800,    // 2 KiB
            0x02 => 0x2000,   // 8 KiB
            0x03 => 0x8000,   // 32 KiB
            0x04 => 0x20000,  // 128 KiB
            0x05 => 0x10000,  // 64 KiB
            _ => 0,
        }
    }

    /// True when the cartridge type includes battery-backed RAM.
    pub fn has_battery(&self) -> bool {
        matches!(
            self.cart_type,
            0x03 | 0x0F | 0x10 | 0x13 | 0x1B | 0x1E
        )
    }
}

enum Mapper {
    RomOnly,
    Mbc1(Mbc1),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

/// A loaded cartridge: ROM image, mapper state, external RAM, and the
/// optional battery-save file backing that RAM.
pub struct Cartridge {
    pub header: Header,
    rom: Vec<u8>,
    ram: Vec<u8>,
    mapper: Mapper,
    ram_dirty: bool,
    save_path: Option<PathBuf>,
}

impl Cartridge {
    /// Build a cartridge from a flat ROM image.
    ///
    /// `save_path` names the battery-save file derived from the ROM
    /// filename; it is loaded here when present and written back by
    /// `flush_save` when the RAM content changed.
    pub fn new(rom: Vec<u8>, save_path: Option<PathBuf>) -> Self {
        let header = Header::parse(&rom);
        log::info!("[mbc] title '{}'", header.title);

        let mapper = match header.cart_type {
            0x00 | 0x08 | 0x09 => {
                log::info!("[mbc] cartridge type 0x{:02X}: no MBC", header.cart_type);
                Mapper::RomOnly
            }
            0x01..=0x03 => {
                log::info!("[mbc] cartridge type 0x{:02X}: MBC1", header.cart_type);
                Mapper::Mbc1(Mbc1::new(&rom))
            }
            0x0F..=0x13 => {
                log::info!("[mbc] cartridge type 0x{:02X}: MBC3", header.cart_type);
                Mapper::Mbc3(Mbc3::new(&rom))
            }
            0x19..=0x1E => {
                log::info!("[mbc] cartridge type 0x{:02X}: MBC5", header.cart_type);
                Mapper::Mbc5(Mbc5::new(&rom))
            }
            other => {
                log::error!("[mbc] unsupported cartridge type 0x{other:02X}, treating as ROM-only");
                Mapper::RomOnly
            }
        };

        let mut ram = vec![0xFF; header.ram_size_bytes()];
        if let Some(path) = save_path.as_ref() {
            match std::fs::read(path) {
                Ok(data) => {
                    let len = data.len().min(ram.len());
                    ram[..len].copy_from_slice(&data[..len]);
                    log::info!("[mbc] loaded {} bytes of save RAM from {}", len, path.display());
                }
                Err(_) => log::debug!("[mbc] no save file at {}", path.display()),
            }
        }

        Self {
            header,
            rom,
            ram,
            mapper,
            ram_dirty: false,
            save_path,
        }
    }

    /// Whether the header advertises Color hardware support.
    pub fn supports_cgb(&self) -> bool {
        self.header.cgb_flag & 0x80 != 0
    }

    /// Read from the cartridge ROM window (0x0000-0x7FFF).
    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        let index = match &self.mapper {
            Mapper::RomOnly => addr as usize,
            Mapper::Mbc1(m) => m.rom_offset(addr),
            Mapper::Mbc3(m) => m.rom_offset(addr),
            Mapper::Mbc5(m) => m.rom_offset(addr),
        };
        self.rom.get(index).copied().unwrap_or(0xFF)
    }

    /// Handle a CPU write into ROM address space: bank-select and
    /// enable registers for MBC carts, silently dropped otherwise.
    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        let was_enabled = self.ram_access_enabled();
        match &mut self.mapper {
            Mapper::RomOnly => {
                log::debug!("[mbc] dropped write 0x{value:02X} to 0x{addr:04X} on ROM-only cart");
            }
            Mapper::Mbc1(m) => m.control_write(addr, value),
            Mapper::Mbc3(m) => m.control_write(addr, value),
            Mapper::Mbc5(m) => m.control_write(addr, value),
        }
        // Battery carts persist on the enable -> disable edge, the point
        // games treat as "save committed".
        if was_enabled && !self.ram_access_enabled() {
            self.flush_save();
        }
    }

    /// Read from the external RAM window (0xA000-0xBFFF).
    pub(crate) fn ram_read(&self, addr: u16) -> u8 {
        match &self.mapper {
            Mapper::RomOnly => self.ram_get(addr as usize & 0x1FFF),
            Mapper::Mbc1(m) => {
                if !m.ram_enable {
                    return 0xFF;
                }
                self.ram_get(m.ram_offset(addr))
            }
            Mapper::Mbc3(m) => {
                if !m.ram_rtc_enable {
                    return 0xFF;
                }
                match m.rtc_register() {
                    Some(reg) => m.rtc.read(reg),
                    None => self.ram_get(m.ram_offset(addr)),
                }
            }
            Mapper::Mbc5(m) => {
                if !m.ram_enable {
                    return 0xFF;
                }
                self.ram_get(m.ram_offset(addr))
            }
        }
    }

    pub(crate) fn ram_write(&mut self, addr: u16, value: u8) {
        let offset = match &mut self.mapper {
            Mapper::RomOnly => addr as usize & 0x1FFF,
            Mapper::Mbc1(m) => {
                if !m.ram_enable {
                    log::debug!("[mbc] rejected RAM write while disabled (0x{addr:04X})");
                    return;
                }
                m.ram_offset(addr)
            }
            Mapper::Mbc3(m) => {
                if !m.ram_rtc_enable {
                    log::debug!("[mbc] rejected RAM/RTC write while disabled (0x{addr:04X})");
                    return;
                }
                match m.rtc_register() {
                    Some(reg) => {
                        m.rtc.write(reg, value);
                        return;
                    }
                    None => m.ram_offset(addr),
                }
            }
            Mapper::Mbc5(m) => {
                if !m.ram_enable {
                    log::debug!("[mbc] rejected RAM write while disabled (0x{addr:04X})");
                    return;
                }
                m.ram_offset(addr)
            }
        };
        if let Some(slot) = self.ram.get_mut(offset) {
            if *slot != value {
                *slot = value;
                self.ram_dirty = true;
            }
        }
    }

    /// Write battery RAM back to the save file, if dirty and backed.
    pub fn flush_save(&mut self) {
        if !self.ram_dirty || !self.header.has_battery() {
            return;
        }
        let Some(path) = self.save_path.as_ref() else {
            return;
        };
        match std::fs::write(path, &self.ram) {
            Ok(()) => {
                log::info!("[mbc] wrote {} bytes of save RAM to {}", self.ram.len(), path.display());
                self.ram_dirty = false;
            }
            Err(err) => log::warn!("[mbc] failed to write save RAM: {err}"),
        }
    }

    fn ram_access_enabled(&self) -> bool {
        match &self.mapper {
            Mapper::RomOnly => false,
            Mapper::Mbc1(m) => m.ram_enable,
            Mapper::Mbc3(m) => m.ram_rtc_enable,
            Mapper::Mbc5(m) => m.ram_enable,
        }
    }

    #[inline]
    fn ram_get(&self, offset: usize) -> u8 {
        self.ram.get(offset).copied().unwrap_or(0xFF)
    }
}
