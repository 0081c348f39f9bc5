use super::cartridge::Cartridge;
use super::interrupts::Interrupts;
use super::joypad::Joypad;
use super::ppu::Ppu;
use super::serial::Serial;
use super::timer::Timer;
use super::Model;
use crate::cpu;

/// System bus: owns every component behind the CPU and decodes the
/// 16-bit address space onto them.
///
/// `advance` is the clock fan-out: the CPU reports elapsed T-cycles
/// after each instruction and the bus distributes them to the PPU and
/// timer, draining H-blank VRAM DMA as H-blank phases are entered.
pub(crate) struct Bus {
    pub(crate) cartridge: Cartridge,
    pub(crate) ppu: Ppu,
    pub(crate) timer: Timer,
    pub(crate) joypad: Joypad,
    pub(crate) serial: Serial,
    pub(crate) ints: Interrupts,

    wram: Box<[[u8; 0x1000]; 8]>,
    hram: [u8; 0x7F],
    /// WRAM bank select (SVBK, CGB only); bank 0 selects 1.
    svbk: u8,
    /// Sound register block (0xFF10-0xFF3F). Stored for read-back so
    /// games polling it see their own writes; no audio is synthesized.
    apu_regs: [u8; 0x30],

    cgb: bool,
    double_speed: bool,
    /// KEY1 bit 0: a speed switch happens on the next STOP.
    speed_switch_armed: bool,

    // VRAM DMA (CGB). Source is a bus address, destination an offset
    // into VRAM; both advance as blocks are copied.
    hdma_src: u16,
    hdma_dst: u16,
    /// Remaining 16-byte blocks of an H-blank transfer.
    hdma_remaining: u8,
    hdma_active: bool,
}

impl Bus {
    pub(crate) fn new(cartridge: Cartridge, model: Model) -> Self {
        let cgb = match model {
            Model::Dmg => false,
            Model::Cgb => true,
            Model::Auto => cartridge.supports_cgb(),
        };
        log::info!(
            "[bus] running as {}",
            if cgb { "Game Boy Color" } else { "Game Boy" }
        );
        Self {
            ppu: Ppu::new(cgb),
            cartridge,
            timer: Timer::new(),
            joypad: Joypad::new(),
            serial: Serial::new(),
            ints: Interrupts::default(),
            wram: Box::new([[0; 0x1000]; 8]),
            hram: [0; 0x7F],
            svbk: 1,
            apu_regs: [0; 0x30],
            cgb,
            double_speed: false,
            speed_switch_armed: false,
            hdma_src: 0,
            hdma_dst: 0,
            hdma_remaining: 0,
            hdma_active: false,
        }
    }

    pub(crate) fn is_cgb(&self) -> bool {
        self.cgb
    }

    pub(crate) fn is_double_speed(&self) -> bool {
        self.double_speed
    }

    /// Distribute elapsed T-cycles to the clocked components.
    ///
    /// In double-speed mode the CPU runs twice as fast relative to the
    /// display, so the PPU and the timer both see half the cycles; the
    /// timer then halves its thresholds so DIV and TIMA follow the
    /// doubled CPU clock rather than the display clock.
    pub(crate) fn advance(&mut self, cycles: u32) {
        let ppu_cycles = if self.double_speed { cycles / 2 } else { cycles };
        let hblanks = self.ppu.advance(ppu_cycles, &mut self.ints);
        for _ in 0..hblanks {
            if !self.hdma_active {
                break;
            }
            self.hdma_copy_block();
            self.hdma_remaining -= 1;
            if self.hdma_remaining == 0 {
                self.hdma_active = false;
            }
        }
        self.timer.advance(ppu_cycles, self.double_speed, &mut self.ints);
    }

    pub(crate) fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_read(addr),
            0x8000..=0x9FFF => self.ppu.vram_read(addr),
            0xA000..=0xBFFF => self.cartridge.ram_read(addr),
            0xC000..=0xCFFF => self.wram[0][(addr & 0x0FFF) as usize],
            0xD000..=0xDFFF => self.wram[self.wram_bank()][(addr & 0x0FFF) as usize],
            // Echo RAM aliases 0xC000-0xDDFF.
            0xE000..=0xFDFF => self.read8(addr - 0x2000),
            0xFE00..=0xFE9F => self.ppu.oam_read(addr),
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.hram[(addr & 0x7F) as usize],
            0xFFFF => self.ints.read_enabled(),
        }
    }

    pub(crate) fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_write(addr, value),
            0x8000..=0x9FFF => self.ppu.vram_write(addr, value),
            0xA000..=0xBFFF => self.cartridge.ram_write(addr, value),
            0xC000..=0xCFFF => self.wram[0][(addr & 0x0FFF) as usize] = value,
            0xD000..=0xDFFF => {
                let bank = self.wram_bank();
                self.wram[bank][(addr & 0x0FFF) as usize] = value;
            }
            0xE000..=0xFDFF => self.write8(addr - 0x2000, value),
            0xFE00..=0xFE9F => self.ppu.oam_write(addr, value),
            0xFEA0..=0xFEFF => {}
            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.hram[(addr & 0x7F) as usize] = value,
            0xFFFF => self.ints.write_enabled(value),
        }
    }

    fn wram_bank(&self) -> usize {
        if self.cgb {
            (self.svbk & 0x07).max(1) as usize
        } else {
            1
        }
    }

    fn read_io(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.read_sb(),
            0xFF02 => self.serial.read_sc(),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.ints.read_pending(),
            0xFF10..=0xFF3F => self.apu_regs[(addr - 0xFF10) as usize],
            0xFF40..=0xFF4B => self.ppu.read_reg(addr),
            0xFF4D if self.cgb => {
                let mut key1 = 0x7E;
                if self.speed_switch_armed {
                    key1 |= 0x01;
                }
                if self.double_speed {
                    key1 |= 0x80;
                }
                key1
            }
            0xFF4F if self.cgb => self.ppu.read_reg(addr),
            // VRAM DMA source/destination registers are write-only.
            0xFF51..=0xFF54 if self.cgb => 0xFF,
            0xFF55 if self.cgb => {
                if self.hdma_active {
                    self.hdma_remaining - 1
                } else if self.hdma_remaining > 0 {
                    // Cancelled mid-transfer.
                    0x80 | (self.hdma_remaining - 1)
                } else {
                    0xFF
                }
            }
            0xFF68..=0xFF6B if self.cgb => self.ppu.read_reg(addr),
            0xFF70 if self.cgb => 0xF8 | self.svbk,
            _ => {
                log::debug!("[bus] read from unmapped I/O port 0x{addr:04X}");
                0xFF
            }
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01 => self.serial.write_sb(value),
            0xFF02 => self.serial.write_sc(value, &mut self.ints),
            0xFF04..=0xFF07 => self.timer.write(addr, value),
            0xFF0F => self.ints.write_pending(value),
            0xFF10..=0xFF3F => self.apu_regs[(addr - 0xFF10) as usize] = value,
            0xFF46 => {
                self.ppu.write_reg(addr, value);
                self.oam_dma(value);
            }
            0xFF40..=0xFF4B => self.ppu.write_reg(addr, value),
            0xFF4D if self.cgb => self.speed_switch_armed = value & 0x01 != 0,
            0xFF4F if self.cgb => self.ppu.write_reg(addr, value),
            0xFF51 if self.cgb => {
                self.hdma_src = (self.hdma_src & 0x00FF) | (u16::from(value) << 8);
            }
            0xFF52 if self.cgb => {
                self.hdma_src = (self.hdma_src & 0xFF00) | u16::from(value & 0xF0);
            }
            0xFF53 if self.cgb => {
                self.hdma_dst = (self.hdma_dst & 0x00FF) | (u16::from(value & 0x1F) << 8);
            }
            0xFF54 if self.cgb => {
                self.hdma_dst = (self.hdma_dst & 0xFF00) | u16::from(value & 0xF0);
            }
            0xFF55 if self.cgb => self.start_vram_dma(value),
            0xFF68..=0xFF6B if self.cgb => self.ppu.write_reg(addr, value),
            0xFF70 if self.cgb => self.svbk = value & 0x07,
            _ => {
                log::debug!("[bus] write to unmapped I/O port 0x{addr:04X} value 0x{value:02X}");
            }
        }
    }

    /// OAM DMA (0xFF46): copy 0xA0 bytes from `value << 8` into OAM.
    /// Modeled as instantaneous; the CPU lockout window is not enforced.
    fn oam_dma(&mut self, value: u8) {
        let src = u16::from(value) << 8;
        for i in 0..0xA0 {
            let byte = self.read8(src + i);
            self.ppu.oam_write(0xFE00 + i, byte);
        }
    }

    /// HDMA5 write: bit 7 arms an H-blank transfer of one 16-byte block
    /// per H-blank; bit 7 clear runs the whole transfer immediately, or
    /// cancels an armed transfer in progress.
    fn start_vram_dma(&mut self, value: u8) {
        if self.hdma_active && value & 0x80 == 0 {
            self.hdma_active = false;
            return;
        }
        self.hdma_remaining = (value & 0x7F) + 1;
        if value & 0x80 != 0 {
            self.hdma_active = true;
        } else {
            while self.hdma_remaining > 0 {
                self.hdma_copy_block();
                self.hdma_remaining -= 1;
            }
        }
    }

    fn hdma_copy_block(&mut self) {
        for _ in 0..16 {
            let byte = self.read8(self.hdma_src);
            self.ppu.vram_dma_write(self.hdma_dst, byte);
            self.hdma_src = self.hdma_src.wrapping_add(1);
            self.hdma_dst = (self.hdma_dst + 1) & 0x1FFF;
        }
    }
}

impl cpu::Bus for Bus {
    fn read8(&mut self, addr: u16) -> u8 {
        Bus::read8(self, addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        Bus::write8(self, addr, value)
    }

    fn tick(&mut self, cycles: u32) {
        self.advance(cycles);
    }

    fn perform_speed_switch(&mut self) -> bool {
        if self.speed_switch_armed {
            self.speed_switch_armed = false;
            self.double_speed = !self.double_speed;
            log::info!(
                "[bus] speed switch: now in {} mode",
                if self.double_speed { "double" } else { "normal" }
            );
            true
        } else {
            false
        }
    }
}
