mod render;

use bitflags::bitflags;

use super::interrupts::{Interrupt, Interrupts};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

bitflags! {
    /// LCD control register (LCDC at 0xFF40).
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub(crate) struct Lcdc: u8 {
        const BG_ENABLE     = 0x01;
        const OBJ_ENABLE    = 0x02;
        const OBJ_SIZE      = 0x04;
        const BG_MAP        = 0x08;
        const TILE_DATA     = 0x10;
        const WINDOW_ENABLE = 0x20;
        const WINDOW_MAP    = 0x40;
        const LCD_ENABLE    = 0x80;
    }
}

/// PPU mode as reported in STAT bits 1:0.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

// Phase lengths in T-cycles: 80 + 172 + 204 = 456 per scanline,
// 456 x 154 = 70224 per frame.
const OAM_SCAN_CYCLES: u32 = 80;
const TRANSFER_CYCLES: u32 = 172;
const HBLANK_CYCLES: u32 = 204;
const LINE_CYCLES: u32 = 456;
const LAST_LINE: u8 = 153;
const VBLANK_START_LINE: u8 = 144;

/// Selectable DMG shade palettes (config `palette` key), shade 0..3 as
/// packed 0xAARRGGBB.
pub(crate) const DMG_PALETTES: [[u32; 4]; 4] = [
    // Plain greyscale.
    [0xFFFFFFFF, 0xFFAAAAAA, 0xFF555555, 0xFF000000],
    // Original DMG green.
    [0xFF9BBC0F, 0xFF8BAC0F, 0xFF306230, 0xFF0F380F],
    // Game Boy Pocket.
    [0xFFC4CFA1, 0xFF8B956D, 0xFF4D533C, 0xFF1F1F1F],
    // Pale green.
    [0xFFE0F8D0, 0xFF88C070, 0xFF346856, 0xFF081820],
];

/// Pixel-processing unit: display registers, VRAM/OAM, the scanline
/// mode state machine, and the renderer (`ppu/render.rs`).
///
/// `advance` accumulates elapsed CPU cycles and walks the mode machine
/// whenever a phase threshold is crossed, carrying the remainder over
/// so no cycles are lost between instructions.
pub(crate) struct Ppu {
    pub(crate) vram: Box<[[u8; 0x2000]; 2]>,
    pub(crate) oam: [u8; 0xA0],

    lcdc: Lcdc,
    /// Writable STAT bits 3-6 (interrupt selects). The low 3 bits are
    /// hardware-controlled and synthesized on read.
    stat_select: u8,
    scy: u8,
    scx: u8,
    ly: u8,
    lyc: u8,
    bgp: u8,
    obp0: u8,
    obp1: u8,
    wy: u8,
    wx: u8,
    /// Last value written to the DMA register (0xFF46); the copy itself
    /// is performed by the bus.
    dma: u8,

    // CGB state.
    cgb: bool,
    vbk: u8,
    bgpi: u8,
    bgpd: [u8; 64],
    obpi: u8,
    obpd: [u8; 64],

    mode: Mode,
    mode_clock: u32,
    /// Internal window line counter; advances only on scanlines where
    /// the window was actually drawn.
    window_line: u8,
    dmg_palette: usize,

    framebuffer: Vec<u32>,
    frame_ready: bool,
}

impl Ppu {
    pub(crate) fn new(cgb: bool) -> Self {
        Self {
            vram: Box::new([[0; 0x2000]; 2]),
            oam: [0; 0xA0],
            // Post-boot register state.
            lcdc: Lcdc::from_bits_truncate(0x91),
            stat_select: 0,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0xFC,
            obp0: 0xFF,
            obp1: 0xFF,
            wy: 0,
            wx: 0,
            dma: 0,
            cgb,
            vbk: 0,
            bgpi: 0,
            bgpd: [0xFF; 64],
            obpi: 0,
            obpd: [0xFF; 64],
            mode: Mode::OamScan,
            mode_clock: 0,
            window_line: 0,
            dmg_palette: 0,
            framebuffer: vec![DMG_PALETTES[0][0]; SCREEN_WIDTH * SCREEN_HEIGHT],
            frame_ready: false,
        }
    }

    /// Select one of the DMG shade palettes (no effect on CGB carts).
    pub(crate) fn set_dmg_palette(&mut self, index: usize) {
        self.dmg_palette = index % DMG_PALETTES.len();
    }

    pub(crate) fn framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Take the frame-ready flag set on V-blank entry.
    pub(crate) fn take_frame_ready(&mut self) -> bool {
        std::mem::take(&mut self.frame_ready)
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    /// Advance the mode state machine by `cycles` elapsed T-cycles.
    ///
    /// Returns the number of H-blank phases entered, which the bus uses
    /// to drain armed H-blank VRAM DMA transfers.
    pub(crate) fn advance(&mut self, cycles: u32, ints: &mut Interrupts) -> u32 {
        if !self.lcdc.contains(Lcdc::LCD_ENABLE) {
            return 0;
        }

        let mut hblanks = 0;
        self.mode_clock += cycles;
        loop {
            match self.mode {
                Mode::OamScan => {
                    if self.mode_clock < OAM_SCAN_CYCLES {
                        break;
                    }
                    self.mode_clock -= OAM_SCAN_CYCLES;
                    self.set_mode(Mode::Transfer, ints);
                    // One whole scanline is rendered at the start of the
                    // pixel-transfer period.
                    self.render_scanline();
                }
                Mode::Transfer => {
                    if self.mode_clock < TRANSFER_CYCLES {
                        break;
                    }
                    self.mode_clock -= TRANSFER_CYCLES;
                    self.set_mode(Mode::HBlank, ints);
                    hblanks += 1;
                }
                Mode::HBlank => {
                    if self.mode_clock < HBLANK_CYCLES {
                        break;
                    }
                    self.mode_clock -= HBLANK_CYCLES;
                    self.set_ly(self.ly + 1, ints);
                    if self.ly >= VBLANK_START_LINE {
                        self.set_mode(Mode::VBlank, ints);
                        ints.request(Interrupt::VBlank);
                        self.frame_ready = true;
                    } else {
                        self.set_mode(Mode::OamScan, ints);
                    }
                }
                Mode::VBlank => {
                    if self.mode_clock < LINE_CYCLES {
                        break;
                    }
                    self.mode_clock -= LINE_CYCLES;
                    if self.ly >= LAST_LINE {
                        self.set_ly(0, ints);
                        self.window_line = 0;
                        self.set_mode(Mode::OamScan, ints);
                    } else {
                        self.set_ly(self.ly + 1, ints);
                    }
                }
            }
        }
        hblanks
    }

    fn set_mode(&mut self, mode: Mode, ints: &mut Interrupts) {
        self.mode = mode;
        // STAT interrupt on entering a mode whose select bit is set.
        let select = match mode {
            Mode::HBlank => 0x08,
            Mode::VBlank => 0x10,
            Mode::OamScan => 0x20,
            Mode::Transfer => 0x00,
        };
        if self.stat_select & select != 0 {
            ints.request(Interrupt::Stat);
        }
    }

    fn set_ly(&mut self, value: u8, ints: &mut Interrupts) {
        self.ly = value;
        if self.ly == self.lyc && self.stat_select & 0x40 != 0 {
            ints.request(Interrupt::Stat);
        }
    }

    pub(crate) fn vram_read(&self, addr: u16) -> u8 {
        self.vram[self.vbk as usize][(addr & 0x1FFF) as usize]
    }

    pub(crate) fn vram_write(&mut self, addr: u16, value: u8) {
        self.vram[self.vbk as usize][(addr & 0x1FFF) as usize] = value;
    }

    /// Write one byte into VRAM on behalf of a VRAM DMA transfer.
    pub(crate) fn vram_dma_write(&mut self, offset: u16, value: u8) {
        self.vram[self.vbk as usize][(offset & 0x1FFF) as usize] = value;
    }

    pub(crate) fn read_reg(&self, addr: u16) -> u8 {
        match addr {
            0xFF40 => self.lcdc.bits(),
            0xFF41 => {
                let coincidence = if self.ly == self.lyc { 0x04 } else { 0 };
                let mode = if self.lcdc.contains(Lcdc::LCD_ENABLE) {
                    self.mode as u8
                } else {
                    0
                };
                0x80 | self.stat_select | coincidence | mode
            }
            0xFF42 => self.scy,
            0xFF43 => self.scx,
            0xFF44 => self.ly,
            0xFF45 => self.lyc,
            0xFF46 => self.dma,
            0xFF47 => self.bgp,
            0xFF48 => self.obp0,
            0xFF49 => self.obp1,
            0xFF4A => self.wy,
            0xFF4B => self.wx,
            0xFF4F if self.cgb => 0xFE | self.vbk,
            0xFF68 if self.cgb => self.bgpi,
            0xFF69 if self.cgb => self.bgpd[(self.bgpi & 0x3F) as usize],
            0xFF6A if self.cgb => self.obpi,
            0xFF6B if self.cgb => self.obpd[(self.obpi & 0x3F) as usize],
            _ => {
                log::warn!("[ppu] unimplemented read from display register 0x{addr:04X}");
                0xFF
            }
        }
    }

    pub(crate) fn write_reg(&mut self, addr: u16, value: u8) {
        match addr {
            0xFF40 => {
                let new = Lcdc::from_bits_truncate(value);
                if self.lcdc.contains(Lcdc::LCD_ENABLE) && !new.contains(Lcdc::LCD_ENABLE) {
                    // Turning the LCD off resets the raster position.
                    self.ly = 0;
                    self.mode_clock = 0;
                    self.window_line = 0;
                    self.mode = Mode::HBlank;
                } else if !self.lcdc.contains(Lcdc::LCD_ENABLE) && new.contains(Lcdc::LCD_ENABLE) {
                    self.mode = Mode::OamScan;
                    self.mode_clock = 0;
                }
                self.lcdc = new;
            }
            0xFF41 => {
                // Low 3 bits (mode + coincidence) are hardware-owned;
                // merge in only the writable interrupt selects.
                self.stat_select = value & 0x78;
            }
            0xFF42 => self.scy = value,
            0xFF43 => self.scx = value,
            // LY is nominally read-only, but a write still clears it.
            0xFF44 => self.ly = 0,
            0xFF45 => self.lyc = value,
            0xFF46 => self.dma = value,
            0xFF47 => self.bgp = value,
            0xFF48 => self.obp0 = value,
            0xFF49 => self.obp1 = value,
            0xFF4A => self.wy = value,
            0xFF4B => self.wx = value,
            0xFF4F if self.cgb => self.vbk = value & 0x01,
            0xFF68 if self.cgb => self.bgpi = value & 0xBF,
            0xFF69 if self.cgb => {
                self.bgpd[(self.bgpi & 0x3F) as usize] = value;
                if self.bgpi & 0x80 != 0 {
                    self.bgpi = 0x80 | (self.bgpi.wrapping_add(1) & 0x3F);
                }
            }
            0xFF6A if self.cgb => self.obpi = value & 0xBF,
            0xFF6B if self.cgb => {
                self.obpd[(self.obpi & 0x3F) as usize] = value;
                if self.obpi & 0x80 != 0 {
                    self.obpi = 0x80 | (self.obpi.wrapping_add(1) & 0x3F);
                }
            }
            _ => {
                log::warn!(
                    "[ppu] unimplemented write to display register 0x{addr:04X} value 0x{value:02X}"
                );
            }
        }
    }

    pub(crate) fn oam_read(&self, addr: u16) -> u8 {
        self.oam[(addr as usize - 0xFE00) % self.oam.len()]
    }

    pub(crate) fn oam_write(&mut self, addr: u16, value: u8) {
        let len = self.oam.len();
        self.oam[(addr as usize - 0xFE00) % len] = value;
    }
}
