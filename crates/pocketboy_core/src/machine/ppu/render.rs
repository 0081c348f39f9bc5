use super::{Lcdc, Ppu, DMG_PALETTES};
use crate::SCREEN_WIDTH;

impl Ppu {
    /// Render the scanline at the current LY into the framebuffer.
    ///
    /// Runs once per line at the start of the pixel-transfer period:
    /// background and window first (color index, palette and tile
    /// priority kept per pixel), then sprites composited over them.
    pub(super) fn render_scanline(&mut self) {
        let ly = self.ly as usize;
        if ly >= crate::SCREEN_HEIGHT {
            return;
        }

        let mut index = [0u8; SCREEN_WIDTH];
        let mut palette = [0u8; SCREEN_WIDTH];
        let mut bg_priority = [false; SCREEN_WIDTH];

        // On CGB, LCDC bit 0 demotes background priority rather than
        // blanking the background layer.
        if self.cgb || self.lcdc.contains(Lcdc::BG_ENABLE) {
            self.compose_background(&mut index, &mut palette, &mut bg_priority);
            if self.window_covers_line() {
                self.compose_window(&mut index, &mut palette, &mut bg_priority);
                self.window_line = self.window_line.wrapping_add(1);
            }
        }

        for x in 0..SCREEN_WIDTH {
            self.framebuffer[ly * SCREEN_WIDTH + x] = self.bg_color(palette[x], index[x]);
        }

        if self.lcdc.contains(Lcdc::OBJ_ENABLE) {
            self.draw_sprites(&index, &bg_priority);
        }
    }

    fn window_covers_line(&self) -> bool {
        self.lcdc.contains(Lcdc::WINDOW_ENABLE) && self.wy <= self.ly && self.wx < 167
    }

    /// Crop the visible 160 pixels out of the 256-wide background row,
    /// wrapping horizontally at the map edge.
    fn compose_background(
        &self,
        index: &mut [u8; SCREEN_WIDTH],
        palette: &mut [u8; SCREEN_WIDTH],
        priority: &mut [bool; SCREEN_WIDTH],
    ) {
        let bg_y = self.ly.wrapping_add(self.scy);
        let map_base = if self.lcdc.contains(Lcdc::BG_MAP) {
            0x1C00
        } else {
            0x1800
        };
        let (row_idx, row_pal, row_prio) = self.compose_map_row(map_base, bg_y);
        for x in 0..SCREEN_WIDTH {
            let sx = (self.scx as usize + x) & 0xFF;
            index[x] = row_idx[sx];
            palette[x] = row_pal[sx];
            priority[x] = row_prio[sx];
        }
    }

    /// Overlay the window on top of the background pixels, starting at
    /// screen column WX-7. The window never wraps; its own line counter
    /// picks the map row.
    fn compose_window(
        &self,
        index: &mut [u8; SCREEN_WIDTH],
        palette: &mut [u8; SCREEN_WIDTH],
        priority: &mut [bool; SCREEN_WIDTH],
    ) {
        let map_base = if self.lcdc.contains(Lcdc::WINDOW_MAP) {
            0x1C00
        } else {
            0x1800
        };
        let (row_idx, row_pal, row_prio) = self.compose_map_row(map_base, self.window_line);
        let start = i32::from(self.wx) - 7;
        for x in 0..SCREEN_WIDTH {
            let wx = x as i32 - start;
            if wx < 0 {
                continue;
            }
            let wx = wx as usize;
            index[x] = row_idx[wx];
            palette[x] = row_pal[wx];
            priority[x] = row_prio[wx];
        }
    }

    /// Decode one full 256-pixel row of a 32x32 tile map into color
    /// indices plus the CGB per-tile attributes.
    fn compose_map_row(&self, map_base: usize, y: u8) -> ([u8; 256], [u8; 256], [bool; 256]) {
        let mut idx = [0u8; 256];
        let mut pal = [0u8; 256];
        let mut prio = [false; 256];
        let tile_row = (y as usize / 8) * 32;
        for tile_x in 0..32 {
            let map_offset = map_base + tile_row + tile_x;
            let tile_number = self.vram[0][map_offset];
            let attr = if self.cgb { self.vram[1][map_offset] } else { 0 };
            let bank = ((attr >> 3) & 0x01) as usize;
            let mut fine_y = (y & 0x07) as usize;
            if attr & 0x40 != 0 {
                fine_y = 7 - fine_y;
            }
            let tile_addr = self.tile_address(tile_number) + fine_y * 2;
            let lo = self.vram[bank][tile_addr];
            let hi = self.vram[bank][tile_addr + 1];
            for px in 0..8 {
                let bit = if attr & 0x20 != 0 { px } else { 7 - px };
                let color = ((hi >> bit) & 0x01) << 1 | ((lo >> bit) & 0x01);
                let x = tile_x * 8 + px as usize;
                idx[x] = color;
                pal[x] = attr & 0x07;
                prio[x] = attr & 0x80 != 0;
            }
        }
        (idx, pal, prio)
    }

    /// VRAM offset of a background/window tile under the current
    /// addressing mode: unsigned from 0x8000 or signed around 0x9000.
    fn tile_address(&self, number: u8) -> usize {
        if self.lcdc.contains(Lcdc::TILE_DATA) {
            number as usize * 16
        } else {
            (0x1000_i32 + i32::from(number as i8) * 16) as usize
        }
    }

    fn bg_color(&self, palette: u8, index: u8) -> u32 {
        if self.cgb {
            cgb_color(&self.bgpd, palette, index)
        } else {
            let shade = (self.bgp >> (index * 2)) & 0x03;
            DMG_PALETTES[self.dmg_palette][shade as usize]
        }
    }

    fn draw_sprites(&mut self, bg_index: &[u8; SCREEN_WIDTH], bg_priority: &[bool; SCREEN_WIDTH]) {
        let ly = i32::from(self.ly);
        let height = if self.lcdc.contains(Lcdc::OBJ_SIZE) {
            16
        } else {
            8
        };

        // First ten sprites in OAM order covering this line.
        let mut line_sprites: Vec<(usize, i32)> = Vec::with_capacity(10);
        for i in 0..40 {
            let sy = i32::from(self.oam[i * 4]) - 16;
            if ly < sy || ly >= sy + height {
                continue;
            }
            line_sprites.push((i, i32::from(self.oam[i * 4 + 1]) - 8));
            if line_sprites.len() == 10 {
                break;
            }
        }

        // Draw lowest-priority sprites first so higher-priority ones
        // overwrite. DMG ranks by leftmost x with OAM order breaking
        // ties; CGB ranks by OAM order alone.
        if !self.cgb {
            line_sprites.sort_by_key(|&(i, x)| (x, i));
        }
        for &(i, sx) in line_sprites.iter().rev() {
            let sy = i32::from(self.oam[i * 4]) - 16;
            let tile_number = self.oam[i * 4 + 2];
            let attr = self.oam[i * 4 + 3];

            let mut row = (ly - sy) as usize;
            if attr & 0x40 != 0 {
                row = height as usize - 1 - row;
            }
            // Tall sprites use an even/odd tile pair; bit 0 is ignored.
            let tile = if height == 16 {
                tile_number & 0xFE
            } else {
                tile_number
            } as usize;
            let bank = if self.cgb {
                ((attr >> 3) & 0x01) as usize
            } else {
                0
            };
            // Sprite tiles always use unsigned addressing from 0x8000.
            let tile_addr = tile * 16 + row * 2;
            let lo = self.vram[bank][tile_addr];
            let hi = self.vram[bank][tile_addr + 1];

            for px in 0..8u8 {
                let x = sx + i32::from(px);
                if !(0..SCREEN_WIDTH as i32).contains(&x) {
                    continue;
                }
                let x = x as usize;
                let bit = if attr & 0x20 != 0 { px } else { 7 - px };
                let color = ((hi >> bit) & 0x01) << 1 | ((lo >> bit) & 0x01);
                // Index 0 is transparent for sprites.
                if color == 0 {
                    continue;
                }
                // Behind-background sprites only show over BG color 0; a
                // CGB tile priority attribute keeps the BG on top too.
                let bg_wins = bg_index[x] != 0
                    && (attr & 0x80 != 0
                        || (self.cgb && bg_priority[x] && self.lcdc.contains(Lcdc::BG_ENABLE)));
                if bg_wins {
                    continue;
                }
                let value = if self.cgb {
                    cgb_color(&self.obpd, attr & 0x07, color)
                } else {
                    let obp = if attr & 0x10 != 0 { self.obp1 } else { self.obp0 };
                    let shade = (obp >> (color * 2)) & 0x03;
                    DMG_PALETTES[self.dmg_palette][shade as usize]
                };
                self.framebuffer[self.ly as usize * SCREEN_WIDTH + x] = value;
            }
        }
    }
}

/// Expand a little-endian 15-bit CGB color from palette RAM into packed
/// 0xAARRGGBB, widening each 5-bit channel to 8 bits.
fn cgb_color(palette_ram: &[u8; 64], palette: u8, index: u8) -> u32 {
    let base = (palette as usize & 0x07) * 8 + (index as usize & 0x03) * 2;
    let raw = u16::from(palette_ram[base]) | (u16::from(palette_ram[base + 1]) << 8);
    let expand = |c: u16| {
        let c = u32::from(c & 0x1F);
        (c << 3) | (c >> 2)
    };
    let r = expand(raw);
    let g = expand(raw >> 5);
    let b = expand(raw >> 10);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}
