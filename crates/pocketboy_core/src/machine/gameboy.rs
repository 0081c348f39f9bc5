use std::path::PathBuf;

use pocketboy_common::color::Color;

use super::bus::Bus;
use super::cartridge::Cartridge;
use super::joypad::Button;
use super::Model;
use crate::cpu::Cpu;
use crate::{CYCLES_PER_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH};

/// A whole emulated machine: CPU plus everything behind the bus.
///
/// The driver calls `step_frame` once per host frame and copies the
/// finished image out with `copy_frame_rgb24`.
pub struct GameBoy {
    pub(crate) cpu: Cpu,
    pub(crate) bus: Bus,
}

impl GameBoy {
    pub fn new(rom: Vec<u8>, save_path: Option<PathBuf>, model: Model) -> Self {
        let cartridge = Cartridge::new(rom, save_path);
        let bus = Bus::new(cartridge, model);
        let mut cpu = Cpu::new();
        if bus.is_cgb() {
            // The CGB boot ROM hands over with A = 0x11; games check
            // this to detect Color hardware.
            cpu.regs.a = 0x11;
        }
        Self { cpu, bus }
    }

    pub fn title(&self) -> String {
        self.bus.cartridge.header.title.clone()
    }

    /// Select one of the built-in DMG shade palettes.
    pub fn set_palette(&mut self, index: usize) {
        self.bus.ppu.set_dmg_palette(index);
    }

    /// Run the CPU for one frame's worth of cycles (twice as many in
    /// double-speed mode, where the display advances at half rate).
    pub fn step_frame(&mut self) {
        let budget = if self.bus.is_double_speed() {
            CYCLES_PER_FRAME * 2
        } else {
            CYCLES_PER_FRAME
        };
        let mut elapsed = 0;
        while elapsed < budget {
            let cycles = self.cpu.step(&mut self.bus);
            if cycles == 0 {
                // Locked CPU; nothing will ever run again.
                break;
            }
            elapsed += cycles;
        }
        self.bus.ppu.take_frame_ready();
    }

    /// Copy the current framebuffer into a tightly packed RGB24 buffer.
    pub fn copy_frame_rgb24(&self, out: &mut [u8]) {
        let frame = self.bus.ppu.framebuffer();
        for (pixel, chunk) in frame
            .iter()
            .zip(out.chunks_exact_mut(3))
            .take(SCREEN_WIDTH * SCREEN_HEIGHT)
        {
            let (r, g, b) = Color::from_argb8888(*pixel).rgb();
            chunk[0] = r;
            chunk[1] = g;
            chunk[2] = b;
        }
    }

    pub(crate) fn set_button(&mut self, button: Button, pressed: bool) {
        self.bus.joypad.set_button(button, pressed, &mut self.bus.ints);
    }

    /// True once the CPU has executed a locking opcode.
    pub fn is_locked(&self) -> bool {
        self.cpu.is_locked()
    }

    /// Persist battery RAM if it changed. Called on shutdown; the
    /// cartridge also flushes on RAM-disable edges while running.
    pub fn flush_save(&mut self) {
        self.bus.cartridge.flush_save();
    }
}
