use super::ppu::Mode;
use super::{Button, GameBoy, Model};

/// Build a synthetic ROM image with a valid-enough header. Each bank
/// carries its own number at offset 0x1000 so bank switches are visible
/// through the 0x4000 window.
fn build_rom(cart_type: u8, rom_banks: usize, ram_size_code: u8) -> Vec<u8> {
    let mut rom = vec![0u8; rom_banks * 0x4000];
    rom[0x134..0x138].copy_from_slice(b"TEST");
    rom[0x147] = cart_type;
    rom[0x149] = ram_size_code;
    for bank in 0..rom_banks {
        rom[bank * 0x4000 + 0x1000] = bank as u8;
    }
    rom
}

fn dmg(rom: Vec<u8>) -> GameBoy {
    GameBoy::new(rom, None, Model::Dmg)
}

fn cgb(rom: Vec<u8>) -> GameBoy {
    GameBoy::new(rom, None, Model::Cgb)
}

#[test]
fn header_parsing() {
    let gb = dmg(build_rom(0x1B, 2, 0x03));
    let header = &gb.bus.cartridge.header;
    assert_eq!(header.title, "TEST");
    assert!(header.has_battery());
    assert_eq!(header.ram_size_bytes(), 0x8000);
}

#[test]
fn model_auto_follows_the_cgb_flag() {
    let mut rom = build_rom(0x00, 2, 0x00);
    rom[0x143] = 0x80;
    let gb = GameBoy::new(rom, None, Model::Auto);
    assert!(gb.bus.is_cgb());
    // CGB handoff is detectable through A.
    assert_eq!(gb.cpu.regs.a, 0x11);

    let gb = GameBoy::new(build_rom(0x00, 2, 0x00), None, Model::Auto);
    assert!(!gb.bus.is_cgb());
    assert_eq!(gb.cpu.regs.a, 0x01);
}

#[test]
fn echo_ram_aliases_work_ram() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xC123, 0xAB);
    assert_eq!(gb.bus.read8(0xE123), 0xAB);
    gb.bus.write8(0xFD00, 0x77);
    assert_eq!(gb.bus.read8(0xDD00), 0x77);
}

#[test]
fn unusable_region_reads_ff() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFEA5, 0x12);
    assert_eq!(gb.bus.read8(0xFEA5), 0xFF);
}

#[test]
fn cgb_wram_banking_via_svbk() {
    let mut gb = cgb(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF70, 2);
    gb.bus.write8(0xD000, 0x11);
    gb.bus.write8(0xFF70, 3);
    assert_eq!(gb.bus.read8(0xD000), 0x00);
    gb.bus.write8(0xFF70, 2);
    assert_eq!(gb.bus.read8(0xD000), 0x11);
    // Bank 0 selects bank 1.
    gb.bus.write8(0xFF70, 0);
    gb.bus.write8(0xD000, 0x22);
    gb.bus.write8(0xFF70, 1);
    assert_eq!(gb.bus.read8(0xD000), 0x22);
}

#[test]
fn cgb_vram_banking_via_vbk() {
    let mut gb = cgb(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF4F, 1);
    gb.bus.write8(0x8000, 0x77);
    gb.bus.write8(0xFF4F, 0);
    assert_eq!(gb.bus.read8(0x8000), 0x00);
    gb.bus.write8(0xFF4F, 1);
    assert_eq!(gb.bus.read8(0x8000), 0x77);
    assert_eq!(gb.bus.read8(0xFF4F), 0xFF);
}

#[test]
fn ppu_walks_the_mode_sequence_for_a_whole_frame() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    for line in 0..144u8 {
        assert_eq!(gb.bus.ppu.ly(), line);
        assert_eq!(gb.bus.ppu.mode(), Mode::OamScan);
        gb.bus.advance(80);
        assert_eq!(gb.bus.ppu.mode(), Mode::Transfer);
        gb.bus.advance(172);
        assert_eq!(gb.bus.ppu.mode(), Mode::HBlank);
        gb.bus.advance(204);
    }
    assert_eq!(gb.bus.ppu.ly(), 144);
    assert_eq!(gb.bus.ppu.mode(), Mode::VBlank);
    // V-blank entry raises the interrupt line.
    assert_eq!(gb.bus.read8(0xFF0F) & 0x01, 0x01);
    // Ten lines of V-blank, then LY wraps to 0 without a reset.
    for line in 144..153u8 {
        assert_eq!(gb.bus.ppu.ly(), line);
        gb.bus.advance(456);
    }
    assert_eq!(gb.bus.ppu.ly(), 153);
    gb.bus.advance(456);
    assert_eq!(gb.bus.ppu.ly(), 0);
    assert_eq!(gb.bus.ppu.mode(), Mode::OamScan);
}

#[test]
fn ly_write_resets_the_counter() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.advance(456 * 3);
    assert_eq!(gb.bus.read8(0xFF44), 3);
    gb.bus.write8(0xFF44, 0x55);
    assert_eq!(gb.bus.read8(0xFF44), 0);
}

#[test]
fn stat_low_bits_are_hardware_owned() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF41, 0xFF);
    // Selects stick, but mode/coincidence come from the PPU: LY==LYC==0
    // and mode 2 right after power-on.
    assert_eq!(gb.bus.read8(0xFF41), 0xFE);
}

#[test]
fn lyc_coincidence_interrupt() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF45, 2);
    gb.bus.write8(0xFF41, 0x40);
    gb.bus.advance(456);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x02, 0);
    gb.bus.advance(456);
    assert_eq!(gb.bus.read8(0xFF44), 2);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x02, 0x02);
    // Coincidence flag visible in STAT bit 2.
    assert_eq!(gb.bus.read8(0xFF41) & 0x04, 0x04);
}

#[test]
fn timer_overflow_reloads_tma_and_interrupts_once() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF06, 7); // TMA
    gb.bus.write8(0xFF07, 0x05); // enabled, 262144 Hz (16 cycles/tick)
    gb.bus.advance(16 * 256);
    assert_eq!(gb.bus.read8(0xFF05), 7);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x04, 0x04);
    // No second interrupt until the counter overflows again.
    gb.bus.write8(0xFF0F, 0);
    gb.bus.advance(16);
    assert_eq!(gb.bus.read8(0xFF05), 8);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x04, 0);
}

#[test]
fn timer_disabled_by_tac_bit2() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF07, 0x01); // rate set but not enabled
    gb.bus.advance(4096);
    assert_eq!(gb.bus.read8(0xFF05), 0);
}

#[test]
fn div_counts_and_resets_on_write() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.advance(512);
    assert_eq!(gb.bus.read8(0xFF04), 2);
    gb.bus.write8(0xFF04, 0xAA);
    assert_eq!(gb.bus.read8(0xFF04), 0);
}

#[test]
fn rom_only_cart_ignores_rom_writes() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    assert_eq!(gb.bus.read8(0x1000), 0);
    gb.bus.write8(0x2000, 1);
    assert_eq!(gb.bus.read8(0x5000), 1); // fixed second bank, unchanged
    assert_eq!(gb.bus.read8(0x1000), 0);
}

#[test]
fn unknown_mapper_falls_back_to_rom_only() {
    let mut gb = dmg(build_rom(0x42, 2, 0x00));
    assert_eq!(gb.bus.read8(0x1000), 0);
    assert_eq!(gb.bus.read8(0x5000), 1);
}

#[test]
fn mbc1_bank_switching() {
    let mut gb = dmg(build_rom(0x01, 64, 0x00));
    // Default: bank 1 in the switchable window.
    assert_eq!(gb.bus.read8(0x5000), 1);
    gb.bus.write8(0x2000, 5);
    assert_eq!(gb.bus.read8(0x5000), 5);
    // Zero selects one.
    gb.bus.write8(0x2000, 0);
    assert_eq!(gb.bus.read8(0x5000), 1);
    // High bits extend the bank number in ROM mode.
    gb.bus.write8(0x2000, 1);
    gb.bus.write8(0x4000, 1);
    assert_eq!(gb.bus.read8(0x5000), 33);
    // In RAM mode the high bits no longer apply to the ROM window.
    gb.bus.write8(0x6000, 1);
    assert_eq!(gb.bus.read8(0x5000), 1);
    // The fixed window stays on bank 0 throughout.
    assert_eq!(gb.bus.read8(0x1000), 0);
}

#[test]
fn mbc1_ram_requires_enable() {
    let mut gb = dmg(build_rom(0x03, 4, 0x02));
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
    gb.bus.write8(0xA000, 0x42); // dropped
    gb.bus.write8(0x0000, 0x0A);
    assert_ne!(gb.bus.read8(0xA000), 0x42);
    gb.bus.write8(0xA000, 0x42);
    assert_eq!(gb.bus.read8(0xA000), 0x42);
    gb.bus.write8(0x0000, 0x00);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
}

#[test]
fn battery_ram_persists_through_the_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("test.sav");

    let mut gb = GameBoy::new(build_rom(0x03, 4, 0x02), Some(save.clone()), Model::Dmg);
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x42);
    // Disabling RAM commits the save.
    gb.bus.write8(0x0000, 0x00);
    let data = std::fs::read(&save).unwrap();
    assert_eq!(data.len(), 0x2000);
    assert_eq!(data[0], 0x42);

    // A fresh machine loads the same content back.
    let mut gb = GameBoy::new(build_rom(0x03, 4, 0x02), Some(save), Model::Dmg);
    gb.bus.write8(0x0000, 0x0A);
    assert_eq!(gb.bus.read8(0xA000), 0x42);
}

#[test]
fn flush_save_skips_clean_ram() {
    let dir = tempfile::tempdir().unwrap();
    let save = dir.path().join("clean.sav");
    let mut gb = GameBoy::new(build_rom(0x03, 4, 0x02), Some(save.clone()), Model::Dmg);
    gb.flush_save();
    assert!(!save.exists());
}

#[test]
fn mbc3_ram_and_rtc_share_the_window() {
    let mut gb = dmg(build_rom(0x10, 4, 0x02));
    gb.bus.write8(0x0000, 0x0A);
    // RAM bank 0 behind the window.
    gb.bus.write8(0x4000, 0x00);
    gb.bus.write8(0xA000, 0x55);
    assert_eq!(gb.bus.read8(0xA000), 0x55);
    // Map the RTC seconds register and latch the clock.
    gb.bus.write8(0x4000, 0x08);
    gb.bus.write8(0x6000, 0x00);
    gb.bus.write8(0x6000, 0x01);
    assert!(gb.bus.read8(0xA000) < 60);
    // Back to RAM: the value is still there.
    gb.bus.write8(0x4000, 0x00);
    assert_eq!(gb.bus.read8(0xA000), 0x55);
}

#[test]
fn mbc3_rtc_day_high_register_round_trips() {
    let mut gb = dmg(build_rom(0x10, 4, 0x02));
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0x4000, 0x0C); // map DH
    // Day bit 8, halt, and the day-counter carry all live in DH.
    gb.bus.write8(0xA000, 0xC1);
    assert_eq!(gb.bus.read8(0xA000), 0xC1);
    // Clearing the register drops the carry again.
    gb.bus.write8(0xA000, 0x40);
    assert_eq!(gb.bus.read8(0xA000), 0x40);
}

#[test]
fn mbc3_rom_bank_zero_reads_as_one() {
    let mut gb = dmg(build_rom(0x11, 4, 0x00));
    gb.bus.write8(0x2000, 0);
    assert_eq!(gb.bus.read8(0x5000), 1);
    gb.bus.write8(0x2000, 3);
    assert_eq!(gb.bus.read8(0x5000), 3);
}

#[test]
fn mbc5_allows_bank_zero_in_the_window() {
    let mut gb = dmg(build_rom(0x19, 4, 0x00));
    gb.bus.write8(0x2000, 0);
    assert_eq!(gb.bus.read8(0x5000), 0);
    gb.bus.write8(0x2000, 3);
    assert_eq!(gb.bus.read8(0x5000), 3);
}

#[test]
fn mbc5_ram_banking() {
    let mut gb = dmg(build_rom(0x1B, 4, 0x03));
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0x4000, 1);
    gb.bus.write8(0xA000, 0x77);
    gb.bus.write8(0x4000, 0);
    assert_ne!(gb.bus.read8(0xA000), 0x77);
    gb.bus.write8(0x4000, 1);
    assert_eq!(gb.bus.read8(0xA000), 0x77);
}

#[test]
fn oam_dma_copies_a0_bytes() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    for i in 0..0xA0u16 {
        gb.bus.write8(0xC000 + i, i as u8);
    }
    gb.bus.write8(0xFF46, 0xC0);
    assert_eq!(gb.bus.read8(0xFE00), 0x00);
    assert_eq!(gb.bus.read8(0xFE5A), 0x5A);
    assert_eq!(gb.bus.read8(0xFE9F), 0x9F);
    assert_eq!(gb.bus.read8(0xFF46), 0xC0);
}

#[test]
fn general_purpose_vram_dma_runs_at_once() {
    let mut gb = cgb(build_rom(0x00, 2, 0x00));
    for i in 0..16u16 {
        gb.bus.write8(0xC000 + i, 0x33);
    }
    gb.bus.write8(0xFF51, 0xC0);
    gb.bus.write8(0xFF52, 0x00);
    gb.bus.write8(0xFF53, 0x00);
    gb.bus.write8(0xFF54, 0x00);
    gb.bus.write8(0xFF55, 0x00); // one block, immediate
    assert_eq!(gb.bus.read8(0x8000), 0x33);
    assert_eq!(gb.bus.read8(0x800F), 0x33);
    assert_eq!(gb.bus.read8(0xFF55), 0xFF);
}

#[test]
fn hblank_vram_dma_moves_one_block_per_hblank() {
    let mut gb = cgb(build_rom(0x00, 2, 0x00));
    for i in 0..32u16 {
        gb.bus.write8(0xC000 + i, 0x44);
    }
    gb.bus.write8(0xFF51, 0xC0);
    gb.bus.write8(0xFF52, 0x00);
    gb.bus.write8(0xFF53, 0x00);
    gb.bus.write8(0xFF54, 0x00);
    gb.bus.write8(0xFF55, 0x81); // two blocks, H-blank paced
    assert_eq!(gb.bus.read8(0xFF55), 1);
    // First H-blank of the frame: one block lands.
    gb.bus.advance(80 + 172);
    assert_eq!(gb.bus.read8(0x8000), 0x44);
    assert_eq!(gb.bus.read8(0x8010), 0x00);
    // Next line's H-blank finishes the transfer.
    gb.bus.advance(204 + 80 + 172);
    assert_eq!(gb.bus.read8(0x8010), 0x44);
    assert_eq!(gb.bus.read8(0xFF55), 0xFF);
}

#[test]
fn cgb_palette_ram_auto_increments() {
    let mut gb = cgb(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF68, 0x80);
    gb.bus.write8(0xFF69, 0x1F);
    gb.bus.write8(0xFF69, 0x7C);
    gb.bus.write8(0xFF68, 0x00);
    assert_eq!(gb.bus.read8(0xFF69), 0x1F);
    gb.bus.write8(0xFF68, 0x01);
    assert_eq!(gb.bus.read8(0xFF69), 0x7C);
    // The object palette pair works the same way.
    gb.bus.write8(0xFF6A, 0x80);
    gb.bus.write8(0xFF6B, 0xE0);
    gb.bus.write8(0xFF6B, 0x03);
    assert_eq!(gb.bus.read8(0xFF6A), 0x82);
    gb.bus.write8(0xFF6A, 0x00);
    assert_eq!(gb.bus.read8(0xFF6B), 0xE0);
    gb.bus.write8(0xFF6A, 0x01);
    assert_eq!(gb.bus.read8(0xFF6B), 0x03);
}

#[test]
fn stop_commits_an_armed_speed_switch() {
    let mut rom = build_rom(0x00, 2, 0x00);
    rom[0x100] = 0x10; // STOP
    rom[0x101] = 0x00;
    let mut gb = cgb(rom);
    assert_eq!(gb.bus.read8(0xFF4D), 0x7E);
    gb.bus.write8(0xFF4D, 0x01);
    assert_eq!(gb.bus.read8(0xFF4D), 0x7F);
    gb.cpu.step(&mut gb.bus);
    assert!(gb.bus.is_double_speed());
    assert_eq!(gb.bus.read8(0xFF4D), 0xFE);
    // DIV follows the doubled CPU clock: one tick per 256 CPU cycles,
    // so 2560 of them land exactly ten ticks.
    gb.bus.advance(2560);
    assert_eq!(gb.bus.read8(0xFF04), 10);
}

#[test]
fn serial_transfer_completes_immediately() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.bus.write8(0xFF01, 0x41);
    gb.bus.write8(0xFF02, 0x81);
    assert_eq!(gb.bus.serial.output(), &[0x41]);
    assert_eq!(gb.bus.read8(0xFF01), 0xFF);
    assert_eq!(gb.bus.read8(0xFF02) & 0x80, 0);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x08, 0x08);
}

#[test]
fn joypad_matrix_reads_active_low() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    gb.set_button(Button::Right, true);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x10, 0x10);
    gb.bus.write8(0xFF00, 0x20); // select d-pad group
    assert_eq!(gb.bus.read8(0xFF00), 0xEE);
    gb.set_button(Button::Right, false);
    assert_eq!(gb.bus.read8(0xFF00), 0xEF);
    // Nothing selected: all lines high.
    gb.bus.write8(0xFF00, 0x30);
    assert_eq!(gb.bus.read8(0xFF00), 0xFF);
}

#[test]
fn step_frame_runs_a_full_frame_of_cycles() {
    let mut rom = build_rom(0x00, 2, 0x00);
    rom[0x100] = 0x18; // JR -2: spin in place
    rom[0x101] = 0xFE;
    let mut gb = dmg(rom);
    gb.step_frame();
    // One frame brings the raster back to line 0.
    assert_eq!(gb.bus.ppu.ly(), 0);
    assert_eq!(gb.cpu.regs.pc, 0x0100);
}

#[test]
fn interrupt_flag_register_upper_bits_read_high() {
    let mut gb = dmg(build_rom(0x00, 2, 0x00));
    assert_eq!(gb.bus.read8(0xFF0F) & 0xE0, 0xE0);
    gb.bus.write8(0xFF0F, 0xFF);
    assert_eq!(gb.bus.read8(0xFF0F), 0xFF);
    gb.bus.write8(0xFFFF, 0x1F);
    assert_eq!(gb.bus.read8(0xFFFF), 0x1F);
}
