mod bus;
mod cartridge;
mod gameboy;
mod interrupts;
mod joypad;
mod ppu;
mod serial;
mod timer;

pub(crate) use bus::Bus;
pub use cartridge::Cartridge;
pub use gameboy::GameBoy;
pub use interrupts::Interrupt;
pub(crate) use joypad::Button;

/// Hardware model the machine emulates.
///
/// `Auto` picks CGB when the cartridge header advertises Color support
/// (byte 0x143 = 0x80 or 0xC0) and DMG otherwise.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum Model {
    #[default]
    Auto,
    Dmg,
    Cgb,
}

#[cfg(test)]
mod tests;
