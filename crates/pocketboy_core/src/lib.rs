pub mod app;
pub mod cpu;
pub mod machine;

pub use app::{GameBoyApp, KeyBindings};
pub use machine::{GameBoy, Model};

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Default integer scaling factor for the SDL frontend.
pub const SCREEN_SCALE: u32 = 4;

/// CPU clock in Hz (single speed).
pub const CPU_SPEED: u32 = 4_194_304;
/// T-cycles per video frame (456 cycles x 154 lines).
pub const CYCLES_PER_FRAME: u32 = 70_224;
