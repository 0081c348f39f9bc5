use super::interrupts::{Interrupt, Interrupts};

/// Game Boy button lines, in P1 bit order within their group.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Button {
    // D-pad group (P1 bit 4 selects).
    Right = 0,
    Left = 1,
    Up = 2,
    Down = 3,
    // Button group (P1 bit 5 selects).
    A = 4,
    B = 5,
    Select = 6,
    Start = 7,
}

/// Joypad port (P1 at 0xFF00).
///
/// The low nibble reads back the selected button group, active-low.
/// The press masks here use bit=1 for "pressed" and are inverted on read.
pub(crate) struct Joypad {
    /// P1 bits 5:4 as last written (0 = group selected).
    select: u8,
    dpad: u8,
    buttons: u8,
}

impl Joypad {
    pub(crate) fn new() -> Self {
        Self {
            select: 0x30,
            dpad: 0,
            buttons: 0,
        }
    }

    pub(crate) fn set_button(&mut self, button: Button, pressed: bool, ints: &mut Interrupts) {
        let index = button as u8;
        let mask = 1 << (index & 0x03);
        let group = if index < 4 {
            &mut self.dpad
        } else {
            &mut self.buttons
        };
        if pressed {
            *group |= mask;
            ints.request(Interrupt::Joypad);
        } else {
            *group &= !mask;
        }
    }

    pub(crate) fn read(&self) -> u8 {
        let mut nibble = 0x0F;
        if self.select & 0x10 == 0 {
            nibble &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            nibble &= !self.buttons;
        }
        0xC0 | self.select | nibble
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }
}
