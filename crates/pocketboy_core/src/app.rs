use pocketboy_common::app::App;
use pocketboy_common::key::Key;

use crate::machine::{Button, GameBoy};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH, SCREEN_SCALE};

/// Host key assigned to each Game Boy button.
///
/// Defaults follow the classic layout: Z/X for A/B, Return for Start,
/// right Shift for Select, arrows for the d-pad.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub a: Key,
    pub b: Key,
    pub start: Key,
    pub select: Key,
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            a: Key::Z,
            b: Key::X,
            start: Key::Return,
            select: Key::RShift,
            up: Key::Up,
            down: Key::Down,
            left: Key::Left,
            right: Key::Right,
        }
    }
}

impl KeyBindings {
    fn button_for(&self, key: Key) -> Option<Button> {
        if key == Key::None {
            return None;
        }
        if key == self.a {
            Some(Button::A)
        } else if key == self.b {
            Some(Button::B)
        } else if key == self.start {
            Some(Button::Start)
        } else if key == self.select {
            Some(Button::Select)
        } else if key == self.up {
            Some(Button::Up)
        } else if key == self.down {
            Some(Button::Down)
        } else if key == self.left {
            Some(Button::Left)
        } else if key == self.right {
            Some(Button::Right)
        } else {
            None
        }
    }
}

/// Frontend adapter: drives a `GameBoy` one frame per `update` call and
/// routes host key events onto the joypad.
pub struct GameBoyApp {
    gameboy: GameBoy,
    bindings: KeyBindings,
    scale: u32,
}

impl GameBoyApp {
    pub fn new(gameboy: GameBoy) -> Self {
        Self {
            gameboy,
            bindings: KeyBindings::default(),
            scale: SCREEN_SCALE,
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }
}

impl App for GameBoyApp {
    fn init(&mut self) {
        log::info!("[app] starting '{}'", self.gameboy.title());
    }

    fn update(&mut self, screen: &mut [u8]) {
        self.gameboy.step_frame();
        self.gameboy.copy_frame_rgb24(screen);
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        if let Some(button) = self.bindings.button_for(key) {
            self.gameboy.set_button(button, is_down);
        }
    }

    fn should_exit(&self) -> bool {
        self.gameboy.is_locked()
    }

    fn exit(&mut self) {
        self.gameboy.flush_save();
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        self.scale
    }

    fn title(&self) -> String {
        let name = self.gameboy.title();
        if name.is_empty() {
            "pocketboy".to_string()
        } else {
            format!("pocketboy - {name}")
        }
    }
}
