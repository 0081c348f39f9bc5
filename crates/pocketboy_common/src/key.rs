/// Host keys the frontends can report.
///
/// This is a deliberately small, frontend-neutral set: letters and digits
/// used by the default bindings plus the keys a Game Boy layout needs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Return,
    RShift,
    Space,
    A,
    B,
    C,
    D,
    E,
    F,
    Q,
    R,
    S,
    V,
    W,
    X,
    Z,
    Num1,
    Num2,
    Num3,
    Num4,
    None,
}

impl Key {
    /// Parse a configuration-file key name (already lowercased by the
    /// config loader) into a `Key`. Unknown names map to `Key::None`.
    pub fn from_config_name(name: &str) -> Key {
        match name {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "return" | "enter" => Key::Return,
            "rshift" => Key::RShift,
            "space" => Key::Space,
            "a" => Key::A,
            "b" => Key::B,
            "c" => Key::C,
            "d" => Key::D,
            "e" => Key::E,
            "f" => Key::F,
            "q" => Key::Q,
            "r" => Key::R,
            "s" => Key::S,
            "v" => Key::V,
            "w" => Key::W,
            "x" => Key::X,
            "z" => Key::Z,
            "1" => Key::Num1,
            "2" => Key::Num2,
            "3" => Key::Num3,
            "4" => Key::Num4,
            _ => Key::None,
        }
    }
}
