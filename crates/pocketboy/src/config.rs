use std::path::Path;

use pocketboy_common::key::Key;
use pocketboy_core::{KeyBindings, Model};

/// Default configuration written out when no file exists yet.
const DEFAULT_CONFIG: &str = "\
; pocketboy configuration
; key names: letters, digits 1-4, up/down/left/right, return, rshift, space

a = z
b = x
start = return
select = rshift
up = up
down = down
left = left
right = right

; system: auto, dmg, cgb
system = auto

; integer window scale
scale = 4

; super game boy border: on, off (accepted for compatibility, not rendered)
border = off

; dmg palette: grey, green, pocket, pale (or an index 0-3)
palette = grey
";

/// Settings loaded from `pocketboy.ini`.
#[derive(Clone, Debug)]
pub struct Config {
    pub bindings: KeyBindings,
    pub model: Model,
    pub scale: u32,
    pub palette: usize,
    /// Super Game Boy border request. Parsed for compatibility with
    /// existing config files; no border is rendered.
    pub border: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bindings: KeyBindings::default(),
            model: Model::Auto,
            scale: 4,
            palette: 0,
            border: false,
        }
    }
}

impl Config {
    /// Load the config file, creating it with defaults when missing.
    /// A file that cannot be read or written is logged and ignored.
    pub fn load_or_create(path: &Path) -> Config {
        match std::fs::read_to_string(path) {
            Ok(text) => Config::parse(&text),
            Err(_) => {
                log::info!("[config] no config at {}, writing defaults", path.display());
                if let Err(err) = std::fs::write(path, DEFAULT_CONFIG) {
                    log::warn!("[config] could not write {}: {err}", path.display());
                }
                Config::default()
            }
        }
    }

    /// Parse `key = value` lines; `;` and `#` start comments. Unknown
    /// keys and bad values keep their defaults with a warning.
    pub fn parse(text: &str) -> Config {
        let mut config = Config::default();
        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.split([';', '#']).next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                log::warn!("[config] line {}: expected 'key = value'", line_no + 1);
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().to_ascii_lowercase();
            match name.as_str() {
                "a" => config.bindings.a = parse_key(&name, &value),
                "b" => config.bindings.b = parse_key(&name, &value),
                "start" => config.bindings.start = parse_key(&name, &value),
                "select" => config.bindings.select = parse_key(&name, &value),
                "up" => config.bindings.up = parse_key(&name, &value),
                "down" => config.bindings.down = parse_key(&name, &value),
                "left" => config.bindings.left = parse_key(&name, &value),
                "right" => config.bindings.right = parse_key(&name, &value),
                "system" => match value.as_str() {
                    "auto" => config.model = Model::Auto,
                    "dmg" | "gb" => config.model = Model::Dmg,
                    "cgb" | "gbc" => config.model = Model::Cgb,
                    other => log::warn!("[config] unknown system '{other}'"),
                },
                "scale" => match value.parse::<u32>() {
                    Ok(scale @ 1..=8) => config.scale = scale,
                    _ => log::warn!("[config] bad scale '{value}', keeping {}", config.scale),
                },
                "palette" => config.palette = parse_palette(&value),
                "border" => match value.as_str() {
                    "on" | "true" | "1" => config.border = true,
                    "off" | "false" | "0" => config.border = false,
                    other => log::warn!("[config] bad border value '{other}'"),
                },
                other => log::warn!("[config] unknown setting '{other}'"),
            }
        }
        config
    }
}

fn parse_key(name: &str, value: &str) -> Key {
    let key = Key::from_config_name(value);
    if key == Key::None {
        log::warn!("[config] unknown key name '{value}' for '{name}'");
    }
    key
}

fn parse_palette(value: &str) -> usize {
    match value {
        "grey" | "gray" => 0,
        "green" => 1,
        "pocket" => 2,
        "pale" => 3,
        _ => match value.parse::<usize>() {
            Ok(index @ 0..=3) => index,
            _ => {
                log::warn!("[config] unknown palette '{value}', using grey");
                0
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let config = Config::default();
        assert_eq!(config.bindings.a, Key::Z);
        assert_eq!(config.bindings.b, Key::X);
        assert_eq!(config.bindings.start, Key::Return);
        assert_eq!(config.bindings.select, Key::RShift);
        assert_eq!(config.scale, 4);
    }

    #[test]
    fn parses_bindings_and_system() {
        let config = Config::parse(
            "a = space\nb = w\nsystem = dmg\nscale = 2\npalette = green\nborder = on\n",
        );
        assert_eq!(config.bindings.a, Key::Space);
        assert_eq!(config.bindings.b, Key::W);
        assert_eq!(config.model, Model::Dmg);
        assert_eq!(config.scale, 2);
        assert_eq!(config.palette, 1);
        assert!(config.border);
    }

    #[test]
    fn border_defaults_off_and_rejects_junk() {
        assert!(!Config::default().border);
        let config = Config::parse("border = sideways\n");
        assert!(!config.border);
    }

    #[test]
    fn ignores_comments_and_junk() {
        let config = Config::parse(
            "; comment line\n# another\nstart = return ; trailing comment\nnot a setting\nscale = 99\n",
        );
        assert_eq!(config.bindings.start, Key::Return);
        // Out-of-range scale keeps the default.
        assert_eq!(config.scale, 4);
    }

    #[test]
    fn load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pocketboy.ini");
        let config = Config::load_or_create(&path);
        assert_eq!(config.scale, 4);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("start = return"));
        // A second load reads the file it just wrote.
        let reloaded = Config::load_or_create(&path);
        assert_eq!(reloaded.bindings.b, Key::X);
    }
}
