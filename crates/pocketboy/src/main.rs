mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use config::Config;
use pocketboy_common::app::App;
use pocketboy_core::{GameBoy, GameBoyApp, Model};
use pocketboy_sdl2::{SdlContext, SdlInitInfo};

const USAGE: &str = "usage: pocketboy [--dmg|--cgb] <rom.gb>";

fn main() -> Result<()> {
    env_logger::init();

    let mut rom_path: Option<PathBuf> = None;
    let mut model_override: Option<Model> = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dmg" => model_override = Some(Model::Dmg),
            "--cgb" => model_override = Some(Model::Cgb),
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'\n{USAGE}"),
            path => rom_path = Some(PathBuf::from(path)),
        }
    }
    let Some(rom_path) = rom_path else {
        bail!("{USAGE}");
    };

    let config = Config::load_or_create(Path::new("pocketboy.ini"));
    if config.border {
        log::info!("[app] border display is enabled in the config but not rendered");
    }

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM {}", rom_path.display()))?;
    // Battery saves live next to the ROM.
    let save_path = rom_path.with_extension("sav");

    let model = model_override.unwrap_or(config.model);
    let mut gameboy = GameBoy::new(rom, Some(save_path), model);
    gameboy.set_palette(config.palette);

    let app = GameBoyApp::new(gameboy)
        .with_bindings(config.bindings)
        .with_scale(config.scale);

    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)
}
