use anyhow::{Context, Result};
use sdl2::event::Event;
use sdl2::pixels::PixelFormatEnum;
use typed_builder::TypedBuilder;

use pocketboy_common::app::App;
use pocketboy_common::key::Key;
pub use sdl2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGB24,
}

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub title: String,
    #[builder(default = PixelFormat::RGB24)]
    pub pixel_format: PixelFormat,
}

pub struct SdlContext;

impl SdlContext {
    /// Run the SDL presentation loop until the app asks to exit or the
    /// window is closed.
    pub fn run(init_info: SdlInitInfo, mut app: impl App) -> Result<()> {
        let SdlInitInfo {
            width,
            height,
            scale,
            title,
            pixel_format,
        } = init_info;

        let sdl_context = sdl2::init().map_err(anyhow::Error::msg)?;
        let video_subsystem = sdl_context.video().map_err(anyhow::Error::msg)?;
        let window = video_subsystem
            .window(&title, width * scale, height * scale)
            .position_centered()
            .build()
            .context("failed to create SDL window")?;
        let mut canvas = window
            .into_canvas()
            .present_vsync()
            .build()
            .context("failed to create SDL canvas")?;
        canvas
            .set_scale(scale as f32, scale as f32)
            .map_err(anyhow::Error::msg)?;
        let creator = canvas.texture_creator();
        let mut texture = creator
            .create_texture_target(map_pixel_format(pixel_format), width, height)
            .context("failed to create SDL texture")?;

        let bytes_per_pixel = map_pixel_format_size(pixel_format);
        let mut screen_state = vec![0u8; (width * height * bytes_per_pixel) as usize];
        let mut event_pump = sdl_context.event_pump().map_err(anyhow::Error::msg)?;

        app.init();
        loop {
            if app.should_exit() {
                app.exit();
                break;
            }

            while let Some(event) = event_pump.poll_event() {
                match event {
                    Event::Quit { .. } => {
                        app.exit();
                        return Ok(());
                    }
                    Event::KeyDown {
                        keycode: Some(keycode),
                        ..
                    } => app.handle_key_event(map_keycode(keycode), true),
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } => app.handle_key_event(map_keycode(keycode), false),
                    _ => {}
                }
            }

            app.update(&mut screen_state);

            texture
                .update(None, &screen_state, (width * bytes_per_pixel) as usize)
                .context("failed to update SDL texture")?;
            canvas.copy(&texture, None, None).map_err(anyhow::Error::msg)?;
            canvas.present();
        }

        Ok(())
    }
}

pub fn map_pixel_format(pixel_format: PixelFormat) -> PixelFormatEnum {
    match pixel_format {
        PixelFormat::RGB24 => PixelFormatEnum::RGB24,
    }
}

pub fn map_pixel_format_size(pixel_format: PixelFormat) -> u32 {
    match pixel_format {
        PixelFormat::RGB24 => 3,
    }
}

pub fn map_keycode(keycode: sdl2::keyboard::Keycode) -> Key {
    use sdl2::keyboard::Keycode;
    match keycode {
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Return => Key::Return,
        Keycode::RShift => Key::RShift,
        Keycode::Space => Key::Space,
        Keycode::A => Key::A,
        Keycode::B => Key::B,
        Keycode::C => Key::C,
        Keycode::D => Key::D,
        Keycode::E => Key::E,
        Keycode::F => Key::F,
        Keycode::Q => Key::Q,
        Keycode::R => Key::R,
        Keycode::S => Key::S,
        Keycode::V => Key::V,
        Keycode::W => Key::W,
        Keycode::X => Key::X,
        Keycode::Z => Key::Z,
        Keycode::Num1 => Key::Num1,
        Keycode::Num2 => Key::Num2,
        Keycode::Num3 => Key::Num3,
        Keycode::Num4 => Key::Num4,
        _ => Key::None,
    }
}
