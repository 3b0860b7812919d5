use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;

mod animation;
mod config;
mod constants;
mod display;
mod renderer;
mod scene;
mod showcase;
mod texture_loader;
mod tween;

use crate::config::CarouselConfig;
use crate::display::Display;
use crate::renderer::Renderer;
use crate::showcase::Showcase;
use crate::texture_loader::load_sprites;

#[derive(Parser, Debug)]
#[command(author, version, about = "3D product carousel", long_about = None)]
struct Args {
    /// RON configuration file; the built-in showcase is used when omitted
    config: Option<PathBuf>,

    /// Directory the sprite paths are relative to
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Initial window width
    #[arg(long)]
    width: Option<i32>,

    /// Initial window height
    #[arg(long)]
    height: Option<i32>,

    /// Target frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> Result<CarouselConfig> {
    let mut config = match &args.config {
        Some(path) => CarouselConfig::from_file(path)?,
        None => CarouselConfig::default(),
    };
    if let Some(assets) = &args.assets {
        config.assets = assets.clone();
    }
    if let Some(width) = args.width {
        config.window.0 = width;
    }
    if let Some(height) = args.height {
        config.window.1 = height;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.dump_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let (width, height) = config.window;
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("Carousel")
        .vsync()
        .resizable()
        .msaa_4x()
        .build();
    rl.set_target_fps(config.fps);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Load Sprites ---
    let textures = match load_sprites(&mut rl, &thread, &config) {
        Ok(textures) => textures,
        Err(e) => {
            log::error!("{:#}", e);
            let mut d = rl.begin_drawing(&thread);
            d.clear_background(Color::BLACK);
            d.draw_text(&format!("Error: {:#}", e), 20, 20, 20, Color::RED);
            drop(d);
            std::thread::sleep(Duration::from_secs(5));
            return Err(e);
        }
    };

    let mut renderer = Renderer::new(&mut rl, &thread, textures).context("Failed to set up shaders")?;
    let mut display = Display::new(&config, rl.get_screen_width(), rl.get_screen_height());
    let mut showcase = Showcase::new();
    log::info!("Carousel ready with {} items", display.len());

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();

        let (sw, sh) = (rl.get_screen_width(), rl.get_screen_height());
        if display.resize(sw, sh) {
            log::debug!("Viewport resized to {}x{}", sw, sh);
        }

        if rl.get_mouse_delta() != Vector2::new(0.0, 0.0) {
            let bounds = Rectangle::new(0.0, 0.0, sw as f32, sh as f32);
            display.on_pointer_move(rl.get_mouse_position(), bounds);
        }
        showcase.handle_input(&rl, &mut display);

        display.update(dt);

        let mut d = rl.begin_drawing(&thread);
        renderer.draw(&mut d, display.scene());
        showcase.draw(&mut d, &display);
    }

    Ok(())
}
