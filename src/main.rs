mod demo;

use std::path::PathBuf;

use env_logger::Env;
use pixelforge::display::PixelBuffer;
use pixelforge::{Engine, EngineConfig, Phase, Schedule};

use demo::{Backdrop, Banner, Bouncer, Glass, Spinner};

/// Command line overrides, applied on top of the config file
#[derive(Debug, Default)]
struct Args {
    width: Option<u32>,
    height: Option<u32>,
    scale: Option<u32>,
    no_vsync: bool,
    config: Option<PathBuf>,
    sprite: Option<PathBuf>,
}

fn print_help() {
    let defaults = EngineConfig::default();
    println!("Usage: pixelforge [OPTIONS]");
    println!();
    println!("Options:");
    println!(
        "  --width W, -w W           Frame buffer width (default: {})",
        defaults.width
    );
    println!(
        "  --height H, -h H          Frame buffer height (default: {})",
        defaults.height
    );
    println!("  --resolution WxH, -r WxH  Set both (e.g., 320x200)");
    println!(
        "  --scale N, -s N           Window pixels per buffer pixel (default: {})",
        defaults.pixel_scale
    );
    println!("  --no-vsync                Disable VSync for uncapped framerate");
    println!("  --config PATH             Load engine settings from a JSON file");
    println!("  --sprite PATH             Image to spin (default: built-in checkerboard)");
    println!("  --help                    Show this help message");
    println!();
    println!("Keys: F toggles the FPS overlay, Escape quits.");
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--no-vsync" => parsed.no_vsync = true,
            "--width" | "-w" => {
                parsed.width = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--height" | "-h" => {
                parsed.height = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--resolution" | "-r" => {
                // WxH, e.g. 320x200
                if let Some((w, h)) = value.and_then(|v| v.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                        parsed.width = Some(w);
                        parsed.height = Some(h);
                    }
                }
                i += 1;
            },
            "--scale" | "-s" => {
                parsed.scale = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--config" => {
                parsed.config = value.map(PathBuf::from);
                i += 1;
            },
            "--sprite" => {
                parsed.sprite = value.map(PathBuf::from);
                i += 1;
            },
            "--help" => {
                print_help();
                std::process::exit(0);
            },
            other => log::warn!("ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    parsed
}

fn build_config(args: &Args) -> pixelforge::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(w) = args.width.filter(|&w| w > 0) {
        config.width = w;
    }
    if let Some(h) = args.height.filter(|&h| h > 0) {
        config.height = h;
    }
    if let Some(s) = args.scale.filter(|&s| s > 0) {
        config.pixel_scale = s;
    }
    if args.no_vsync {
        config.vsync = false;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> pixelforge::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = build_config(&args)?;

    let sprite = match &args.sprite {
        Some(path) => PixelBuffer::load(path),
        None => Spinner::checkerboard(),
    };
    let sprite = if sprite.is_empty() {
        log::warn!("sprite is empty, using the checkerboard");
        Spinner::checkerboard()
    } else {
        sprite
    };

    let schedule = Schedule::builder()
        .with_stateful_system(Backdrop::new())
        .with_system(Phase::Render, Glass)
        .with_stateful_system(Bouncer::new())
        .with_stateful_system(Spinner::new(sprite))
        .with_system(Phase::Render, Banner::new(&config.title))
        .build();

    Engine::new(config, schedule).run()
}
