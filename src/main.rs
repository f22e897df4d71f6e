//! # Heads-up Watch Face Entry Point
//!
//! Renders a single frame of the watch face from the simulated calendar and
//! the offline weather model, for development without a watch.
//!
//! ```text
//! headsup-watchface [--stdout] [--json] [--ambient] [--no-weather]
//! ```
//!
//! - `--json`: print the frame's draw commands as JSON
//! - `--stdout`: rasterize the frame and print an ASCII preview
//! - `--ambient`: render in ambient mode
//! - `--no-weather`: render as if the weather feed were unavailable
//!
//! Without `--json` or `--stdout` a short summary of the frame is printed.

use anyhow::Context;
use chrono::Utc;
use embedded_graphics::{pixelcolor::Rgb888, prelude::RgbColor};
use headsup_face_lib::{
    calendar::simulated_events,
    canvas::{rasterize, PixelBuffer},
    config::Config,
    draw::{DrawCommand, MonoTextMetrics},
    fallback,
    feeds::Feeds,
    watch_face::WatchFace,
};
use log::{info, warn};
use std::env;

const KNOWN_FLAGS: [&str; 4] = ["--stdout", "--json", "--ambient", "--no-weather"];
const PREVIEW_COLUMNS: u32 = 78;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    for arg in args.iter().filter(|a| !KNOWN_FLAGS.contains(&a.as_str())) {
        warn!("ignoring unknown argument {arg:?}");
    }
    let flag = |name: &str| args.iter().any(|a| a == name);

    let config = Config::load();
    let mut face = WatchFace::new(config).context("invalid watch face configuration")?;
    face.on_ambient_mode_changed(flag("--ambient"));

    let feeds = Feeds::system();
    feeds.publish_events(simulated_events(Utc::now()));
    if flag("--no-weather") {
        info!("weather disabled");
        feeds.publish_weather(None);
    } else {
        feeds.publish_weather(Some(fallback::synthetic_weather(None)));
    }

    let frame = feeds.frame();
    let commands = face.draw(&frame.data(), &MonoTextMetrics);

    if flag("--json") {
        println!("{}", serde_json::to_string_pretty(&commands)?);
        return Ok(());
    }

    if flag("--stdout") {
        let screen = face.config().screen();
        let mut buffer = PixelBuffer::new(screen.width.unsigned_abs(), screen.height.unsigned_abs());
        rasterize(&commands, &mut buffer)?;
        let background = match commands.first() {
            Some(DrawCommand::Clear { color }) => Rgb888::from(*color),
            _ => Rgb888::BLACK,
        };
        print!("{}", buffer.to_ascii(background, PREVIEW_COLUMNS));
        return Ok(());
    }

    let labels: Vec<&str> = commands.iter().filter_map(DrawCommand::text).collect();
    println!(
        "{} frame at {}: {} draw commands",
        if face.mode().is_ambient() { "Ambient" } else { "Interactive" },
        frame.now.format("%Y-%m-%d %H:%M:%S %:z"),
        commands.len()
    );
    println!("Texts: {}", labels.join(" | "));
    Ok(())
}
