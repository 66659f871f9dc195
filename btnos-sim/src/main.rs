//! BtnOS host simulator
//!
//! Runs the shell against an in-memory 320x240 panel, replaying touches from
//! a script. Apps come from `device.toml`; the final screen can be saved as
//! a PPM image.
//!
//! ```text
//! btnos-sim --script demos/wifi.touch --screenshot wifi.ppm
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use btnos_core::{AppHandler, Device, Dispatcher};
use btnos_drivers::display::GraphicsDisplay;
use chrono::NaiveDateTime;
use clap::Parser;
use log::{info, warn};

mod clock;
mod config;
mod framebuffer;
mod peripherals;
mod script;

use crate::clock::HostClock;
use crate::config::SimConfig;
use crate::framebuffer::Framebuffer;
use crate::peripherals::HostPeripherals;
use crate::script::ScriptTouch;

/// Upper bound on shell steps for one run
const MAX_STEPS: u64 = 1_000_000;

#[derive(Debug, Parser)]
#[command(name = "btnos-sim", version, about = "Touch button shell simulator")]
struct Args {
    /// Device configuration (defaults to the embedded device.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Touch script to replay
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Write the final screen here as a PPM image
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Host directory standing in for the SD card
    #[arg(long, default_value = "target/sd-card")]
    card_dir: PathBuf,

    /// Start the clock at this local time (YYYY-MM-DDTHH:MM:SS) and advance
    /// it only when the shell sleeps
    #[arg(long, value_parser = parse_time)]
    time: Option<NaiveDateTime>,
}

fn parse_time(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("  -> {}", cause);
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    info!("BtnOS simulator starting...");

    let config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::embedded()?,
    };
    let touch = match &args.script {
        Some(path) => ScriptTouch::from_file(path)?,
        None => ScriptTouch::default(),
    };
    info!("{} touch samples queued", touch.remaining());

    let clock = match args.time {
        Some(start) => HostClock::fixed(start),
        None => HostClock::realtime(),
    };
    let device = Device {
        display: GraphicsDisplay::new(Framebuffer::new()),
        touch,
        clock,
        peripherals: HostPeripherals::new(&config.networks, &args.card_dir),
    };

    // Handlers must outlive the dispatcher that borrows them
    let mut handlers: Vec<Box<dyn AppHandler>> =
        config.apps.iter().map(|app| app.kind.handler()).collect();
    let mut shell = Dispatcher::new(device, config.params.clone());

    for (app, handler) in config.apps.iter().zip(handlers.iter_mut()) {
        if let Err(e) = shell.install_app(&app.install(), handler.as_mut()) {
            bail!("app in slot {} rejected ({}), device reset", app.slot, e);
        }
    }

    shell.start().context("drawing home screen")?;

    let mut steps = 0u64;
    while !shell.state().is_terminal() && !shell.touch_mut().is_finished() {
        if steps == MAX_STEPS {
            warn!("giving up after {} steps", MAX_STEPS);
            break;
        }
        if let Err(e) = shell.step() {
            warn!("step failed: {:?}", e);
        }
        steps += 1;
    }
    info!("stopped in {:?} after {} steps", shell.state(), steps);

    let power = &shell.peripherals().power.requests;
    if !power.is_empty() {
        info!("power requests: {:?}", power);
    }

    if let Some(path) = &args.screenshot {
        shell.display().inner().save_ppm(path)?;
        info!("screenshot written to {}", path.display());
    }
    Ok(())
}
