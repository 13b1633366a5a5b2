use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use emu8_core::{Chip8, Config, QuirkMode, CLOCK_SPEED};

#[cfg(feature = "sdl")]
mod audio;
#[cfg(feature = "sdl")]
mod display;
#[cfg(feature = "sdl")]
mod keymap;
mod run;

/// A Chip-8 emulator
#[derive(Parser)]
#[command(name = "chip8", version, about)]
struct Args {
    /// Path to a Chip-8 ROM
    rom: PathBuf,

    /// Interpreter quirks to follow: "cosmac" or "modern"
    #[arg(long, default_value = "cosmac")]
    quirks: QuirkMode,

    /// Instructions per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    clock_speed: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window and print the final screen
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Number of 60Hz frames to run headless
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Dump a JSON save state to this file when the run ends
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        quirks: args.quirks.quirks(),
        clock_speed: args.clock_speed,
        seed: args.seed,
    };
    let mut chip8 = Chip8::with_config(config)?;

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("unable to read ROM {}", args.rom.display()))?;
    chip8.load(&rom)?;
    info!(
        "running {} with {} quirks at {}Hz",
        args.rom.display(),
        args.quirks,
        args.clock_speed
    );

    if args.headless {
        run::run_headless(&mut chip8, args.frames)?;
    } else {
        run::run_windowed(&mut chip8)?;
    }

    if let Some(path) = args.save.as_ref() {
        run::save(&chip8, path)?;
    }
    Ok(())
}
