use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use chip8_core::Quirks;

mod config;
mod display;
mod keymap;
mod run;

use config::Config;
use run::RunOptions;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum QuirkPreset {
    Default,
    Chip48,
    CosmacVip,
}

impl From<QuirkPreset> for Quirks {
    fn from(preset: QuirkPreset) -> Self {
        match preset {
            QuirkPreset::Default => Quirks::default(),
            QuirkPreset::Chip48 => Quirks::chip48(),
            QuirkPreset::CosmacVip => Quirks::cosmac_vip(),
        }
    }
}

/// Runs a Chip-8 ROM without a window
#[derive(Parser, Debug)]
#[command(name = "chip8", version)]
struct Args {
    /// Path to the ROM image
    rom: PathBuf,

    /// TOML file with steps_per_tick, tick_hz and a [quirks] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Instructions executed between two timer ticks
    #[arg(long)]
    steps_per_tick: Option<u32>,

    /// Timer ticks per second
    #[arg(long)]
    tick_hz: Option<u32>,

    /// Interpreter flavour to emulate; replaces any [quirks] from the config file
    #[arg(long, value_enum)]
    quirks: Option<QuirkPreset>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Ignore the tick rate and run as fast as possible
    #[arg(long)]
    fast: bool,

    /// Keyboard keys held down for the whole run, e.g. "q,w" (1234/qwer/asdf/zxcv layout)
    #[arg(long, default_value = "")]
    hold: String,

    /// Print the display when the run ends
    #[arg(long)]
    dump: bool,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };
        if let Some(steps) = self.steps_per_tick {
            config.steps_per_tick = steps;
        }
        if let Some(hz) = self.tick_hz {
            config.tick_hz = hz;
        }
        if let Some(preset) = self.quirks {
            config.quirks = preset.into();
        }
        config.validate()?;
        Ok(config)
    }

    fn options(&self) -> Result<RunOptions> {
        Ok(RunOptions {
            frames: self.frames,
            fast: self.fast,
            held: keymap::held_keys(&self.hold)?,
            dump: self.dump,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.config()?;
    let options = args.options()?;
    log::debug!("{:?} {:?}", config, options);

    let summary = run::run(&args.rom, &config, &options)?;
    log::info!(
        "ran {} frames ({} redraws, {} tones)",
        summary.frames,
        summary.redraws,
        summary.tones
    );
    Ok(())
}
