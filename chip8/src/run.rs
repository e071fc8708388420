use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::RngCore;

use chip8_core::Chip8;

use crate::config::Config;
use crate::display::frame_to_text;

/// How a session is driven, beyond what the config file covers
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many frames; run until interrupted otherwise
    pub frames: Option<u64>,
    /// Whether the tick rate should be ignored
    pub fast: bool,
    /// Keys held down for the whole session
    pub held: [bool; 16],
    /// Print the frame buffer once the session ends
    pub dump: bool,
}

/// What happened during a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub frames: u64,
    pub redraws: u64,
    pub tones: u64,
}

pub fn run(rom: &Path, config: &Config, options: &RunOptions) -> Result<Summary> {
    let bytes = std::fs::read(rom).with_context(|| format!("unable to open {}", rom.display()))?;

    let mut chip8 = Chip8::with_quirks(config.quirks);
    chip8
        .load(&bytes)
        .with_context(|| format!("unable to load {}", rom.display()))?;
    log::info!("successfully loaded {} ({} bytes)", rom.display(), bytes.len());

    let summary = run_frames(&mut chip8, config, options)?;
    if options.dump {
        println!("{}", frame_to_text(chip8.frame()));
    }
    Ok(summary)
}

/// The main loop: one frame is `steps_per_tick` instructions and a timer tick, paced to
/// `tick_hz` unless fast forwarding
pub fn run_frames<R: RngCore>(
    chip8: &mut Chip8<R>,
    config: &Config,
    options: &RunOptions,
) -> Result<Summary> {
    config.validate()?;
    chip8.set_keys(options.held);

    let frame_time = Duration::from_secs(1) / config.tick_hz;
    let mut last_frame = Instant::now();
    let mut summary = Summary::default();

    while options.frames.map_or(true, |limit| summary.frames < limit) {
        let cue = chip8
            .run_frame(config.steps_per_tick)
            .inspect_err(|err| log::error!("{} after {} frames", err, summary.frames))
            .context("emulation halted")?;
        if cue.is_some() {
            log::info!("beep (frame {})", summary.frames);
            summary.tones += 1;
        }

        // The display would be presented here
        if chip8.take_frame().is_some() {
            summary.redraws += 1;
        }
        summary.frames += 1;

        // Handle timing
        let current_time = Instant::now();
        let elapsed = current_time - last_frame;
        if !options.fast && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
        last_frame = Instant::now();
    }

    log::debug!("{:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chip8_core::{Chip8Error, Quirks};
    use rand::rngs::mock::StepRng;

    fn chip8_with(rom: &[u8]) -> Chip8<StepRng> {
        let mut chip8 = Chip8::with_rng(StepRng::new(0, 1), Quirks::default());
        chip8.load(rom).unwrap();
        chip8
    }

    fn fast(frames: u64) -> RunOptions {
        RunOptions {
            frames: Some(frames),
            fast: true,
            ..RunOptions::default()
        }
    }

    #[test]
    fn test_runs_requested_frames() {
        // LD V0, 2; LD ST, V0; CLS; JP 0x206
        let mut chip8 = chip8_with(&[0x60, 0x02, 0xF0, 0x18, 0x00, 0xE0, 0x12, 0x06]);
        let summary = run_frames(&mut chip8, &Config::default(), &fast(5)).unwrap();
        assert_eq!(
            summary,
            Summary {
                frames: 5,
                redraws: 1,
                tones: 1
            }
        );
        assert!(!chip8.needs_redraw());
    }

    #[test]
    fn test_held_keys_reach_the_keypad() {
        // LD V1, K; JP 0x202
        let mut chip8 = chip8_with(&[0xF1, 0x0A, 0x12, 0x02]);
        let mut options = fast(1);
        options.held[0x6] = true;
        run_frames(&mut chip8, &Config::default(), &options).unwrap();
        assert_eq!(chip8.v(1), 0x6);
    }

    #[test]
    fn test_stack_fault_halts() {
        let mut chip8 = chip8_with(&[0x00, 0xEE]);
        let err = run_frames(&mut chip8, &Config::default(), &fast(3)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Chip8Error>(),
            Some(&Chip8Error::StackUnderflow { pc: 0x200 })
        );
    }

    #[test]
    fn test_missing_rom_is_reported() {
        let result = run(
            Path::new("/nonexistent/rom.ch8"),
            &Config::default(),
            &fast(1),
        );
        assert!(result.is_err());
    }
}
