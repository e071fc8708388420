//! Runner configuration.
//!
//! Settings come from, in priority order:
//! 1. Command line flags
//! 2. A TOML file passed with `--config`
//! 3. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # Instructions executed between two timer ticks
//! steps_per_tick = 10
//!
//! # Timer ticks per second
//! tick_hz = 60
//!
//! [quirks]
//! shift_uses_vy = true
//! load_store_increments_index = true
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use chip8_core::constants::{DEFAULT_STEPS_PER_TICK, TIMER_HZ};
use chip8_core::Quirks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Instructions executed between two timer ticks
    pub steps_per_tick: u32,

    /// Timer ticks per second; the whole emulation is paced to this
    pub tick_hz: u32,

    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
            tick_hz: TIMER_HZ,
            quirks: Quirks::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_hz == 0 {
            bail!("tick_hz must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.steps_per_tick, 10);
        assert_eq!(config.tick_hz, 60);
        assert_eq!(config.quirks, Quirks::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("steps_per_tick = 12").unwrap();
        assert_eq!(config.steps_per_tick, 12);
        assert_eq!(config.tick_hz, 60);
    }

    #[test]
    fn test_quirks_table() {
        let config = Config::from_toml(
            r#"
            [quirks]
            shift_uses_vy = true
            jump_uses_vx = true
            "#,
        )
        .unwrap();
        assert!(config.quirks.shift_uses_vy);
        assert!(config.quirks.jump_uses_vx);
        assert!(!config.quirks.index_overflow_flag);
    }

    #[test]
    fn test_rejects_zero_tick_rate() {
        assert!(Config::from_toml("tick_hz = 0").is_err());
    }

    #[test]
    fn test_rejects_unparseable_file() {
        assert!(Config::from_toml("steps_per_tick = \"fast\"").is_err());
    }
}
