use serde::{Deserialize, Serialize};

use crate::constants::CLOCK_SPEED;
use crate::quirks::{QuirkMode, Quirks};

/// How a `Chip8` is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub quirks: Quirks,
    /// Instructions per second
    pub clock_speed: u32,
    /// Seed for `Cxkk`; `None` picks one at random
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config::from(QuirkMode::default())
    }
}

impl From<QuirkMode> for Config {
    fn from(mode: QuirkMode) -> Self {
        Config {
            quirks: mode.quirks(),
            clock_speed: CLOCK_SPEED,
            seed: None,
        }
    }
}
