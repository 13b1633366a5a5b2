use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which register `8xy6`/`8xyE` shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShiftSource {
    /// Vx = Vy shifted, as on the COSMAC VIP
    Vy,
    /// Vx is shifted in place, as on CHIP-48 and later
    Vx,
}

/// What `Fx55`/`Fx65` leave in I
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexIncrement {
    /// I ends up at I + x + 1
    Increment,
    /// I is left alone
    Unchanged,
}

/// Order in which `8xy_` arithmetic writes its result and VF.
/// Only observable when x is F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOrder {
    /// Result first, then the flag; VF holds the flag
    FlagLast,
    /// Flag first, then the result; VF holds the result
    ResultLast,
}

/// The behaviors real interpreters disagree on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quirks {
    pub shift_source: ShiftSource,
    pub index_increment: IndexIncrement,
    /// `8xy1`/`8xy2`/`8xy3` reset VF to 0
    pub logic_resets_vf: bool,
    pub flag_order: FlagOrder,
}

/// # Quirk modes
///
/// Presets for the interpreters ROMs were written against.
///
/// - `Cosmac` matches the original COSMAC VIP interpreter. Programs written
///   for the VIP in the 1970s and the "quirks" checks of the common CHIP-8
///   test suites expect this.
/// - `Modern` matches CHIP-48/SUPER-CHIP era interpreters, which most ROMs
///   written from the 90s onwards were tested on. David Winter's `INVADERS`
///   is the usual example: it relies on shifting Vx in place. Pick this when
///   shifts or register load/store loops misbehave under `Cosmac`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuirkMode {
    Cosmac,
    Modern,
}

impl QuirkMode {
    pub fn quirks(self) -> Quirks {
        match self {
            QuirkMode::Cosmac => Quirks {
                shift_source: ShiftSource::Vy,
                index_increment: IndexIncrement::Increment,
                logic_resets_vf: true,
                flag_order: FlagOrder::FlagLast,
            },
            QuirkMode::Modern => Quirks {
                shift_source: ShiftSource::Vx,
                index_increment: IndexIncrement::Unchanged,
                logic_resets_vf: false,
                flag_order: FlagOrder::FlagLast,
            },
        }
    }
}

impl Default for QuirkMode {
    fn default() -> Self {
        QuirkMode::Cosmac
    }
}

impl From<QuirkMode> for Quirks {
    fn from(mode: QuirkMode) -> Self {
        mode.quirks()
    }
}

impl Default for Quirks {
    fn default() -> Self {
        QuirkMode::default().quirks()
    }
}

impl FromStr for QuirkMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosmac" | "vip" | "original" => Ok(QuirkMode::Cosmac),
            "modern" | "chip48" | "schip" => Ok(QuirkMode::Modern),
            _ => Err(ConfigError::UnknownQuirkMode(s.to_string())),
        }
    }
}

impl fmt::Display for QuirkMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuirkMode::Cosmac => write!(f, "cosmac"),
            QuirkMode::Modern => write!(f, "modern"),
        }
    }
}
