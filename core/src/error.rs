use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Faults raised while executing a program.
///
/// Any fault halts the CPU; it stays halted (and keeps reporting the same
/// fault) until the machine is reset or a new ROM is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Fault {
    #[error("memory access out of range at {address:#06X}")]
    AddressFault { address: usize },
    #[error("pixel ({x}, {y}) is outside the display")]
    OutOfBounds { x: usize, y: usize },
    #[error("stack overflow: more than 16 nested calls")]
    StackOverflow,
    #[error("stack underflow: return with an empty stack")]
    StackUnderflow,
    #[error("invalid opcode {0:#06X}")]
    InvalidOpcode(u16),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("ROM is {size} bytes but at most {max} fit in memory")]
    TooLarge { size: usize, max: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("key {0:#04X} is not on the keypad")]
    InvalidKey(u8),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("clock speed must be at least 1Hz")]
    ZeroClockSpeed,
    #[error("unknown quirk mode {0:?}")]
    UnknownQuirkMode(String),
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("save state is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save state version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("malformed save state: {0}")]
    Malformed(&'static str),
}
