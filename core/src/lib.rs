pub use chip8::Chip8;
pub use clock::{Clock, Clocked};
pub use config::Config;
pub use constants::{CLOCK_SPEED, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use cpu::{Cpu, CpuState};
pub use error::{ConfigError, Fault, InputError, LoadError, StateError};
pub use framebuffer::Framebuffer;
pub use instruction::{decode, Instruction};
pub use keypad::Keypad;
pub use memory::Memory;
pub use quirks::{FlagOrder, IndexIncrement, QuirkMode, Quirks, ShiftSource};

mod chip8;
mod clock;
mod config;
pub mod constants;
mod cpu;
mod error;
mod framebuffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod quirks;
mod state;
