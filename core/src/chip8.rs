use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info};
use serde_json::Value;

use crate::clock::{Clock, Clocked};
use crate::config::Config;
use crate::constants::MAX_SAVED_STATES;
use crate::cpu::{Cpu, CpuState};
use crate::error::{ConfigError, Fault, InputError, LoadError, StateError};
use crate::framebuffer::Framebuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::quirks::QuirkMode;
use crate::state;

/// The parts of a Chip-8 that change while a program runs
#[derive(Clone)]
pub(crate) struct Machine {
    pub(crate) cpu: Cpu,
    pub(crate) memory: Memory,
    pub(crate) framebuffer: Framebuffer,
    pub(crate) keypad: Keypad,
}

impl Machine {
    fn new(config: &Config, memory: Memory) -> Self {
        Machine {
            cpu: Cpu::new(config.quirks, config.seed),
            memory,
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
        }
    }
}

impl Clocked for Machine {
    fn cycle(&mut self) -> Result<(), Fault> {
        self.cpu
            .step(&mut self.memory, &mut self.framebuffer, &mut self.keypad)
    }

    fn tick_timers(&mut self) {
        self.cpu.tick_timers();
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the running `machine` (cpu, memory, display and keypad)
///  - a `clock` turning wall time into cycles and 60Hz timer ticks
///  - `previous_states` for rewinding
///  - the memory `image` right after the last load, for resets
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the machine by wall time or by a single instruction
/// - rewinding, resetting, saving and restoring
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    machine: Machine,
    clock: Clock,
    config: Config,
    image: Memory,
    previous_states: VecDeque<Machine>,
}

// TODO explore time/memory efficiency of more compact representations of past states (e.g. diffs)
impl Chip8 {
    /// A machine with the given quirks running at the default clock speed
    pub fn new(mode: QuirkMode) -> Self {
        Self::build(Config::from(mode), Clock::default())
    }

    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        let clock = Clock::new(config.clock_speed)?;
        Ok(Self::build(config, clock))
    }

    fn build(config: Config, clock: Clock) -> Self {
        let image = Memory::new();
        Chip8 {
            machine: Machine::new(&config, image.clone()),
            clock,
            config,
            image,
            previous_states: VecDeque::with_capacity(MAX_SAVED_STATES),
        }
    }

    /// Loads a ROM at 0x200 and resets everything else.
    /// On error the machine is left as it was.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        let mut image = Memory::new();
        image.load_program(rom)?;
        self.image = image;
        self.reset();
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Back to the state right after the last `load`
    pub fn reset(&mut self) {
        self.machine.cpu.reset();
        self.machine.memory = self.image.clone();
        self.machine.framebuffer.clear();
        self.machine.keypad.release_all();
        self.clock.restart();
        self.previous_states.clear();
        debug!("reset");
    }

    /// Runs everything that falls within `elapsed` of wall time: instructions
    /// at the clock speed and timer ticks at 60Hz.
    ///
    /// Returns the fault that halted the machine, now or on an earlier tick.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), Fault> {
        if let CpuState::Halted(fault) = self.machine.cpu.state {
            return Err(fault);
        }
        self.push_history();
        self.clock.advance(elapsed, &mut self.machine)
    }

    /// Executes a single instruction without touching the timers
    pub fn step(&mut self) -> Result<(), Fault> {
        self.machine.cycle()
    }

    /// Reverses the machine by a single tick if possible
    /// - if there are previous_states, pops the last one and restores it
    pub fn rewind(&mut self) -> bool {
        match self.previous_states.pop_front() {
            Some(machine) => {
                self.machine = machine;
                self.machine.cpu.draw_flag = true;
                debug!("rewound, {} states left", self.previous_states.len());
                true
            }
            None => false,
        }
    }

    /// Puts the current machine in previous_states
    /// - if there are already MAX_SAVED_STATES saved then the oldest is dropped
    fn push_history(&mut self) {
        if self.previous_states.len() == MAX_SAVED_STATES {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(self.machine.clone());
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit index of the key that changed
    /// * `pressed` whether it is now down
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), InputError> {
        self.machine.keypad.set_key(key, pressed)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.machine.framebuffer
    }

    /// Returns the frame buffer if the display should be redrawn, clearing the flag
    pub fn take_frame(&mut self) -> Option<&Framebuffer> {
        if self.machine.cpu.draw_flag {
            self.machine.cpu.draw_flag = false;
            Some(&self.machine.framebuffer)
        } else {
            None
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.machine.cpu
    }

    pub fn cpu_state(&self) -> CpuState {
        self.machine.cpu.state
    }

    pub fn registers(&self) -> &[u8; 16] {
        self.machine.cpu.registers()
    }

    pub fn index(&self) -> u16 {
        self.machine.cpu.index()
    }

    pub fn pc(&self) -> u16 {
        self.machine.cpu.pc()
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.cpu.delay_timer()
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.cpu.sound_timer()
    }

    /// The buzzer sounds while the sound timer is above zero
    pub fn sound_active(&self) -> bool {
        self.machine.cpu.sound_timer() > 0
    }

    pub fn memory(&self) -> &Memory {
        &self.machine.memory
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_clock_speed(&mut self, clock_speed: u32) -> Result<(), ConfigError> {
        self.clock.set_clock_speed(clock_speed)?;
        self.config.clock_speed = clock_speed;
        Ok(())
    }

    pub fn save_state(&self) -> Value {
        state::capture(&self.machine)
    }

    /// Replaces the running machine with a saved one.
    /// Rewind history is dropped; on error nothing changes.
    pub fn load_state(&mut self, v: &Value) -> Result<(), StateError> {
        self.machine = state::restore(v, self.config.quirks, self.config.seed)?;
        self.previous_states.clear();
        debug!("restored save state at pc {:#05X}", self.machine.cpu.pc);
        Ok(())
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(QuirkMode::default())
    }
}
