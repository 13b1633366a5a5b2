use std::convert::TryFrom;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::chip8::Machine;
use crate::constants::{SAVE_STATE_VERSION, STACK_DEPTH};
use crate::cpu::{Cpu, CpuState};
use crate::error::StateError;
use crate::framebuffer::Framebuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::quirks::Quirks;

/// # Save state
/// Everything needed to pick a program up where it left off, as JSON.
///
/// Quirks, clock speed and the random number generator are not part of a
/// save state; they come from whatever machine loads it.
#[derive(Deserialize)]
struct SaveState {
    version: u32,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: Vec<u16>,
    delay_timer: u8,
    sound_timer: u8,
    state: CpuState,
    memory: Vec<u8>,
    framebuffer: Vec<bool>,
    keys: [bool; 16],
}

pub(crate) fn capture(machine: &Machine) -> Value {
    let cpu = &machine.cpu;
    json!({
        "version": SAVE_STATE_VERSION,
        "v": cpu.v,
        "i": cpu.i,
        "pc": cpu.pc,
        "stack": cpu.stack(),
        "delay_timer": cpu.delay_timer,
        "sound_timer": cpu.sound_timer,
        "state": cpu.state,
        "memory": machine.memory.as_slice(),
        "framebuffer": machine.framebuffer.to_bits(),
        "keys": machine.keypad.states(),
    })
}

/// Builds a machine from a captured state.
/// The version is checked before anything else so an old file gets a useful error.
pub(crate) fn restore(v: &Value, quirks: Quirks, seed: Option<u64>) -> Result<Machine, StateError> {
    let found = v["version"]
        .as_u64()
        .ok_or(StateError::Malformed("missing version"))?;
    let found =
        u32::try_from(found).map_err(|_| StateError::Malformed("version out of range"))?;
    if found != SAVE_STATE_VERSION {
        return Err(StateError::Version {
            found,
            expected: SAVE_STATE_VERSION,
        });
    }

    let saved: SaveState = serde_json::from_value(v.clone())?;
    let memory = Memory::from_bytes(&saved.memory)
        .ok_or(StateError::Malformed("memory must be 4096 bytes"))?;
    let framebuffer = Framebuffer::from_bits(&saved.framebuffer)
        .ok_or(StateError::Malformed("framebuffer must be 64x32 pixels"))?;
    if saved.stack.len() > STACK_DEPTH {
        return Err(StateError::Malformed("stack deeper than 16"));
    }
    if let CpuState::WaitingForKey { register } = saved.state {
        if register > 0xF {
            return Err(StateError::Malformed("no such register"));
        }
    }

    let mut cpu = Cpu::new(quirks, seed);
    cpu.v = saved.v;
    cpu.i = saved.i;
    cpu.pc = saved.pc;
    cpu.stack[..saved.stack.len()].copy_from_slice(&saved.stack);
    cpu.sp = saved.stack.len() as u8;
    cpu.delay_timer = saved.delay_timer;
    cpu.sound_timer = saved.sound_timer;
    cpu.state = saved.state;
    cpu.draw_flag = true;

    Ok(Machine {
        cpu,
        memory,
        framebuffer,
        keypad: Keypad::from_states(saved.keys),
    })
}
