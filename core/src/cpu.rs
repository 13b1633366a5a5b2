use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{FONT_GLYPH_SIZE, FONT_START, PROGRAM_START, STACK_DEPTH};
use crate::error::Fault;
use crate::framebuffer::Framebuffer;
use crate::instruction::{decode, Instruction};
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::quirks::{FlagOrder, IndexIncrement, Quirks, ShiftSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    Running,
    /// Suspended by `Fx0A` until a key goes down; the key is stored in V`register`
    WaitingForKey { register: u8 },
    /// Stopped by a fault; only a reset gets out of here
    Halted(Fault),
}

/// # Chip-8 CPU
///
/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// ## Counter
/// - (pc) a 16-bit program counter, starting at 0x200
///
/// ## Stack
/// - (sp) the number of return addresses on the stack
/// - room for 16 return addresses
///
/// ## Timers
/// - 2 8-bit timers (delay & sound)
/// - the CPU only reads and writes them; the clock counts them down at 60Hz
///
/// One `step` fetches the opcode at pc, bumps pc by 2, decodes and executes
/// it. A fault leaves pc on the faulting instruction and halts the CPU.
#[derive(Clone)]
pub struct Cpu {
    pub(crate) v: [u8; 16],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) state: CpuState,
    pub(crate) draw_flag: bool,
    quirks: Quirks,
    seed: Option<u64>,
    rng: StdRng,
}

impl Cpu {
    /// # Arguments
    /// * `quirks` which historical behavior to follow where interpreters disagree
    /// * `seed` seeds `Cxkk`; `None` draws a seed from the OS
    pub fn new(quirks: Quirks, seed: Option<u64>) -> Self {
        Cpu {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
            state: CpuState::Running,
            draw_flag: false,
            quirks,
            seed,
            rng: Self::make_rng(seed),
        }
    }

    /// Back to power-on values; quirks and seed are kept
    pub fn reset(&mut self) {
        *self = Cpu::new(self.quirks, self.seed);
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Return addresses, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Counts both timers down by one, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Advances the CPU by a single cycle
    /// - reports the fault again if halted
    /// - checks for a key if awaiting a keypress
    /// - otherwise gets and executes the next opcode
    pub fn step(
        &mut self,
        memory: &mut Memory,
        framebuffer: &mut Framebuffer,
        keypad: &mut Keypad,
    ) -> Result<(), Fault> {
        match self.state {
            CpuState::Halted(fault) => return Err(fault),
            CpuState::WaitingForKey { register } => {
                if let Some(key) = keypad.poll_any_pressed() {
                    debug!("key {:X} pressed, stored in V{:X}", key, register);
                    self.v[register as usize] = key;
                    self.state = CpuState::Running;
                }
                return Ok(());
            }
            CpuState::Running => {}
        }

        let at = self.pc;
        let result = self
            .fetch(memory)
            .and_then(|op| decode(op).map(|instruction| (op, instruction)))
            .and_then(|(op, instruction)| {
                trace!(
                    "{:04X} {:04X} {:<16} v{:02X?} i{:04X}",
                    at,
                    op,
                    instruction.to_string(),
                    self.v,
                    self.i
                );
                self.execute(instruction, memory, framebuffer, keypad)
            });

        if let Err(fault) = result {
            warn!("CPU halted at {:#05X}: {}", at, fault);
            self.pc = at;
            self.state = CpuState::Halted(fault);
        }
        result
    }

    /// Gets the opcode pointed at by the pc and moves the pc past it
    fn fetch(&mut self, memory: &Memory) -> Result<u16, Fault> {
        if self.pc < PROGRAM_START {
            return Err(Fault::AddressFault {
                address: self.pc as usize,
            });
        }
        let op = memory.read_word(self.pc as usize)?;
        self.pc = self.pc.wrapping_add(2);
        Ok(op)
    }

    fn execute(
        &mut self,
        instruction: Instruction,
        memory: &mut Memory,
        framebuffer: &mut Framebuffer,
        keypad: &mut Keypad,
    ) -> Result<(), Fault> {
        use Instruction::*;

        match instruction {
            Sys { addr } => debug!("ignoring SYS {:#05X}", addr),
            Cls => {
                framebuffer.clear();
                self.draw_flag = true;
            }
            Ret => self.pc = self.pop()?,
            Jump { addr } => self.pc = addr,
            Call { addr } => {
                self.push(self.pc)?;
                self.pc = addr;
            }
            SkipEqImm { x, kk } => self.skip_if(self.vx(x) == kk),
            SkipNeImm { x, kk } => self.skip_if(self.vx(x) != kk),
            SkipEqReg { x, y } => self.skip_if(self.vx(x) == self.vx(y)),
            LoadImm { x, kk } => self.v[x as usize] = kk,
            AddImm { x, kk } => self.v[x as usize] = self.vx(x).wrapping_add(kk),
            Move { x, y } => self.v[x as usize] = self.vx(y),
            Or { x, y } => {
                self.v[x as usize] |= self.vx(y);
                self.logic_flag();
            }
            And { x, y } => {
                self.v[x as usize] &= self.vx(y);
                self.logic_flag();
            }
            Xor { x, y } => {
                self.v[x as usize] ^= self.vx(y);
                self.logic_flag();
            }
            AddReg { x, y } => {
                let (res, carry) = self.vx(x).overflowing_add(self.vx(y));
                self.set_with_flag(x, res, carry as u8);
            }
            Sub { x, y } => {
                let (res, borrow) = self.vx(x).overflowing_sub(self.vx(y));
                self.set_with_flag(x, res, !borrow as u8);
            }
            ShiftRight { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src >> 1, src & 0x1);
            }
            SubN { x, y } => {
                let (res, borrow) = self.vx(y).overflowing_sub(self.vx(x));
                self.set_with_flag(x, res, !borrow as u8);
            }
            ShiftLeft { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src << 1, src >> 7);
            }
            SkipNeReg { x, y } => self.skip_if(self.vx(x) != self.vx(y)),
            LoadIndex { addr } => self.i = addr,
            JumpOffset { addr } => self.pc = addr + u16::from(self.v[0x0]),
            Random { x, kk } => self.v[x as usize] = self.rng.gen::<u8>() & kk,
            Draw { x, y, n } => {
                let rows = memory.read_slice(self.i as usize, n as usize)?;
                let collided = framebuffer.draw_sprite(self.vx(x), self.vx(y), rows);
                self.v[0xF] = collided as u8;
                self.draw_flag = true;
            }
            SkipKeyPressed { x } => self.skip_if(keypad.is_pressed(self.vx(x))),
            SkipKeyReleased { x } => self.skip_if(!keypad.is_pressed(self.vx(x))),
            LoadDelay { x } => self.v[x as usize] = self.delay_timer,
            WaitKey { x } => {
                debug!("waiting for a key for V{:X}", x);
                keypad.clear_latch();
                self.state = CpuState::WaitingForKey { register: x };
            }
            SetDelay { x } => self.delay_timer = self.vx(x),
            SetSound { x } => self.sound_timer = self.vx(x),
            AddIndex { x } => self.i = self.i.wrapping_add(u16::from(self.vx(x))),
            LoadFont { x } => {
                self.i = FONT_START + u16::from(self.vx(x) & 0xF) * FONT_GLYPH_SIZE;
            }
            Bcd { x } => {
                let vx = self.vx(x);
                memory.write_slice(self.i as usize, &[vx / 100, vx / 10 % 10, vx % 10])?;
            }
            Store { x } => {
                memory.write_slice(self.i as usize, &self.v[..=x as usize])?;
                self.advance_index(x);
            }
            Read { x } => {
                let bytes = memory.read_slice(self.i as usize, x as usize + 1)?;
                self.v[..=x as usize].copy_from_slice(bytes);
                self.advance_index(x);
            }
        }
        Ok(())
    }

    fn vx(&self, x: u8) -> u8 {
        self.v[x as usize]
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    fn push(&mut self, address: u16) -> Result<(), Fault> {
        if self.sp as usize == STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.stack[self.sp as usize] = address;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    fn set_with_flag(&mut self, x: u8, result: u8, flag: u8) {
        match self.quirks.flag_order {
            FlagOrder::FlagLast => {
                self.v[x as usize] = result;
                self.v[0xF] = flag;
            }
            FlagOrder::ResultLast => {
                self.v[0xF] = flag;
                self.v[x as usize] = result;
            }
        }
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        match self.quirks.shift_source {
            ShiftSource::Vy => self.vx(y),
            ShiftSource::Vx => self.vx(x),
        }
    }

    fn logic_flag(&mut self) {
        if self.quirks.logic_resets_vf {
            self.v[0xF] = 0;
        }
    }

    fn advance_index(&mut self, x: u8) {
        if self.quirks.index_increment == IndexIncrement::Increment {
            self.i = self.i.wrapping_add(u16::from(x) + 1);
        }
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quirks::QuirkMode;

    /// A CPU wired to its own memory, display and keypad
    struct Rig {
        cpu: Cpu,
        memory: Memory,
        framebuffer: Framebuffer,
        keypad: Keypad,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_mode(QuirkMode::Cosmac)
        }

        fn with_mode(mode: QuirkMode) -> Self {
            Rig {
                cpu: Cpu::new(mode.quirks(), Some(0)),
                memory: Memory::new(),
                framebuffer: Framebuffer::new(),
                keypad: Keypad::new(),
            }
        }

        fn step(&mut self) -> Result<(), Fault> {
            self.cpu
                .step(&mut self.memory, &mut self.framebuffer, &mut self.keypad)
        }

        /// Places `op` at pc and executes it
        fn exec(&mut self, op: u16) -> Result<(), Fault> {
            let pc = self.cpu.pc as usize;
            self.memory
                .write_slice(pc, &[(op >> 8) as u8, op as u8])
                .unwrap();
            self.step()
        }
    }

    #[test]
    fn test_00e0_cls() {
        let mut rig = Rig::new();
        rig.framebuffer.set(0, 0, true).unwrap();
        rig.exec(0x00E0).unwrap();
        assert_eq!(rig.framebuffer.lit_count(), 0);
        assert!(rig.cpu.draw_flag);
    }

    #[test]
    fn test_00ee_ret() {
        let mut rig = Rig::new();
        rig.cpu.sp = 0x1;
        rig.cpu.stack[0] = 0x0ABC;
        rig.exec(0x00EE).unwrap();
        assert_eq!(rig.cpu.sp, 0x0);
        assert_eq!(rig.cpu.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let mut rig = Rig::new();
        assert_eq!(rig.exec(0x00EE), Err(Fault::StackUnderflow));
        assert_eq!(rig.cpu.state, CpuState::Halted(Fault::StackUnderflow));
        assert_eq!(rig.cpu.pc, 0x200);
    }

    #[test]
    fn test_0nnn_sys_is_ignored() {
        let mut rig = Rig::new();
        rig.exec(0x0123).unwrap();
        assert_eq!(rig.cpu.pc, 0x202);
    }

    #[test]
    fn test_1nnn_jp() {
        let mut rig = Rig::new();
        rig.exec(0x1ABC).unwrap();
        assert_eq!(rig.cpu.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut rig = Rig::new();
        rig.exec(0x2123).unwrap();
        assert_eq!(rig.cpu.sp, 0x1);
        // The return address is the instruction after the call
        assert_eq!(rig.cpu.stack[0], 0x0202);
        assert_eq!(rig.cpu.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut rig = Rig::new();
        rig.cpu.sp = STACK_DEPTH as u8;
        assert_eq!(rig.exec(0x2300), Err(Fault::StackOverflow));
        assert_eq!(rig.cpu.pc, 0x200);
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.exec(0x3111).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let mut rig = Rig::new();
        rig.exec(0x3111).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let mut rig = Rig::new();
        rig.exec(0x4111).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.exec(0x4111).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x5120).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.exec(0x5120).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_6xkk_ld() {
        let mut rig = Rig::new();
        rig.exec(0x6122).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0xFF;
        rig.exec(0x7102).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x01);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut rig = Rig::new();
        rig.cpu.v[0x2] = 0x1;
        rig.exec(0x8120).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_8xy2_8xy3_logic() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x6;
        rig.cpu.v[0x2] = 0x3;
        rig.exec(0x8121).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x7);
        rig.exec(0x8122).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x3);
        rig.exec(0x8123).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x0);
    }

    #[test]
    fn test_logic_vf_reset_quirk() {
        let mut cosmac = Rig::with_mode(QuirkMode::Cosmac);
        cosmac.cpu.v[0xF] = 0x9;
        cosmac.exec(0x8121).unwrap();
        assert_eq!(cosmac.cpu.v[0xF], 0x0);

        let mut modern = Rig::with_mode(QuirkMode::Modern);
        modern.cpu.v[0xF] = 0x9;
        modern.exec(0x8121).unwrap();
        assert_eq!(modern.cpu.v[0xF], 0x9);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0xEE;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x8124).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0xFF);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0xFF;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x8124).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x10);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x33;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x8125).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x22);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_equal_is_noborrow() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x8125).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x00);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.cpu.v[0x2] = 0x12;
        rig.exec(0x8125).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0xFF);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.cpu.v[0x2] = 0x33;
        rig.exec(0x8127).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x22);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x12;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x8127).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0xFF);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_uses_vy_on_cosmac() {
        let mut rig = Rig::with_mode(QuirkMode::Cosmac);
        rig.cpu.v[0x1] = 0xF0;
        rig.cpu.v[0x2] = 0x5;
        rig.exec(0x8126).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x2);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_in_place_on_modern() {
        let mut rig = Rig::with_mode(QuirkMode::Modern);
        rig.cpu.v[0x1] = 0x4;
        rig.cpu.v[0x2] = 0x5;
        rig.exec(0x8126).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x2);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_uses_vy_on_cosmac() {
        let mut rig = Rig::with_mode(QuirkMode::Cosmac);
        rig.cpu.v[0x1] = 0x01;
        rig.cpu.v[0x2] = 0xFF;
        rig.exec(0x812E).unwrap();
        // 0xFF * 2 = 0x01FE
        assert_eq!(rig.cpu.v[0x1], 0xFE);
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_in_place_on_modern() {
        let mut rig = Rig::with_mode(QuirkMode::Modern);
        rig.cpu.v[0x1] = 0x4;
        rig.cpu.v[0x2] = 0xFF;
        rig.exec(0x812E).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0x8);
        assert_eq!(rig.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_flag_order_when_x_is_vf() {
        let mut flag_last = Rig::new();
        flag_last.cpu.v[0xF] = 0xFF;
        flag_last.cpu.v[0x1] = 0x02;
        flag_last.exec(0x8F14).unwrap();
        assert_eq!(flag_last.cpu.v[0xF], 0x1);

        let mut result_last = Rig::new();
        result_last.cpu.quirks.flag_order = FlagOrder::ResultLast;
        result_last.cpu.v[0xF] = 0xFF;
        result_last.cpu.v[0x1] = 0x02;
        result_last.exec(0x8F14).unwrap();
        assert_eq!(result_last.cpu.v[0xF], 0x01);

        let mut result_last = Rig::new();
        result_last.cpu.quirks.flag_order = FlagOrder::ResultLast;
        result_last.cpu.v[0xF] = 0x10;
        result_last.cpu.v[0x1] = 0x02;
        result_last.exec(0x8F14).unwrap();
        assert_eq!(result_last.cpu.v[0xF], 0x12);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.exec(0x9120).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x11;
        rig.cpu.v[0x2] = 0x11;
        rig.exec(0x9120).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let mut rig = Rig::new();
        rig.exec(0xAABC).unwrap();
        assert_eq!(rig.cpu.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut rig = Rig::new();
        rig.cpu.v[0x0] = 0x2;
        rig.exec(0xBABC).unwrap();
        assert_eq!(rig.cpu.pc, 0xABE);
    }

    #[test]
    fn test_cxkk_rnd_is_masked_and_seeded() {
        let mut a = Rig::new();
        let mut b = Rig::new();
        for _ in 0..16 {
            a.exec(0xC10F).unwrap();
            b.exec(0xC10F).unwrap();
            assert_eq!(a.cpu.v[0x1] & 0xF0, 0);
            assert_eq!(a.cpu.v[0x1], b.cpu.v[0x1]);
        }
    }

    #[test]
    fn test_dxyn_drw_draws_font() {
        let mut rig = Rig::new();
        rig.cpu.v[0x0] = 0x1;
        rig.cpu.i = FONT_START;
        // Draw the 0x0 sprite with a 1x 1y offset
        rig.exec(0xD005).unwrap();
        assert_eq!(rig.framebuffer.lit_count(), 14);
        assert!(rig.framebuffer.get(1, 1).unwrap());
        assert!(!rig.framebuffer.get(2, 2).unwrap());
        assert_eq!(rig.cpu.v[0xF], 0x0);
        assert!(rig.cpu.draw_flag);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut rig = Rig::new();
        rig.cpu.i = FONT_START;
        rig.framebuffer.set(0, 0, true).unwrap();
        rig.exec(0xD001).unwrap();
        assert_eq!(rig.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_past_memory_faults() {
        let mut rig = Rig::new();
        rig.cpu.i = 0xFFE;
        assert_eq!(
            rig.exec(0xD005),
            Err(Fault::AddressFault { address: 4096 })
        );
        assert_eq!(rig.framebuffer.lit_count(), 0);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut rig = Rig::new();
        rig.keypad.set_key(0xE, true).unwrap();
        rig.cpu.v[0x1] = 0xE;
        rig.exec(0xE19E).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut rig = Rig::new();
        rig.exec(0xE19E).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut rig = Rig::new();
        rig.exec(0xE1A1).unwrap();
        assert_eq!(rig.cpu.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut rig = Rig::new();
        rig.keypad.set_key(0xE, true).unwrap();
        rig.cpu.v[0x1] = 0xE;
        rig.exec(0xE1A1).unwrap();
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut rig = Rig::new();
        rig.cpu.delay_timer = 0xF;
        rig.exec(0xF107).unwrap();
        assert_eq!(rig.cpu.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_waits_for_new_keypress() {
        let mut rig = Rig::new();
        rig.keypad.set_key(0x3, true).unwrap();
        rig.exec(0xF10A).unwrap();
        assert_eq!(rig.cpu.state, CpuState::WaitingForKey { register: 0x1 });
        assert_eq!(rig.cpu.pc, 0x0202);

        // 0x3 was already down, so it doesn't count
        rig.step().unwrap();
        assert_eq!(rig.cpu.state, CpuState::WaitingForKey { register: 0x1 });
        assert_eq!(rig.cpu.pc, 0x0202);

        rig.keypad.set_key(0x9, true).unwrap();
        rig.keypad.set_key(0xA, true).unwrap();
        rig.step().unwrap();
        assert_eq!(rig.cpu.state, CpuState::Running);
        assert_eq!(rig.cpu.v[0x1], 0x9);
        assert_eq!(rig.cpu.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0xF;
        rig.exec(0xF115).unwrap();
        assert_eq!(rig.cpu.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0xF;
        rig.exec(0xF118).unwrap();
        assert_eq!(rig.cpu.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut rig = Rig::new();
        rig.cpu.i = 0x1;
        rig.cpu.v[0x1] = 0x1;
        rig.cpu.v[0xF] = 0x7;
        rig.exec(0xF11E).unwrap();
        assert_eq!(rig.cpu.i, 0x2);
        assert_eq!(rig.cpu.v[0xF], 0x7);
    }

    #[test]
    fn test_fx29_ld() {
        let mut rig = Rig::new();
        rig.cpu.v[0x1] = 0x2;
        rig.exec(0xF129).unwrap();
        assert_eq!(rig.cpu.i, 0x05A);
    }

    #[test]
    fn test_fx33_ld() {
        let mut rig = Rig::new();
        // 0x7B -> 123
        rig.cpu.v[0x1] = 0x7B;
        rig.cpu.i = 0x300;
        rig.exec(0xF133).unwrap();
        assert_eq!(rig.memory.read_slice(0x300, 3).unwrap(), &[0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx55_ld_increments_i_on_cosmac() {
        let mut rig = Rig::with_mode(QuirkMode::Cosmac);
        rig.cpu.i = 0x300;
        rig.cpu.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        rig.exec(0xF455).unwrap();
        assert_eq!(
            rig.memory.read_slice(0x300, 6).unwrap(),
            &[0x1, 0x2, 0x3, 0x4, 0x5, 0x0]
        );
        assert_eq!(rig.cpu.i, 0x305);
    }

    #[test]
    fn test_fx65_ld_leaves_i_on_modern() {
        let mut rig = Rig::with_mode(QuirkMode::Modern);
        rig.cpu.i = 0x300;
        rig.memory
            .write_slice(0x300, &[0x1, 0x2, 0x3, 0x4, 0x5, 0x6])
            .unwrap();
        rig.exec(0xF465).unwrap();
        assert_eq!(rig.cpu.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(rig.cpu.i, 0x300);
    }

    #[test]
    fn test_invalid_opcode_halts() {
        let mut rig = Rig::new();
        assert_eq!(rig.exec(0xFFFF), Err(Fault::InvalidOpcode(0xFFFF)));
        assert_eq!(rig.cpu.state, CpuState::Halted(Fault::InvalidOpcode(0xFFFF)));
        assert_eq!(rig.step(), Err(Fault::InvalidOpcode(0xFFFF)));
        assert_eq!(rig.cpu.pc, 0x200);
    }

    #[test]
    fn test_fetch_below_program_start_faults() {
        let mut rig = Rig::new();
        rig.exec(0x1000).unwrap();
        assert_eq!(rig.step(), Err(Fault::AddressFault { address: 0 }));
    }

    #[test]
    fn test_fetch_off_the_end_faults() {
        let mut rig = Rig::new();
        rig.exec(0x1FFF).unwrap();
        assert_eq!(rig.step(), Err(Fault::AddressFault { address: 4096 }));
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut cpu = Cpu::new(QuirkMode::Cosmac.quirks(), Some(0));
        cpu.delay_timer = 2;
        cpu.sound_timer = 1;
        cpu.tick_timers();
        assert_eq!((cpu.delay_timer, cpu.sound_timer), (1, 0));
        cpu.tick_timers();
        cpu.tick_timers();
        assert_eq!((cpu.delay_timer, cpu.sound_timer), (0, 0));
    }

    #[test]
    fn test_reset_keeps_quirks() {
        let mut cpu = Cpu::new(QuirkMode::Modern.quirks(), Some(1));
        cpu.pc = 0x400;
        cpu.v[3] = 9;
        cpu.state = CpuState::Halted(Fault::StackOverflow);
        cpu.reset();
        assert_eq!(cpu.pc, PROGRAM_START);
        assert_eq!(cpu.v[3], 0);
        assert_eq!(cpu.state, CpuState::Running);
        assert_eq!(cpu.quirks(), QuirkMode::Modern.quirks());
    }
}
