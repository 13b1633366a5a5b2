use std::fmt;

use crate::error::Fault;
use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// Register operands are the 4-bit register indices `x`/`y`, `kk` is an
/// immediate byte, `addr` a 12-bit address and `n` the sprite height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: call a machine language routine; ignored
    Sys { addr: u16 },
    /// 00E0: clear the display
    Cls,
    /// 00EE: return from a subroutine
    Ret,
    /// 1nnn: PC = addr
    Jump { addr: u16 },
    /// 2nnn: STACK.push(PC); PC = addr
    Call { addr: u16 },
    /// 3xkk: if Vx == kk then skip
    SkipEqImm { x: u8, kk: u8 },
    /// 4xkk: if Vx != kk then skip
    SkipNeImm { x: u8, kk: u8 },
    /// 5xy0: if Vx == Vy then skip
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk: Vx = kk
    LoadImm { x: u8, kk: u8 },
    /// 7xkk: Vx += kk without touching VF
    AddImm { x: u8, kk: u8 },
    /// 8xy0: Vx = Vy
    Move { x: u8, y: u8 },
    /// 8xy1: Vx |= Vy
    Or { x: u8, y: u8 },
    /// 8xy2: Vx &= Vy
    And { x: u8, y: u8 },
    /// 8xy3: Vx ^= Vy
    Xor { x: u8, y: u8 },
    /// 8xy4: Vx += Vy; VF = carry
    AddReg { x: u8, y: u8 },
    /// 8xy5: Vx -= Vy; VF = !borrow
    Sub { x: u8, y: u8 },
    /// 8xy6: Vx = src >> 1; VF = shifted out bit
    ShiftRight { x: u8, y: u8 },
    /// 8xy7: Vx = Vy - Vx; VF = !borrow
    SubN { x: u8, y: u8 },
    /// 8xyE: Vx = src << 1; VF = shifted out bit
    ShiftLeft { x: u8, y: u8 },
    /// 9xy0: if Vx != Vy then skip
    SkipNeReg { x: u8, y: u8 },
    /// Annn: I = addr
    LoadIndex { addr: u16 },
    /// Bnnn: PC = V0 + addr
    JumpOffset { addr: u16 },
    /// Cxkk: Vx = rand_byte & kk
    Random { x: u8, kk: u8 },
    /// Dxyn: draw an n byte sprite from memory[I..] at (Vx, Vy); VF = collision
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E: if key Vx is pressed then skip
    SkipKeyPressed { x: u8 },
    /// ExA1: if key Vx is not pressed then skip
    SkipKeyReleased { x: u8 },
    /// Fx07: Vx = DT
    LoadDelay { x: u8 },
    /// Fx0A: await a keypress and store it in Vx
    WaitKey { x: u8 },
    /// Fx15: DT = Vx
    SetDelay { x: u8 },
    /// Fx18: ST = Vx
    SetSound { x: u8 },
    /// Fx1E: I += Vx
    AddIndex { x: u8 },
    /// Fx29: I = address of the sprite for digit Vx
    LoadFont { x: u8 },
    /// Fx33: memory[I..I+3] = bcd(Vx)
    Bcd { x: u8 },
    /// Fx55: memory[I..=I+x] = V0..=Vx
    Store { x: u8 },
    /// Fx65: V0..=Vx = memory[I..=I+x]
    Read { x: u8 },
}

/// Selects the correct Instruction for a given Opcode.
///
/// Anything outside the original 35 instructions is an `InvalidOpcode`.
pub fn decode(op: u16) -> Result<Instruction, Fault> {
    let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
    let instruction = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => Instruction::Cls,
        (0x0, 0x0, 0xE, 0xE) => Instruction::Ret,
        (0x0, ..) => Instruction::Sys { addr },
        (0x1, ..) => Instruction::Jump { addr },
        (0x2, ..) => Instruction::Call { addr },
        (0x3, ..) => Instruction::SkipEqImm { x, kk },
        (0x4, ..) => Instruction::SkipNeImm { x, kk },
        (0x5, .., 0x0) => Instruction::SkipEqReg { x, y },
        (0x6, ..) => Instruction::LoadImm { x, kk },
        (0x7, ..) => Instruction::AddImm { x, kk },
        (0x8, .., 0x0) => Instruction::Move { x, y },
        (0x8, .., 0x1) => Instruction::Or { x, y },
        (0x8, .., 0x2) => Instruction::And { x, y },
        (0x8, .., 0x3) => Instruction::Xor { x, y },
        (0x8, .., 0x4) => Instruction::AddReg { x, y },
        (0x8, .., 0x5) => Instruction::Sub { x, y },
        (0x8, .., 0x6) => Instruction::ShiftRight { x, y },
        (0x8, .., 0x7) => Instruction::SubN { x, y },
        (0x8, .., 0xE) => Instruction::ShiftLeft { x, y },
        (0x9, .., 0x0) => Instruction::SkipNeReg { x, y },
        (0xA, ..) => Instruction::LoadIndex { addr },
        (0xB, ..) => Instruction::JumpOffset { addr },
        (0xC, ..) => Instruction::Random { x, kk },
        (0xD, ..) => Instruction::Draw { x, y, n },
        (0xE, _, 0x9, 0xE) => Instruction::SkipKeyPressed { x },
        (0xE, _, 0xA, 0x1) => Instruction::SkipKeyReleased { x },
        (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
        (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
        (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
        (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
        (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
        (0xF, _, 0x2, 0x9) => Instruction::LoadFont { x },
        (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
        (0xF, _, 0x5, 0x5) => Instruction::Store { x },
        (0xF, _, 0x6, 0x5) => Instruction::Read { x },
        _ => return Err(Fault::InvalidOpcode(op)),
    };
    Ok(instruction)
}

/// Disassembles into the conventional Cowgod mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqImm { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeImm { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddImm { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpOffset { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadFont { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
