/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// 0x200 is where ROMs are loaded into memory and where the pc starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between PROGRAM_START and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// 0x050 - 0x09F is reserved for the sprite sheet
pub const FONT_START: u16 = 0x050;

/// Each hex digit sprite is 5 rows tall
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Maximum number of nested subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Both timers count down at 60Hz regardless of the instruction rate
pub const TIMER_HZ: u32 = 60;

/// Default instruction rate in Hz; the COSMAC VIP ran somewhere around 500-1000
pub const CLOCK_SPEED: u32 = 700;

/// Number of past states kept for rewinding, roughly 10 seconds at 60 ticks per second
pub const MAX_SAVED_STATES: usize = 600;

/// Version tag written into every save state
pub const SAVE_STATE_VERSION: u32 = 1;

/// # Sprite Sheet
/// Every hex digit 0..F is represented by a 4x5 sprite.
///
/// ```text
/// ████ 11110000 0xF0
/// █  █ 10010000 0x90
/// █  █ 10010000 0x90
/// █  █ 10010000 0x90
/// ████ 11110000 0xF0
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
