/// Bytes of addressable memory; addresses are 12 bits wide
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded here; everything below is reserved for the interpreter
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Depth of the call stack
pub const STACK_SIZE: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Instructions executed per timer tick when the host doesn't choose otherwise
pub const DEFAULT_STEPS_PER_TICK: u32 = 10;

/// Rate at which the delay and sound timers count down
pub const TIMER_HZ: u32 = 60;

/// Each glyph in the sprite sheet is 5 rows tall
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite Sheet
/// Hexadecimal digits 0..F drawn as 4x5 sprites, stored from address 0x000.
///
/// Each byte is one row; only the high nibble is lit. The glyph for `0`:
/// ```text
/// 0xF0  ####
/// 0x90  #..#
/// 0x90  #..#
/// 0x90  #..#
/// 0xF0  ####
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
