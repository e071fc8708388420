use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};

/// The FrameBuffer is indexed as [y][x]; each byte is a pixel that is either 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// The complete Chip-8 machine state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) doubles as the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack (0..=16)
///
/// Timers
/// - 2 8-bit timers (delay & sound), counting down to 0 at 60Hz
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the hexadecimal sprite sheet
///     - 0x200.. holds the loaded program
/// - 32x64 byte frame buffer
///
/// ## Input
/// - 16 key states, one for each key 0..F
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: [bool; 16],
}

impl State {
    pub fn new() -> Self {
        // 0x000 - 0x050 is reserved for a sprite sheet
        let mut memory = [0; MEMORY_SIZE];
        memory[..SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keypad: [false; 16],
        }
    }

    /// Reads a byte; the address space is 12 bits so addresses wrap
    pub fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    /// Writes a byte; the address space is 12 bits so addresses wrap
    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize % MEMORY_SIZE] = value;
    }

    /// Whether the key named by the low nibble of `key` is held down
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keypad[(key & 0xF) as usize]
    }

    /// The lowest-numbered key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keypad.iter().position(|&down| down).map(|k| k as u8)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
