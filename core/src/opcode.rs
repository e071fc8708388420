use std::fmt;

use crate::constants::MEMORY_SIZE;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` represent a 12-bit address
/// - `(_, _, n, n)` encodes some data that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` refers either to the register Vx or a range of registers V0..Vx
/// - `(_, _, n, _)` refers to the the register Vy
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Reads the opcode at `pc`.
    /// Memory is stored as bytes, so two subsequent bytes are combined; both reads wrap at the
    /// end of the address space.
    pub fn fetch(memory: &[u8; MEMORY_SIZE], pc: u16) -> Self {
        let hi = u16::from(memory[pc as usize % MEMORY_SIZE]);
        let lo = u16::from(memory[(pc as usize + 1) % MEMORY_SIZE]);
        Opcode(hi << 8 | lo)
    }

    /// The Opcode's component nibbles.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (((self.0 & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    /// The Opcode's second nibble.
    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    /// The Opcode's third nibble.
    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    /// The Opcode's fourth nibble.
    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// The Opcode's least significant byte.
    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl From<u16> for Opcode {
    fn from(raw: u16) -> Self {
        Opcode(raw)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}
