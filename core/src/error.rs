use thiserror::Error;

use crate::opcode::Opcode;

/// Everything that can go wrong while loading or running a program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("unknown opcode {opcode}")]
    UnknownOpcode { opcode: Opcode },

    #[error("stack overflow: call at {pc:#05X} with a full call stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },
}
