//! A Chip-8 interpreter core: machine state, instruction decoding and execution.
//!
//! Hosts own a [`Chip8`], `load` a ROM into it and then call `step` several times for every
//! call to `advance_timers`, presenting the frame buffer whenever it changes.
pub use chip8::{Chip8, Step, ToneCue};
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use quirks::Quirks;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod quirks;
mod state;
