use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::opcode::Opcode;
use crate::operations::{self, Flow};
use crate::quirks::Quirks;
use crate::state::{FrameBuffer, State};

/// The result of a single successful `step`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Executed(Instruction),
    /// Fx0A is waiting for a key; the same instruction runs again on the next step
    AwaitingKey,
    /// The fetched word isn't an instruction; it was skipped
    UnknownOpcode(Opcode),
}

/// Fired by `advance_timers` when the sound timer runs out
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToneCue;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `quirks` the program expects
///  - the random number generator backing `Cxkk`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU by one instruction
/// - advancing its timers by one 60Hz tick
/// - inspecting its frame buffer for rendering by some display
///
/// Nothing here is synchronized; a host that renders on another thread must wrap the whole
/// `Chip8` in a lock.
pub struct Chip8<R = StdRng> {
    state: State,
    quirks: Quirks,
    rng: R,
}

impl Chip8<StdRng> {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self::with_rng(StdRng::from_entropy(), quirks)
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Chip8<R> {
    /// Creates an interpreter drawing `Cxkk` bytes from `rng`
    pub fn with_rng(rng: R, quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            quirks,
            rng,
        }
    }

    /// Returns the machine to its power-on state, keeping the quirks and generator
    pub fn reset(&mut self) {
        self.state = State::new();
    }

    /// Copies a ROM into memory at 0x200.
    ///
    /// Fails without touching memory if the ROM doesn't fit.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        log::debug!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at pc and moves pc past it
    /// - decodes it, skipping it if it's unknown
    /// - executes it
    ///
    /// A stack fault leaves the machine as it was before the call, with pc on the faulting
    /// instruction.
    pub fn step(&mut self) -> Result<Step, Chip8Error> {
        let pc = self.state.pc;
        let op = Opcode::fetch(&self.state.memory, pc);
        self.state.pc = pc.wrapping_add(2);

        let instruction = match Instruction::decode(op) {
            Ok(instruction) => instruction,
            Err(err) => {
                log::warn!("{} at {:#05X}; skipping", err, pc);
                return Ok(Step::UnknownOpcode(op));
            }
        };
        log::trace!("{:#05X} {} {}", pc, op, instruction);

        match operations::execute(&mut self.state, instruction, &self.quirks, &mut self.rng) {
            Ok(Flow::Continue) => Ok(Step::Executed(instruction)),
            Ok(Flow::AwaitingKey) => Ok(Step::AwaitingKey),
            Err(err) => {
                self.state.pc = pc;
                Err(err)
            }
        }
    }

    /// Counts both timers down by one, as happens 60 times a second.
    /// Returns a cue when the sound timer reaches 0 from a positive value.
    pub fn advance_timers(&mut self) -> Option<ToneCue> {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            if self.state.sound_timer == 0 {
                log::debug!("sound timer expired");
                return Some(ToneCue);
            }
        }
        None
    }

    /// Runs `steps_per_tick` instructions followed by one timer tick
    pub fn run_frame(&mut self, steps_per_tick: u32) -> Result<Option<ToneCue>, Chip8Error> {
        for _ in 0..steps_per_tick {
            self.step()?;
        }
        Ok(self.advance_timers())
    }

    /// Set the pressed status of key; keys above 0xF are ignored
    pub fn key_press(&mut self, key: u8) {
        if let Some(down) = self.state.keypad.get_mut(key as usize) {
            *down = true;
        }
    }

    /// Unset the pressed status of key; keys above 0xF are ignored
    pub fn key_release(&mut self, key: u8) {
        if let Some(down) = self.state.keypad.get_mut(key as usize) {
            *down = false;
        }
    }

    /// Overwrites the status of every key at once
    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.state.keypad = keys;
    }

    pub fn keys(&self) -> &[bool; 16] {
        &self.state.keypad
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether the frame buffer changed since the host last presented it
    pub fn needs_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// Returns the FrameBuffer if the display should be redrawn, clearing the redraw flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn acknowledge_redraw(&mut self) {
        self.state.draw_flag = false;
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn quirks(&self) -> &Quirks {
        &self.quirks
    }

    pub fn v(&self, register: usize) -> u8 {
        self.state.v[register & 0xF]
    }

    pub fn i(&self) -> u16 {
        self.state.i
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn sp(&self) -> u8 {
        self.state.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.state.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SPRITE_SHEET;
    use rand::rngs::mock::StepRng;

    fn chip8_with(rom: &[u8]) -> Chip8<StepRng> {
        let mut chip8 = Chip8::with_rng(StepRng::new(0, 1), Quirks::default());
        chip8.load(rom).unwrap();
        chip8
    }

    #[test]
    fn test_new_chip8_holds_sprite_sheet() {
        let chip8 = Chip8::new();
        assert_eq!(chip8.memory()[..80], SPRITE_SHEET[..]);
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_load_copies_rom_to_program_start() {
        let chip8 = chip8_with(&[0xAA, 0xBB, 0xCC]);
        assert_eq!(chip8.memory()[0x200..0x203], [0xAA, 0xBB, 0xCC]);
        assert_eq!(chip8.memory()[0x203], 0);
    }

    #[test]
    fn test_load_accepts_rom_filling_memory() {
        let mut chip8 = Chip8::new();
        assert_eq!(chip8.load(&[0x11; MAX_ROM_SIZE]), Ok(()));
        assert_eq!(chip8.memory()[0xFFF], 0x11);
    }

    #[test]
    fn test_load_rejects_oversized_rom() {
        let mut chip8 = Chip8::new();
        let result = chip8.load(&[0x11; MAX_ROM_SIZE + 1]);
        assert_eq!(
            result,
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        );
        assert!(chip8.memory()[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        assert_eq!(chip8.step(), Ok(Step::Executed(Instruction::Cls)));
        assert_eq!(chip8.pc(), 0x202);
    }

    #[test]
    fn test_step_skips_unknown_opcodes() {
        let mut chip8 = chip8_with(&[0x51, 0x21, 0x61, 0x07]);
        assert_eq!(chip8.step(), Ok(Step::UnknownOpcode(Opcode(0x5121))));
        assert_eq!(chip8.pc(), 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.v(1), 0x07);
    }

    #[test]
    fn test_step_rewinds_on_stack_fault() {
        let mut chip8 = chip8_with(&[0x00, 0xEE]);
        assert_eq!(
            chip8.step(),
            Err(Chip8Error::StackUnderflow { pc: 0x200 })
        );
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.sp(), 0);
    }

    #[test]
    fn test_seventeenth_nested_call_overflows() {
        // 0x200: CALL 0x200, forever
        let mut chip8 = chip8_with(&[0x22, 0x00]);
        for _ in 0..16 {
            chip8.step().unwrap();
        }
        assert_eq!(chip8.sp(), 16);
        assert_eq!(
            chip8.step(),
            Err(Chip8Error::StackOverflow { pc: 0x200 })
        );
        assert_eq!(chip8.sp(), 16);
        assert_eq!(chip8.pc(), 0x200);
    }

    #[test]
    fn test_awaiting_key_reports_and_holds_pc() {
        let mut chip8 = chip8_with(&[0xF3, 0x0A]);
        assert_eq!(chip8.step(), Ok(Step::AwaitingKey));
        assert_eq!(chip8.pc(), 0x200);
        chip8.key_press(0xB);
        assert_eq!(
            chip8.step(),
            Ok(Step::Executed(Instruction::LdVxK { x: 0x3 }))
        );
        assert_eq!(chip8.v(3), 0xB);
    }

    #[test]
    fn test_timers_count_down_and_cue_tone_once() {
        let mut chip8 = chip8_with(&[]);
        chip8.state.delay_timer = 2;
        chip8.state.sound_timer = 2;
        assert_eq!(chip8.advance_timers(), None);
        assert_eq!(chip8.advance_timers(), Some(ToneCue));
        assert_eq!(chip8.advance_timers(), None);
        assert_eq!((chip8.delay_timer(), chip8.sound_timer()), (0, 0));
    }

    #[test]
    fn test_run_frame_ticks_once_per_frame() {
        // LD V0, 0x05; LD DT, V0; then JP to self
        let mut chip8 = chip8_with(&[0x60, 0x05, 0xF0, 0x15, 0x12, 0x04]);
        assert_eq!(chip8.run_frame(10), Ok(None));
        assert_eq!(chip8.delay_timer(), 4);
        assert_eq!(chip8.pc(), 0x204);
    }

    #[test]
    fn test_keys_above_f_are_ignored() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0x10);
        assert_eq!(chip8.keys(), &[false; 16]);
        chip8.key_press(0xF);
        assert!(chip8.keys()[0xF]);
        chip8.key_release(0xF);
        assert!(!chip8.keys()[0xF]);
    }

    #[test]
    fn test_take_frame_clears_redraw_flag() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.needs_redraw());
        assert!(chip8.take_frame().is_some());
        assert!(!chip8.needs_redraw());
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut chip8 = chip8_with(&[0x60, 0x05]);
        chip8.step().unwrap();
        chip8.reset();
        assert_eq!(chip8.pc(), 0x200);
        assert_eq!(chip8.v(0), 0);
        assert_eq!(chip8.memory()[0x200], 0);
    }
}
