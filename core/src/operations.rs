use rand::RngCore;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_HEIGHT, STACK_SIZE};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::quirks::Quirks;
use crate::state::State;

/// What the interpreter should report after an instruction ran
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Fx0A found no key held and rewound the pc onto itself
    AwaitingKey,
}

/// Executes a decoded instruction against `state`.
///
/// The pc must already point past the instruction. Instructions that write a result and a flag
/// write VF first, so the result wins when the destination is VF itself, unless
/// `Quirks::flag_written_last` is set.
pub fn execute<R: RngCore + ?Sized>(
    state: &mut State,
    instruction: Instruction,
    quirks: &Quirks,
    rng: &mut R,
) -> Result<Flow, Chip8Error> {
    use Instruction::*;

    match instruction {
        Sys { .. } => {}
        Cls => clr(state),
        Ret => rts(state)?,
        Jp { addr } => state.pc = addr,
        Call { addr } => call(state, addr)?,
        SeByte { x, kk } => {
            let skip = state.v[x as usize] == kk;
            skip_if(state, skip)
        }
        SneByte { x, kk } => {
            let skip = state.v[x as usize] != kk;
            skip_if(state, skip)
        }
        SeReg { x, y } => {
            let skip = state.v[x as usize] == state.v[y as usize];
            skip_if(state, skip)
        }
        LdByte { x, kk } => state.v[x as usize] = kk,
        AddByte { x, kk } => state.v[x as usize] = state.v[x as usize].wrapping_add(kk),
        LdReg { x, y } => state.v[x as usize] = state.v[y as usize],
        Or { x, y } => logic(state, quirks, x, y, |a, b| a | b),
        And { x, y } => logic(state, quirks, x, y, |a, b| a & b),
        Xor { x, y } => logic(state, quirks, x, y, |a, b| a ^ b),
        AddReg { x, y } => add_carry(state, quirks, x, y),
        Sub { x, y } => sub(state, quirks, x, y),
        Shr { x, y } => shr(state, quirks, x, y),
        Subn { x, y } => subn(state, quirks, x, y),
        Shl { x, y } => shl(state, quirks, x, y),
        SneReg { x, y } => {
            let skip = state.v[x as usize] != state.v[y as usize];
            skip_if(state, skip)
        }
        LdI { addr } => state.i = addr,
        JpV0 { addr } => jumpi(state, quirks, addr),
        Rnd { x, kk } => state.v[x as usize] = rand_byte(rng) & kk,
        Drw { x, y, n } => draw(state, x, y, n),
        Skp { x } => {
            let skip = state.is_pressed(state.v[x as usize]);
            skip_if(state, skip)
        }
        Sknp { x } => {
            let skip = !state.is_pressed(state.v[x as usize]);
            skip_if(state, skip)
        }
        LdVxDt { x } => state.v[x as usize] = state.delay_timer,
        LdVxK { x } => return Ok(keyd(state, x)),
        LdDtVx { x } => state.delay_timer = state.v[x as usize],
        LdStVx { x } => state.sound_timer = state.v[x as usize],
        AddI { x } => addi(state, quirks, x),
        LdF { x } => state.i = u16::from(state.v[x as usize]) * SPRITE_HEIGHT,
        LdB { x } => bcd(state, x),
        LdIVx { x } => stor(state, quirks, x),
        LdVxI { x } => read(state, quirks, x),
    }
    Ok(Flow::Continue)
}

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc = state.pc.wrapping_add(2);
    }
}

/// clear
fn clr(state: &mut State) {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
}

/// PC = STACK.pop()
fn rts(state: &mut State) -> Result<(), Chip8Error> {
    if state.sp == 0 {
        return Err(Chip8Error::StackUnderflow {
            pc: state.pc.wrapping_sub(2),
        });
    }
    state.sp -= 1;
    state.pc = state.stack[state.sp as usize];
    Ok(())
}

/// STACK.push(PC); PC = addr
fn call(state: &mut State, addr: u16) -> Result<(), Chip8Error> {
    if state.sp as usize >= STACK_SIZE {
        return Err(Chip8Error::StackOverflow {
            pc: state.pc.wrapping_sub(2),
        });
    }
    state.stack[state.sp as usize] = state.pc;
    state.sp += 1;
    state.pc = addr;
    Ok(())
}

fn logic(state: &mut State, quirks: &Quirks, x: u8, y: u8, op: fn(u8, u8) -> u8) {
    state.v[x as usize] = op(state.v[x as usize], state.v[y as usize]);
    if quirks.logic_resets_vf {
        state.v[0xF] = 0;
    }
}

/// Stores `flag` in VF and `result(state)` in Vx.
/// By default the flag goes first and the result is computed afterwards, so it sees the new VF.
fn flag_then_result(
    state: &mut State,
    quirks: &Quirks,
    x: u8,
    flag: u8,
    result: impl Fn(&State) -> u8,
) {
    if quirks.flag_written_last {
        state.v[x as usize] = result(state);
        state.v[0xF] = flag;
    } else {
        state.v[0xF] = flag;
        state.v[x as usize] = result(state);
    }
}

/// Vx += Vy; VF = carry
fn add_carry(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let (res, carry) = state.v[x as usize].overflowing_add(state.v[y as usize]);
    flag_then_result(state, quirks, x, u8::from(carry), |_| res);
}

/// Vx -= Vy; VF = Vx > Vy
fn sub(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let flag = u8::from(state.v[x as usize] > state.v[y as usize]);
    flag_then_result(state, quirks, x, flag, |s| {
        s.v[x as usize].wrapping_sub(s.v[y as usize])
    });
}

/// Vx = Vy - Vx; VF = Vy > Vx
fn subn(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let flag = u8::from(state.v[y as usize] > state.v[x as usize]);
    flag_then_result(state, quirks, x, flag, |s| {
        s.v[y as usize].wrapping_sub(s.v[x as usize])
    });
}

fn shift_source(state: &State, quirks: &Quirks, x: u8, y: u8) -> u8 {
    if quirks.shift_uses_vy {
        state.v[y as usize]
    } else {
        state.v[x as usize]
    }
}

/// Vx >>= 1; VF = shifted out bit
fn shr(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let flag = shift_source(state, quirks, x, y) & 0x1;
    flag_then_result(state, quirks, x, flag, |s| {
        shift_source(s, quirks, x, y) >> 1
    });
}

/// Vx <<= 1; VF = shifted out bit
fn shl(state: &mut State, quirks: &Quirks, x: u8, y: u8) {
    let flag = (shift_source(state, quirks, x, y) >> 7) & 0x1;
    flag_then_result(state, quirks, x, flag, |s| {
        shift_source(s, quirks, x, y) << 1
    });
}

/// PC = V0 + addr
fn jumpi(state: &mut State, quirks: &Quirks, addr: u16) {
    let register = if quirks.jump_uses_vx {
        ((addr >> 8) & 0xF) as usize
    } else {
        0x0
    };
    state.pc = addr + u16::from(state.v[register]);
}

fn rand_byte<R: RngCore + ?Sized>(rng: &mut R) -> u8 {
    let mut byte = [0; 1];
    rng.fill_bytes(&mut byte);
    byte[0]
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory I..I+n onto the FrameBuffer at (Vx, Vy) with wrapping.
/// Sets VF if any pixels were erased.
fn draw(state: &mut State, x: u8, y: u8, n: u8) {
    let origin_x = state.v[x as usize] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[y as usize] as usize % DISPLAY_HEIGHT;
    let mut collision = false;

    for row in 0..n as usize {
        let sprite = state.read(state.i.wrapping_add(row as u16));
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            if sprite & (0x80 >> bit) == 0 {
                continue;
            }
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[py][px];
            collision |= *pixel == 1;
            *pixel ^= 1;
        }
    }

    state.v[0xF] = u8::from(collision);
    state.draw_flag = true;
}

/// await keypress for Vx
/// Rewinds the pc so this instruction is fetched again until some key is held.
fn keyd(state: &mut State, x: u8) -> Flow {
    match state.first_pressed() {
        Some(key) => {
            state.v[x as usize] = key;
            Flow::Continue
        }
        None => {
            state.pc = state.pc.wrapping_sub(2);
            Flow::AwaitingKey
        }
    }
}

/// I += Vx
fn addi(state: &mut State, quirks: &Quirks, x: u8) {
    let sum = state.i.wrapping_add(u16::from(state.v[x as usize]));
    state.i = sum;
    if quirks.index_overflow_flag {
        state.v[0xF] = u8::from(sum > 0x0FFF);
    }
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: u8) {
    let value = state.v[x as usize];
    let digits = [value / 100, value / 10 % 10, value % 10];
    for (offset, digit) in digits.iter().enumerate() {
        state.write(state.i.wrapping_add(offset as u16), *digit);
    }
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, quirks: &Quirks, x: u8) {
    for offset in 0..=x {
        state.write(state.i.wrapping_add(u16::from(offset)), state.v[offset as usize]);
    }
    if quirks.load_store_increments_index {
        state.i = state.i.wrapping_add(u16::from(x) + 1);
    }
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, quirks: &Quirks, x: u8) {
    for offset in 0..=x {
        state.v[offset as usize] = state.read(state.i.wrapping_add(u16::from(offset)));
    }
    if quirks.load_store_increments_index {
        state.i = state.i.wrapping_add(u16::from(x) + 1);
    }
}
