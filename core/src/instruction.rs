use std::fmt;

use crate::error::Chip8Error;
use crate::opcode::Opcode;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices (0x0..=0xF), `kk` and `n` are immediates and `addr` is a
/// 12-bit address. Every Opcode either decodes into exactly one of these or is unknown.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: call a native routine on the original hardware; ignored
    Sys { addr: u16 },
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SeByte { x: u8, kk: u8 },
    /// 4xkk
    SneByte { x: u8, kk: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xkk
    LdByte { x: u8, kk: u8 },
    /// 7xkk
    AddByte { x: u8, kk: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8, y: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8, y: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI { addr: u16 },
    /// Bnnn
    JpV0 { addr: u16 },
    /// Cxkk
    Rnd { x: u8, kk: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp { x: u8 },
    /// ExA1
    Sknp { x: u8 },
    /// Fx07
    LdVxDt { x: u8 },
    /// Fx0A
    LdVxK { x: u8 },
    /// Fx15
    LdDtVx { x: u8 },
    /// Fx18
    LdStVx { x: u8 },
    /// Fx1E
    AddI { x: u8 },
    /// Fx29
    LdF { x: u8 },
    /// Fx33
    LdB { x: u8 },
    /// Fx55
    LdIVx { x: u8 },
    /// Fx65
    LdVxI { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode
    pub fn decode(op: Opcode) -> Result<Self, Chip8Error> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jp { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SeByte { x, kk },
            (0x4, ..) => SneByte { x, kk },
            (0x5, .., 0x0) => SeReg { x, y },
            (0x6, ..) => LdByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => LdReg { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x, y },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x, y },
            (0x9, .., 0x0) => SneReg { x, y },
            (0xA, ..) => LdI { addr },
            (0xB, ..) => JpV0 { addr },
            (0xC, ..) => Rnd { x, kk },
            (0xD, ..) => Drw { x, y, n },
            (0xE, _, 0x9, 0xE) => Skp { x },
            (0xE, _, 0xA, 0x1) => Sknp { x },
            (0xF, _, 0x0, 0x7) => LdVxDt { x },
            (0xF, _, 0x0, 0xA) => LdVxK { x },
            (0xF, _, 0x1, 0x5) => LdDtVx { x },
            (0xF, _, 0x1, 0x8) => LdStVx { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => LdF { x },
            (0xF, _, 0x3, 0x3) => LdB { x },
            (0xF, _, 0x5, 0x5) => LdIVx { x },
            (0xF, _, 0x6, 0x5) => LdVxI { x },
            _ => return Err(Chip8Error::UnknownOpcode { opcode: op }),
        };
        Ok(instruction)
    }
}

impl TryFrom<Opcode> for Instruction {
    type Error = Chip8Error;

    fn try_from(op: Opcode) -> Result<Self, Self::Error> {
        Instruction::decode(op)
    }
}

/// Conventional assembler mnemonics, used when tracing execution
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SeByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SneByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LdByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            LdReg { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:#05X}", addr),
            JpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rnd { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdVxDt { x } => write!(f, "LD V{:X}, DT", x),
            LdVxK { x } => write!(f, "LD V{:X}, K", x),
            LdDtVx { x } => write!(f, "LD DT, V{:X}", x),
            LdStVx { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LdF { x } => write!(f, "LD F, V{:X}", x),
            LdB { x } => write!(f, "LD B, V{:X}", x),
            LdIVx { x } => write!(f, "LD [I], V{:X}", x),
            LdVxI { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    fn decode(raw: u16) -> Result<Instruction, Chip8Error> {
        Instruction::decode(Opcode(raw))
    }

    #[test]
    fn test_decodes_system_instructions() {
        assert_eq!(decode(0x00E0), Ok(Cls));
        assert_eq!(decode(0x00EE), Ok(Ret));
        assert_eq!(decode(0x0000), Ok(Sys { addr: 0x000 }));
        assert_eq!(decode(0x0123), Ok(Sys { addr: 0x123 }));
        assert_eq!(decode(0x01E0), Ok(Sys { addr: 0x1E0 }));
        assert_eq!(decode(0x0FEE), Ok(Sys { addr: 0xFEE }));
    }

    #[test]
    fn test_decodes_flow_control() {
        assert_eq!(decode(0x1ABC), Ok(Jp { addr: 0xABC }));
        assert_eq!(decode(0x2123), Ok(Call { addr: 0x123 }));
        assert_eq!(decode(0xBABC), Ok(JpV0 { addr: 0xABC }));
    }

    #[test]
    fn test_decodes_skips() {
        assert_eq!(decode(0x3122), Ok(SeByte { x: 0x1, kk: 0x22 }));
        assert_eq!(decode(0x4122), Ok(SneByte { x: 0x1, kk: 0x22 }));
        assert_eq!(decode(0x5120), Ok(SeReg { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x9120), Ok(SneReg { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0xE39E), Ok(Skp { x: 0x3 }));
        assert_eq!(decode(0xE3A1), Ok(Sknp { x: 0x3 }));
    }

    #[test]
    fn test_decodes_alu() {
        assert_eq!(decode(0x8120), Ok(LdReg { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8121), Ok(Or { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8122), Ok(And { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8123), Ok(Xor { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8124), Ok(AddReg { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8125), Ok(Sub { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8126), Ok(Shr { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x8127), Ok(Subn { x: 0x1, y: 0x2 }));
        assert_eq!(decode(0x812E), Ok(Shl { x: 0x1, y: 0x2 }));
    }

    #[test]
    fn test_decodes_f_family() {
        assert_eq!(decode(0xF407), Ok(LdVxDt { x: 0x4 }));
        assert_eq!(decode(0xF40A), Ok(LdVxK { x: 0x4 }));
        assert_eq!(decode(0xF415), Ok(LdDtVx { x: 0x4 }));
        assert_eq!(decode(0xF418), Ok(LdStVx { x: 0x4 }));
        assert_eq!(decode(0xF41E), Ok(AddI { x: 0x4 }));
        assert_eq!(decode(0xF429), Ok(LdF { x: 0x4 }));
        assert_eq!(decode(0xF433), Ok(LdB { x: 0x4 }));
        assert_eq!(decode(0xF455), Ok(LdIVx { x: 0x4 }));
        assert_eq!(decode(0xF465), Ok(LdVxI { x: 0x4 }));
    }

    #[test]
    fn test_decodes_operands() {
        assert_eq!(decode(0xD125), Ok(Drw { x: 0x1, y: 0x2, n: 0x5 }));
        assert_eq!(decode(0xC3F0), Ok(Rnd { x: 0x3, kk: 0xF0 }));
        assert_eq!(decode(0xA123), Ok(LdI { addr: 0x123 }));
    }

    #[test]
    fn test_rejects_unknown_opcodes() {
        for raw in [0x5121, 0x812F, 0x8128, 0x912A, 0xE000, 0xE19F, 0xF000, 0xF1FF] {
            assert_eq!(
                decode(raw),
                Err(Chip8Error::UnknownOpcode {
                    opcode: Opcode(raw)
                }),
                "{:#06X}",
                raw
            );
        }
    }

    #[test]
    fn test_every_opcode_decodes_or_is_unknown() {
        let known = (0..=u16::MAX)
            .filter(|raw| Instruction::try_from(Opcode(*raw)).is_ok())
            .count();
        // 0nnn 1nnn 2nnn 3xkk 4xkk 6xkk 7xkk Annn Bnnn Cxkk Dxyn are fully populated
        // 5xy0 9xy0 take 256 each; 8xy_ takes 9 * 256; Ex__ takes 2 * 16; Fx__ takes 9 * 16
        let expected = 11 * 4096 + 2 * 256 + 9 * 256 + 2 * 16 + 9 * 16;
        assert_eq!(known, expected);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Drw { x: 0x0, y: 0x1, n: 5 }.to_string(), "DRW V0, V1, 5");
        assert_eq!(LdI { addr: 0x123 }.to_string(), "LD I, 0x123");
        assert_eq!(LdByte { x: 0xA, kk: 0x05 }.to_string(), "LD VA, 0x05");
        assert_eq!(LdIVx { x: 0xF }.to_string(), "LD [I], VF");
    }
}
