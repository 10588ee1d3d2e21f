use crate::error::{DecodeError, Result};

pub const OPCODE_MIN: u8 = 0x02;
pub const OPCODE_MAX: u8 = 0x20;

/// RoboCom opcodes. `Seize` and everything after `Scan` belong to the
/// extended instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Die,
    Trans,
    Move,
    Turn,
    Jump,
    Set,
    Add,
    Sub,
    BJump,
    Comp,
    Create,
    Scan,

    NComp,
    LComp,
    GComp,
    Random,
    Min,
    Max,
    RTrans,
    AJump,
    Sleep,
    Init,
    Seize,
    Resume,
    Break,
    Quit,
    Mul,
    Div,
    Mod,
    Farscan,
}

/// One entry of the opcode table. Unassigned opcode bytes are `Reserved`
/// and never decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeSlot {
    Reserved,
    Defined(Opcode),
}

use Opcode::*;
use OpcodeSlot::{Defined, Reserved};

/// Indexed by opcode byte.
const OPCODE_TABLE: [OpcodeSlot; OPCODE_MAX as usize + 1] = [
    Reserved,
    Reserved,
    Defined(Die),
    Defined(Trans),
    Defined(Move),
    Defined(Turn),
    Defined(Jump),
    Defined(Set),
    Defined(Add),
    Defined(Sub),
    Defined(BJump),
    Reserved,
    Defined(Comp),
    Defined(Create),
    Defined(Scan),
    Defined(NComp),
    Defined(LComp),
    Defined(GComp),
    Defined(Random),
    Defined(Min),
    Defined(Max),
    Defined(RTrans),
    Defined(AJump),
    Defined(Sleep),
    Defined(Init),
    Defined(Seize),
    Defined(Resume),
    Defined(Break),
    Defined(Quit),
    Defined(Mul),
    Defined(Div),
    Defined(Mod),
    Defined(Farscan),
];

/// Look up the table slot for an opcode byte, if the byte is inside the table.
pub fn opcode_slot(byte: u8) -> Option<OpcodeSlot> {
    OPCODE_TABLE.get(byte as usize).copied()
}

impl Opcode {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match opcode_slot(byte) {
            Some(Defined(op)) if byte >= OPCODE_MIN => Ok(op),
            _ => Err(DecodeError::UnknownOpcode(byte)),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Die => 0x02,
            Trans => 0x03,
            Move => 0x04,
            Turn => 0x05,
            Jump => 0x06,
            Set => 0x07,
            Add => 0x08,
            Sub => 0x09,
            BJump => 0x0a,
            Comp => 0x0c,
            Create => 0x0d,
            Scan => 0x0e,
            NComp => 0x0f,
            LComp => 0x10,
            GComp => 0x11,
            Random => 0x12,
            Min => 0x13,
            Max => 0x14,
            RTrans => 0x15,
            AJump => 0x16,
            Sleep => 0x17,
            Init => 0x18,
            Seize => 0x19,
            Resume => 0x1a,
            Break => 0x1b,
            Quit => 0x1c,
            Mul => 0x1d,
            Div => 0x1e,
            Mod => 0x1f,
            Farscan => 0x20,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Die => "Die",
            Trans => "Trans",
            Move => "Move",
            Turn => "Turn",
            Jump => "Jump",
            Set => "Set",
            Add => "Add",
            Sub => "Sub",
            BJump => "BJump",
            Comp => "Comp",
            Create => "Create",
            Scan => "Scan",
            NComp => "NComp",
            LComp => "LComp",
            GComp => "GComp",
            Random => "Random",
            Min => "Min",
            Max => "Max",
            RTrans => "RTrans",
            AJump => "AJump",
            Sleep => "Sleep",
            Init => "Init",
            Seize => "Seize",
            Resume => "Resume",
            Break => "Break",
            Quit => "Quit",
            Mul => "Mul",
            Div => "Div",
            Mod => "Mod",
            Farscan => "Farscan",
        }
    }

    /// Declared number of operands (0-3).
    pub fn operand_count(&self) -> usize {
        match self {
            Die | Move | Seize | Resume | Break | Quit => 0,
            Turn | Jump | Scan | AJump | Sleep => 1,
            Trans | Set | Add | Sub | BJump | Comp | NComp | LComp | GComp | Min | Max
            | RTrans | Init | Mul | Div | Mod => 2,
            Create | Random | Farscan => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_codes() {
        for byte in OPCODE_MIN..=OPCODE_MAX {
            if let Ok(op) = Opcode::from_byte(byte) {
                assert_eq!(op.code(), byte, "{} sits in the wrong slot", op.mnemonic());
            }
        }
    }

    #[test]
    fn test_reserved_and_out_of_range() {
        for byte in [0x00, 0x01, 0x0b, 0x21, 0x7f, 0xff] {
            assert!(
                matches!(Opcode::from_byte(byte), Err(DecodeError::UnknownOpcode(b)) if b == byte),
                "{:02x} should not decode",
                byte
            );
        }
        assert_eq!(opcode_slot(0x0b), Some(OpcodeSlot::Reserved));
        assert_eq!(opcode_slot(0x21), None);
    }

    #[test]
    fn test_operand_counts() {
        assert_eq!(Opcode::from_byte(0x02).unwrap().operand_count(), 0);
        assert_eq!(Opcode::from_byte(0x05).unwrap().operand_count(), 1);
        assert_eq!(Opcode::from_byte(0x07).unwrap().operand_count(), 2);
        assert_eq!(Opcode::from_byte(0x0d).unwrap().operand_count(), 3);
        assert_eq!(Opcode::from_byte(0x20).unwrap().mnemonic(), "Farscan");
    }

    #[test]
    fn test_defined_count() {
        let defined = (0..=OPCODE_MAX)
            .filter(|&b| Opcode::from_byte(b).is_ok())
            .count();
        assert_eq!(defined, 30);
    }
}
