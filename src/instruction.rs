use std::fmt::{Display, Error, Formatter};
use std::io::Read;

use log::trace;

use crate::error::Result;
use crate::opcode_tables::Opcode;
use crate::operand::{decode_operand, Operand};
use crate::tlv::CodeStream;

/// Bytes per instruction slot: opcode, addressing mode and three operand words.
pub const SLOT_SIZE: usize = 8;
/// Operand words reserved in every slot, whatever the opcode's arity.
pub const OPERAND_WORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    Disassemble,
    HexDump,
}

/// A decoded RoboCom instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    /// Bit `i` set means operand `i` is an inline word.
    pub addressing: u8,
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Decode one slot. Consumes all `SLOT_SIZE` bytes, including the operand
    /// words the opcode does not use, so the keystream stays in step.
    pub fn decode<R: Read>(stream: &mut CodeStream<'_, R>) -> Result<Self> {
        let opcode = Opcode::from_byte(stream.read_byte()?)?;
        let addressing = stream.read_byte()?;

        let count = opcode.operand_count();
        let mut operands = Vec::with_capacity(count);
        for i in 0..count {
            let inline = addressing & (1 << i) != 0;
            operands.push(decode_operand(stream, inline)?);
        }

        for _ in count..OPERAND_WORDS {
            stream.read_word()?;
        }

        trace!(
            "{} addressing {:03b} with {} operand(s)",
            opcode.mnemonic(),
            addressing & 0x07,
            count
        );

        Ok(Instruction {
            opcode,
            addressing,
            operands,
        })
    }

    pub fn mnemonic(&self) -> &'static str {
        self.opcode.mnemonic()
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "{}\t\t", self.mnemonic())?;
        for (i, op) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

/// One instruction slot of a bank, decoded according to the `DecodeMode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Instruction(Instruction),
    Raw([u8; SLOT_SIZE]),
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        match self {
            Slot::Instruction(instruction) => write!(f, "{}", instruction),
            Slot::Raw(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

pub fn decode_instruction<R: Read>(stream: &mut CodeStream<'_, R>, mode: DecodeMode) -> Result<Slot> {
    let start = stream.offset();
    let slot = match mode {
        DecodeMode::Disassemble => Slot::Instruction(Instruction::decode(stream)?),
        DecodeMode::HexDump => {
            let mut bytes = [0u8; SLOT_SIZE];
            for b in bytes.iter_mut() {
                *b = stream.read_byte()?;
            }
            Slot::Raw(bytes)
        }
    };
    debug_assert_eq!(stream.offset() - start, SLOT_SIZE as u64);
    Ok(slot)
}
