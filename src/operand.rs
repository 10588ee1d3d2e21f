use std::fmt::{Display, Formatter};
use std::io::Read;

use log::trace;

use crate::error::Result;
use crate::globals::{Access, GlobalRef, GlobalVar};
use crate::tlv::CodeStream;

/// Largest byte that is still a literal; anything above names a global.
pub const LITERAL_MAX: u8 = 0x7f;

/// A decoded operand. Every kind occupies one two-byte operand word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Small constant or address, `#n`.
    Literal(u8),
    /// Global variable reference.
    Global(GlobalRef),
    /// Inline constant word.
    Word(i16),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "#{}", n),
            Operand::Global(global) => write!(f, "{}", global),
            Operand::Word(w) => write!(f, "{}", w),
        }
    }
}

/// Decode one operand word. `inline` is the operand's addressing-mode bit.
pub fn decode_operand<R: Read>(stream: &mut CodeStream<'_, R>, inline: bool) -> Result<Operand> {
    if inline {
        return Ok(Operand::Word(stream.read_word()? as i16));
    }

    let byte = stream.read_byte()?;
    if byte > LITERAL_MAX {
        return decode_global(stream, byte).map(Operand::Global);
    }

    // second byte of a literal word is padding
    let _ = stream.read_byte()?;
    Ok(Operand::Literal(byte))
}

/// Finish a global reference whose identifier byte has already been read.
pub fn decode_global<R: Read>(stream: &mut CodeStream<'_, R>, ident: u8) -> Result<GlobalRef> {
    let qualifier = stream.read_byte()?;
    let var = GlobalVar::from_identifier(ident)?;
    let access = Access::from_byte(qualifier)?;
    trace!("global {:02x} qualifier {:02x} -> {}", ident, qualifier, var.name());
    Ok(GlobalRef { var, access })
}
