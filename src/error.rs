// Decoder Error Handling

use std::io;

use thiserror::Error;

/// Everything that can go wrong while decoding an `.rbi` image.
///
/// None of these are recoverable: the keystream is stateful, so skipping a
/// bad field would turn every following byte into garbage.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Read error or short RBI file at offset {offset}")]
    ShortRead { offset: u64 },

    #[error("Invalid TLV encoded entry: tag {0:#04x}")]
    InvalidTlv(u8),

    #[error("TLV entry is not an integer: tag {0:#04x}")]
    NotAnInteger(u8),

    #[error("TLV entry is not a string: tag {0:#04x}")]
    NotAString(u8),

    #[error("Implausible string length {0} in TLV entry")]
    OversizedAllocation(usize),

    #[error("Found an unknown opcode: {0:02x}")]
    UnknownOpcode(u8),

    #[error("Found an unknown global variable identifier: {0:02x}")]
    UnknownGlobal(u8),

    #[error("Global variable is neither local nor remote: {0:02x}")]
    InvalidAccessQualifier(u8),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
