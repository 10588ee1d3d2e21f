//! Type/length/value primitives of the `.rbi` container.
//!
//! Header fields are TLV encoded: a tag byte selects the field kind and the
//! width of what follows. Integers carry `tag - 1` little-endian value bytes
//! (tags 2 to 5). Strings carry a `tag - 5` byte little-endian length prefix
//! (tags 6 to 9) and then the string bytes. Nothing read through the TLV
//! functions is keystream coded; only instruction banks are.

use std::io::{ErrorKind, Read};

use log::trace;

use crate::error::{DecodeError, Result};
use crate::keystream::KeyStream;

pub const TLV_INT: u8 = 1;
pub const TLV_STRING: u8 = 5;
pub const TLV_MAX: u8 = TLV_STRING + 4;

/// Upper bound for a string allocation, terminator slack included.
pub const MAX_ALLOCATION: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvTag {
    /// Value is `width` bytes long.
    Integer { width: u8 },
    /// Length prefix is `width` bytes long.
    String { width: u8 },
    Invalid,
}

impl TlvTag {
    pub fn classify(tag: u8) -> Self {
        match tag {
            t if t > TLV_INT && t <= TLV_STRING => TlvTag::Integer { width: t - TLV_INT },
            t if t > TLV_STRING && t <= TLV_MAX => TlvTag::String { width: t - TLV_STRING },
            _ => TlvTag::Invalid,
        }
    }

    /// The tag byte this classification came from. `Invalid` has no single
    /// byte and reports zero.
    pub fn byte(self) -> u8 {
        match self {
            TlvTag::Integer { width } => TLV_INT + width,
            TlvTag::String { width } => TLV_STRING + width,
            TlvTag::Invalid => 0,
        }
    }
}

pub struct TlvReader<R> {
    source: R,
    offset: u64,
}

impl<R: Read> TlvReader<R> {
    pub fn new(source: R) -> Self {
        TlvReader { source, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian word, running both bytes through the keystream
    /// when `decode` is set.
    pub fn read_word(&mut self, keystream: &mut KeyStream, decode: bool) -> Result<u16> {
        let mut word = 0u16;
        for shift in [0, 8] {
            let mut byte = self.read_byte()?;
            if decode {
                byte ^= keystream.next_byte();
            }
            word |= (byte as u16) << shift;
        }
        Ok(word)
    }

    pub fn read_tag(&mut self) -> Result<TlvTag> {
        let tag = self.read_byte()?;
        match TlvTag::classify(tag) {
            TlvTag::Invalid => Err(DecodeError::InvalidTlv(tag)),
            valid => Ok(valid),
        }
    }

    pub fn read_int(&mut self) -> Result<u32> {
        match self.read_tag()? {
            TlvTag::Integer { width } => self.read_le(width),
            tag => Err(DecodeError::NotAnInteger(tag.byte())),
        }
    }

    /// Read a length-prefixed string. A zero length yields an empty string.
    pub fn read_string(&mut self) -> Result<Vec<u8>> {
        let width = match self.read_tag()? {
            TlvTag::String { width } => width,
            tag => return Err(DecodeError::NotAString(tag.byte())),
        };

        let length = self.read_le(width)? as usize;
        if length.saturating_add(2) > MAX_ALLOCATION {
            return Err(DecodeError::OversizedAllocation(length));
        }

        let mut value = vec![0u8; length];
        self.fill(&mut value)?;
        trace!("TLV string of {} bytes ending at offset {}", length, self.offset);
        Ok(value)
    }

    fn read_le(&mut self, width: u8) -> Result<u32> {
        let mut value = 0u32;
        for i in 0..width as u32 {
            value |= (self.read_byte()? as u32) << (i * 8);
        }
        Ok(value)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.source.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(DecodeError::ShortRead { offset: self.offset })
            }
            Err(e) => Err(DecodeError::Io(e)),
        }
    }
}

/// The instruction-bank view of a reader: every byte goes through the
/// keystream when `decode` is set.
pub struct CodeStream<'a, R> {
    reader: &'a mut TlvReader<R>,
    keystream: &'a mut KeyStream,
    decode: bool,
}

impl<'a, R: Read> CodeStream<'a, R> {
    pub fn new(reader: &'a mut TlvReader<R>, keystream: &'a mut KeyStream, decode: bool) -> Self {
        CodeStream {
            reader,
            keystream,
            decode,
        }
    }

    pub fn offset(&self) -> u64 {
        self.reader.offset()
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = self.reader.read_byte()?;
        if self.decode {
            Ok(byte ^ self.keystream.next_byte())
        } else {
            Ok(byte)
        }
    }

    pub fn read_word(&mut self) -> Result<u16> {
        self.reader.read_word(self.keystream, self.decode)
    }
}
