//! The rolling XOR keystream that obscures instruction banks.
//!
//! The stream is keyed on the program name. The first byte after a reset is
//! always zero; after that each name byte is XORed with the fixed key, and
//! once the name runs out the stream stays at zero until the next reset.

/// Fixed key mixed into the program name.
pub const KEY: [u8; 24] = *b"JkFZFg3gF$%fgfj/()hgdfnh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Freshly reset; the next byte is the leading zero.
    Primed,
    /// Index of the next name byte.
    At(usize),
    /// Past the end of the name.
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct KeyStream {
    name: Vec<u8>,
    cursor: Cursor,
}

impl KeyStream {
    pub fn new(name: impl Into<Vec<u8>>) -> Self {
        KeyStream {
            name: name.into(),
            cursor: Cursor::Primed,
        }
    }

    /// Rewind to the primed state. The name is kept.
    pub fn reset(&mut self) {
        self.cursor = Cursor::Primed;
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == Cursor::Exhausted
    }

    pub fn next_byte(&mut self) -> u8 {
        match self.cursor {
            Cursor::Primed => {
                self.cursor = Cursor::At(0);
                0
            }
            Cursor::At(i) if i < self.name.len() => {
                self.cursor = Cursor::At(i + 1);
                self.name[i] ^ KEY[i % KEY.len()]
            }
            Cursor::At(_) | Cursor::Exhausted => {
                self.cursor = Cursor::Exhausted;
                0
            }
        }
    }
}
