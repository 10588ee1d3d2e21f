//! Decoder and disassembler for RoboCom `.rbi` robot programs.
//!
//! An `.rbi` file is a TLV header (name, author, country, bank count)
//! followed by banks of fixed eight byte instruction slots. Each bank is
//! XOR coded with a keystream derived from the robot's name.

pub mod config;
pub mod disassembler;
pub mod error;
pub mod globals;
pub mod header;
pub mod instruction;
pub mod keystream;
pub mod opcode_tables;
pub mod operand;
pub mod tlv;

pub use config::DecodeOptions;
pub use disassembler::{Bank, Disassembler, Program};
pub use error::DecodeError;
pub use header::ProgramHeader;
pub use instruction::{DecodeMode, Instruction, Slot};
pub use keystream::KeyStream;
