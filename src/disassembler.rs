//! Program decoder: header, then each bank under a freshly reset keystream.
//!
//! The decode is all or nothing. A bad byte anywhere aborts the whole run,
//! since the format has no point at which the keystream could be picked up
//! again.

use std::fmt::{Display, Error, Formatter};
use std::io::Read;

use log::{debug, info};

use crate::config::DecodeOptions;
use crate::error::Result;
use crate::header::ProgramHeader;
use crate::instruction::{decode_instruction, DecodeMode, Slot};
use crate::keystream::KeyStream;
use crate::tlv::{CodeStream, TlvReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    /// 1-based, as listed.
    pub number: u32,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub header: ProgramHeader,
    pub mode: DecodeMode,
    pub banks: Vec<Bank>,
}

impl Program {
    pub fn from_bytes(bytes: &[u8], options: DecodeOptions) -> Result<Program> {
        Disassembler::new(bytes, options).run()
    }

    pub fn instruction_count(&self) -> usize {
        self.banks.iter().map(|bank| bank.slots.len()).sum()
    }
}

pub struct Disassembler<R> {
    reader: TlvReader<R>,
    options: DecodeOptions,
}

impl<R: Read> Disassembler<R> {
    pub fn new(source: R, options: DecodeOptions) -> Self {
        Disassembler {
            reader: TlvReader::new(source),
            options,
        }
    }

    pub fn run(mut self) -> Result<Program> {
        let header = ProgramHeader::parse(&mut self.reader)?;
        let mode = self.options.mode();
        let mut keystream = KeyStream::new(header.name.clone());

        let mut banks = Vec::new();
        for number in 1..=header.bank_count {
            banks.push(self.decode_bank(number, &mut keystream, mode)?);
        }

        info!(
            "decoded {} bank(s) from {} bytes",
            banks.len(),
            self.reader.offset()
        );

        Ok(Program {
            header,
            mode,
            banks,
        })
    }

    fn decode_bank(&mut self, number: u32, keystream: &mut KeyStream, mode: DecodeMode) -> Result<Bank> {
        // The count is plain TLV and precedes the reset.
        let count = self.reader.read_int()?;
        keystream.reset();
        debug!(
            "bank {}: {} instruction(s) at offset {}",
            number,
            count,
            self.reader.offset()
        );

        // Only the hex dump may show coded bytes; disassembly always decodes.
        let decode = self.options.decode || mode == DecodeMode::Disassemble;
        let mut stream = CodeStream::new(&mut self.reader, keystream, decode);
        let mut slots = Vec::new();
        for _ in 0..count {
            slots.push(decode_instruction(&mut stream, mode)?);
        }

        Ok(Bank { number, slots })
    }
}

impl Bank {
    fn write_listing(&self, f: &mut Formatter<'_>, mode: DecodeMode) -> std::result::Result<(), Error> {
        match mode {
            DecodeMode::HexDump => {
                writeln!(f, "Bank #{:2}; Number of instructions: {}", self.number, self.slots.len())?;
                writeln!(f, "-----------------------------------")?;
                for (i, slot) in self.slots.iter().enumerate() {
                    writeln!(f, "#{:03}: {}", i + 1, slot)?;
                }
            }
            DecodeMode::Disassemble => {
                writeln!(f, "Bank {}\n", self.number)?;
                for slot in self.slots.iter() {
                    writeln!(f, "{}", slot)?;
                }
            }
        }
        write!(f, "\n\n")
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        writeln!(f, "{}", self.header)?;
        for bank in self.banks.iter() {
            bank.write_listing(f, self.mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    fn image(name: &str, banks: &[&[[u8; 8]]]) -> Vec<u8> {
        let mut bytes = vec![0x06, name.len() as u8];
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(&[0x06, 0x01, b'C', 0x06, 0x01, b'D', 0x02, banks.len() as u8]);

        let mut mutated = name.as_bytes().to_vec();
        if banks.len() >= 10 {
            mutated.push(b'0' + (banks.len() / 10 % 10) as u8);
        }
        let mut ks = KeyStream::new(mutated);
        for bank in banks {
            bytes.extend_from_slice(&[0x02, bank.len() as u8]);
            ks.reset();
            for slot in bank.iter() {
                bytes.extend(slot.iter().map(|b| b ^ ks.next_byte()));
            }
        }
        bytes
    }

    #[test]
    fn test_keystream_resets_per_bank() {
        let jump = [0x06, 0x01, 0xfb, 0xff, 0, 0, 0, 0];
        let die = [0x02, 0, 0, 0, 0, 0, 0, 0];
        let bytes = image("Hunter Killer", &[&[jump, die], &[jump]]);

        let program = Program::from_bytes(&bytes, DecodeOptions::default()).unwrap();
        assert_eq!(program.banks.len(), 2);
        assert_eq!(program.instruction_count(), 3);
        assert_eq!(program.banks[0].slots[0].to_string(), "Jump\t\t-5");
        assert_eq!(program.banks[0].slots[1].to_string(), "Die\t\t");
        assert_eq!(program.banks[1].slots[0].to_string(), "Jump\t\t-5");
    }

    #[test]
    fn test_listing() {
        let bytes = image("AB", &[&[[0x04, 0, 0, 0, 0, 0, 0, 0]], &[]]);
        let program = Program::from_bytes(&bytes, DecodeOptions::default()).unwrap();
        assert_eq!(
            program.to_string(),
            "Name:\t\tAB\nAuthor:\t\tC\nCountry:\tD\nNumber of Banks: 2\n\n\
             Bank 1\n\nMove\t\t\n\n\n\
             Bank 2\n\n\n\n"
        );
    }

    #[test]
    fn test_hex_listing() {
        let bytes = image("AB", &[&[[0x0b, 1, 2, 3, 4, 5, 6, 7]], &[]]);
        let options = DecodeOptions { decode: true, hex_dump: true };
        let program = Program::from_bytes(&bytes, options).unwrap();
        assert_eq!(
            program.to_string(),
            "Name:\t\tAB\nAuthor:\t\tC\nCountry:\tD\nNumber of Banks: 2\n\n\
             Bank # 1; Number of instructions: 1\n\
             -----------------------------------\n\
             #001: 0b 01 02 03 04 05 06 07\n\n\n\
             Bank # 2; Number of instructions: 0\n\
             -----------------------------------\n\n\n"
        );
    }

    #[test]
    fn test_decode_off_shows_coded_bytes() {
        let bytes = image("AB", &[&[[0x02, 0, 0, 0, 0, 0, 0, 0]]]);
        let options = DecodeOptions { decode: false, hex_dump: true };
        let program = Program::from_bytes(&bytes, options).unwrap();
        let coded = &bytes[bytes.len() - 8..];
        match &program.banks[0].slots[0] {
            Slot::Raw(raw) => assert_eq!(&raw[..], coded),
            other => panic!("expected raw slot, got {:?}", other),
        }
    }

    #[test]
    fn test_disassembly_ignores_decode_flag() {
        // Set #3, #4
        let bytes = image("AB", &[&[[0x07, 0x00, 0x03, 0x00, 0x04, 0x00, 0, 0]]]);
        let decoded = Program::from_bytes(&bytes, DecodeOptions::default()).unwrap();
        let options = DecodeOptions { decode: false, hex_dump: false };
        let undecoded = Program::from_bytes(&bytes, options).unwrap();

        assert_eq!(undecoded.banks[0].slots[0].to_string(), "Set\t\t#3, #4");
        assert_eq!(undecoded.to_string(), decoded.to_string());
    }

    #[test]
    fn test_errors_abort_whole_decode() {
        let good = [0x02, 0, 0, 0, 0, 0, 0, 0];
        let bad = [0x0b, 0, 0, 0, 0, 0, 0, 0];
        let bytes = image("AB", &[&[good], &[good, bad]]);
        let result = Program::from_bytes(&bytes, DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::UnknownOpcode(0x0b))));

        let mut bytes = image("AB", &[&[good]]);
        bytes.pop();
        let result = Program::from_bytes(&bytes, DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::ShortRead { .. })));
    }
}
