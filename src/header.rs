use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;
use std::io::Read;

use log::debug;

use crate::error::Result;
use crate::tlv::TlvReader;

/// The TLV header in front of the instruction banks.
///
/// Strings are kept as raw bytes; the format does not promise any encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramHeader {
    /// Name as stored in the file. This is what the listing shows.
    pub declared_name: Vec<u8>,
    /// Name that keys the banks, with the bank digit applied.
    pub name: Vec<u8>,
    pub author: Vec<u8>,
    pub country: Vec<u8>,
    pub bank_count: u32,
}

impl ProgramHeader {
    /// Parse name, author, country and bank count, then apply the name quirk.
    pub fn parse<R: Read>(reader: &mut TlvReader<R>) -> Result<ProgramHeader> {
        let name = reader.read_string()?;
        let author = reader.read_string()?;
        let country = reader.read_string()?;
        let bank_count = reader.read_int()?;

        let mut header = ProgramHeader {
            declared_name: name.clone(),
            name,
            author,
            country,
            bank_count,
        };
        header.append_bank_digit();

        debug!(
            "header: name={:?} author={:?} country={:?} banks={}",
            header.name_lossy(),
            header.author_lossy(),
            header.country_lossy(),
            header.bank_count
        );
        Ok(header)
    }

    /// Programs with ten or more banks have the tens digit of the bank count
    /// glued to their name, and it is that name which keys the banks.
    fn append_bank_digit(&mut self) {
        if self.bank_count >= 10 {
            self.name.push(b'0' + (self.bank_count / 10 % 10) as u8);
        }
    }

    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    pub fn author_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.author)
    }

    pub fn country_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.country)
    }
}

impl Display for ProgramHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        writeln!(f, "Name:\t\t{}", String::from_utf8_lossy(&self.declared_name))?;
        writeln!(f, "Author:\t\t{}", self.author_lossy())?;
        writeln!(f, "Country:\t{}", self.country_lossy())?;
        writeln!(f, "Number of Banks: {}", self.bank_count)
    }
}
