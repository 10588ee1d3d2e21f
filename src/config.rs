//! Decode options, optionally loaded from a TOML file.
//!
//! ```toml
//! decode = true
//! hex_dump = false
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::instruction::DecodeMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Run hex dumped banks through the keystream. Disassembly always decodes
    /// and header fields are never coded.
    pub decode: bool,
    /// Dump raw slot bytes instead of disassembling.
    pub hex_dump: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            decode: true,
            hex_dump: false,
        }
    }
}

impl DecodeOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn mode(&self) -> DecodeMode {
        if self.hex_dump {
            DecodeMode::HexDump
        } else {
            DecodeMode::Disassemble
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DecodeOptions::default();
        assert!(options.decode);
        assert!(!options.hex_dump);
        assert_eq!(options.mode(), DecodeMode::Disassemble);
        assert_eq!(DecodeOptions::from_toml_str("").unwrap(), options);
    }

    #[test]
    fn test_partial_toml() {
        let options = DecodeOptions::from_toml_str("hex_dump = true\n").unwrap();
        assert!(options.decode);
        assert_eq!(options.mode(), DecodeMode::HexDump);

        let options = DecodeOptions::from_toml_str("decode = false").unwrap();
        assert!(!options.decode);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            DecodeOptions::from_toml_str("verbose = true"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DecodeOptions::from_toml_str("decode = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DecodeOptions::load("/nonexistent/rbi2rob.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
