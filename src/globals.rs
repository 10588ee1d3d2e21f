//! Global variables of the robot runtime.
//!
//! Globals are addressed by a one byte identifier in `GLOBAL_MIN..=GLOBAL_MAX`
//! followed by an access qualifier saying whether the local robot or the
//! robot in front of it is meant.

use std::fmt::{Display, Formatter};

use crate::error::{DecodeError, Result};

pub const GLOBAL_MIN: u8 = 0xe9;
pub const GLOBAL_MAX: u8 = 0xfe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalVar {
    Banks,
    Mobile,
    InstrSet,
    Active,
    Fields,
    Generation,
    Time,
    MyBots,
    OtherBots,
    Pub,
    RandNum,
    InstrPos,
    Tasks,
    Id,
    Timeout,
    MaxLifetime,
    /// Not in the official documentation.
    ElimTrigger,
    /// Unassigned identifier 0xfa.
    Reserved,
    MaxTasks,
    MaxGeneration,
    MaxMyBots,
    Age,
}

/// Indexed by `identifier - GLOBAL_MIN`.
const GLOBAL_TABLE: [GlobalVar; (GLOBAL_MAX - GLOBAL_MIN + 1) as usize] = [
    GlobalVar::Banks,
    GlobalVar::Mobile,
    GlobalVar::InstrSet,
    GlobalVar::Active,
    GlobalVar::Fields,
    GlobalVar::Generation,
    GlobalVar::Time,
    GlobalVar::MyBots,
    GlobalVar::OtherBots,
    GlobalVar::Pub,
    GlobalVar::RandNum,
    GlobalVar::InstrPos,
    GlobalVar::Tasks,
    GlobalVar::Id,
    GlobalVar::Timeout,
    GlobalVar::MaxLifetime,
    GlobalVar::ElimTrigger,
    GlobalVar::Reserved,
    GlobalVar::MaxTasks,
    GlobalVar::MaxGeneration,
    GlobalVar::MaxMyBots,
    GlobalVar::Age,
];

impl GlobalVar {
    pub fn from_identifier(ident: u8) -> Result<Self> {
        if !(GLOBAL_MIN..=GLOBAL_MAX).contains(&ident) {
            return Err(DecodeError::UnknownGlobal(ident));
        }
        Ok(GLOBAL_TABLE[(ident - GLOBAL_MIN) as usize])
    }

    pub fn identifier(&self) -> u8 {
        GLOBAL_MIN + *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            GlobalVar::Banks => "Banks",
            GlobalVar::Mobile => "Mobile",
            GlobalVar::InstrSet => "InstrSet",
            GlobalVar::Active => "Active",
            GlobalVar::Fields => "Fields",
            GlobalVar::Generation => "Generation",
            GlobalVar::Time => "Time",
            GlobalVar::MyBots => "MyBots",
            GlobalVar::OtherBots => "OtherBots",
            GlobalVar::Pub => "Pub",
            GlobalVar::RandNum => "RandNum",
            GlobalVar::InstrPos => "InstrPos",
            GlobalVar::Tasks => "Tasks",
            GlobalVar::Id => "Id",
            GlobalVar::Timeout => "Timeout",
            GlobalVar::MaxLifetime => "MaxLifetime",
            GlobalVar::ElimTrigger => "ElimTrigger",
            GlobalVar::Reserved => "RESERVED",
            GlobalVar::MaxTasks => "MaxTasks",
            GlobalVar::MaxGeneration => "MaxGeneration",
            GlobalVar::MaxMyBots => "MaxMyBots",
            GlobalVar::Age => "Age",
        }
    }

    /// Only `Active` and `Pub` may be assigned by a robot program.
    pub fn is_writeable(&self) -> bool {
        matches!(self, GlobalVar::Active | GlobalVar::Pub)
    }
}

/// Which robot a global reference applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Local,
    Remote,
}

impl Access {
    pub const LOCAL: u8 = 0x03;
    pub const REMOTE: u8 = 0x83;

    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            Access::LOCAL => Ok(Access::Local),
            Access::REMOTE => Ok(Access::Remote),
            other => Err(DecodeError::InvalidAccessQualifier(other)),
        }
    }
}

/// A qualified global reference as it appears in an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalRef {
    pub var: GlobalVar,
    pub access: Access,
}

impl GlobalRef {
    /// `%` for remote, `#` for local writeable, `$` for local read-only.
    pub fn sigil(&self) -> char {
        match self.access {
            Access::Remote => '%',
            Access::Local if self.var.is_writeable() => '#',
            Access::Local => '$',
        }
    }
}

impl Display for GlobalRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.sigil(), self.var.name())
    }
}
