// src/types.rs

//! Small value types shared by the outputs and the batch-file config.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::AdditionsError;

/// How a file-backed output treats content that already exists.
///
/// - `Append`: keep existing content and write after it (default).
/// - `Reset`: truncate before the first write.
///
/// The numeric codes match the historical constants so callers storing
/// modes as integers keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Append,
    Reset,
}

impl WriteMode {
    pub const APPEND_CODE: i32 = 1024;
    pub const RESET_CODE: i32 = 2048;

    pub fn code(self) -> i32 {
        match self {
            WriteMode::Append => Self::APPEND_CODE,
            WriteMode::Reset => Self::RESET_CODE,
        }
    }
}

impl TryFrom<i32> for WriteMode {
    type Error = AdditionsError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            Self::APPEND_CODE => Ok(WriteMode::Append),
            Self::RESET_CODE => Ok(WriteMode::Reset),
            other => Err(AdditionsError::InvalidWriteMode(other.to_string())),
        }
    }
}

impl FromStr for WriteMode {
    type Err = AdditionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(WriteMode::Append),
            "reset" | "truncate" => Ok(WriteMode::Reset),
            other => Err(AdditionsError::InvalidWriteMode(other.to_string())),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Append => f.write_str("append"),
            WriteMode::Reset => f.write_str("reset"),
        }
    }
}

/// Output verbosity levels, ordered from least to most chatty.
///
/// A message is written only when its level is less than or equal to the
/// verbosity of the output it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Quiet = 16,
    #[default]
    Normal = 32,
    Verbose = 64,
    VeryVerbose = 128,
    Debug = 256,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "normal" => Ok(Verbosity::Normal),
            "verbose" | "v" => Ok(Verbosity::Verbose),
            "very_verbose" | "very-verbose" | "vv" => Ok(Verbosity::VeryVerbose),
            "debug" | "vvv" => Ok(Verbosity::Debug),
            other => Err(format!(
                "invalid verbosity: {other} (expected quiet, normal, verbose, very_verbose or debug)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_mode_codes_round_trip() {
        assert_eq!(WriteMode::try_from(1024).unwrap(), WriteMode::Append);
        assert_eq!(WriteMode::try_from(2048).unwrap(), WriteMode::Reset);
        assert_eq!(WriteMode::Reset.code(), 2048);
    }

    #[test]
    fn unknown_write_mode_code_is_rejected() {
        let err = WriteMode::try_from(512).unwrap_err();
        assert!(matches!(err, AdditionsError::InvalidWriteMode(ref code) if code == "512"));
    }

    #[test]
    fn write_mode_parses_from_text() {
        assert_eq!("Append".parse::<WriteMode>().unwrap(), WriteMode::Append);
        assert_eq!(" reset ".parse::<WriteMode>().unwrap(), WriteMode::Reset);
        assert!("overwrite".parse::<WriteMode>().is_err());
    }

    #[test]
    fn verbosity_is_ordered() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Verbose < Verbosity::Debug);
        assert_eq!("vv".parse::<Verbosity>().unwrap(), Verbosity::VeryVerbose);
        assert!("loud".parse::<Verbosity>().is_err());
    }
}
