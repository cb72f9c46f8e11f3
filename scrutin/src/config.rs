use crate::*;
use std::env::var;
use std::str::FromStr;

/// How the chaincode treats references to polls and vote options that do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Registering an option for a missing poll, or voting for a missing option,
    /// succeeds without attaching or counting anything. Undecodable content at a
    /// key being created is overwritten.
    Permissive,

    /// Those same calls fail with `NotFound` / `AlreadyExists` instead.
    Strict,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Permissive
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Mode::Permissive),
            "strict" => Ok(Mode::Strict),
            other => Err(Error::InvalidArgument(format!(
                "unknown mode {:?}, expecting strict or permissive",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub mode: Mode,
}

impl Config {
    pub fn strict() -> Self {
        Config { mode: Mode::Strict }
    }

    /// Build a config from `SCRUTIN_MODE`, defaulting to permissive
    pub fn from_env() -> Result<Self, Error> {
        let mode = match var("SCRUTIN_MODE") {
            Ok(val) => val.parse()?,
            Err(_e) => Mode::default(),
        };

        Ok(Config { mode })
    }
}
