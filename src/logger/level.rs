//! Severity vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log levels, from highest to lowest severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Log,
    Trace,
    Debug,
}

impl Level {
    /// Every level, highest severity first.
    pub const ALL: [Level; 6] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Log,
        Level::Trace,
        Level::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Log => "log",
            Level::Trace => "trace",
            Level::Debug => "debug",
        }
    }

    /// Position in [`Level::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name outside the severity vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLevel(pub String);

impl fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown log level: \"{}\".", self.0)
    }
}

impl std::error::Error for UnknownLevel {}

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| UnknownLevel(s.to_string()))
    }
}

/// Threshold of a leaf logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    /// Every level disabled.
    Nothing,
    /// This level and every more severe one enabled.
    UpTo(Level),
}

impl LevelFilter {
    pub const ALL: LevelFilter = LevelFilter::UpTo(Level::Debug);

    pub fn enabled(&self, level: Level) -> bool {
        match self {
            LevelFilter::Nothing => false,
            LevelFilter::UpTo(max) => level <= *max,
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            LevelFilter::Nothing => 0,
            LevelFilter::UpTo(level) => level.index() as u8 + 1,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => LevelFilter::Nothing,
            n => LevelFilter::UpTo(Level::ALL[(n as usize - 1).min(Level::ALL.len() - 1)]),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "nothing" {
            return Ok(LevelFilter::Nothing);
        }
        s.parse().map(LevelFilter::UpTo)
    }
}
