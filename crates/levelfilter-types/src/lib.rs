//! Shared types for levelfilter
//!
//! This crate contains the level name and terminal color types used by the
//! filter and the demo binary.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ============================================================================
// Log Levels
// ============================================================================

/// Names of the standard scale, lowest severity first
pub const DEFAULT_LEVELS: [&str; 5] = ["DEBUG", "INFO", "WARN", "ERROR", "CRIT"];

/// A severity name as it appears between brackets in a log line.
///
/// Matching is exact and case-sensitive. Equality and hashing operate on the
/// raw bytes, so a `HashSet<LogLevel>` can be probed with a `&[u8]` tag sliced
/// straight out of a line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(String);

impl LogLevel {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The standard five level scale: DEBUG < INFO < WARN < ERROR < CRIT
    pub fn default_scale() -> Vec<LogLevel> {
        DEFAULT_LEVELS.iter().copied().map(LogLevel::from).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Width in bytes, used for column alignment
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Must agree with `Borrow<[u8]>`: hash the bytes, not the `str`.
impl Hash for LogLevel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Borrow<[u8]> for LogLevel {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<&str> for LogLevel {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for LogLevel {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for LogLevel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LogLevel {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Terminal Colors
// ============================================================================

/// SGR sequence that resets all attributes
pub const SGR_RESET: &str = "\x1b[0m";

/// ANSI 3x-series foreground colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnsiColor {
    Black = 30,
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Magenta = 35,
    Cyan = 36,
    White = 37,
}

impl AnsiColor {
    /// Numeric SGR parameter
    pub fn code(self) -> u8 {
        self as u8
    }

    /// "Set foreground color" escape sequence
    pub fn sgr(self) -> &'static str {
        match self {
            Self::Black => "\x1b[30m",
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Blue => "\x1b[34m",
            Self::Magenta => "\x1b[35m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
        }
    }
}

/// Look up the highlight color for a level tag.
///
/// Names outside the table (INFO included) are not highlighted.
pub fn color_for(tag: &[u8]) -> Option<AnsiColor> {
    match tag {
        b"CRITICAL" | b"CRIT" => Some(AnsiColor::Magenta),
        b"ERROR" => Some(AnsiColor::Red),
        b"WARNING" | b"WARN" => Some(AnsiColor::Yellow),
        b"NOTICE" => Some(AnsiColor::Green),
        b"DEBUG" => Some(AnsiColor::Cyan),
        _ => None,
    }
}
