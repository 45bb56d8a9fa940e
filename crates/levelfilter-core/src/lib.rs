//! Severity filtering for line-oriented log output
//!
//! This crate provides the level filter writer, tag parsing, and a line
//! logger that feeds the filter one line per call.

mod error;
mod filter;
mod logger;
mod parser;

pub use error::FilterError;
pub use filter::{LevelFilter, LevelFilterBuilder};
pub use logger::LineLogger;
pub use parser::{extract_level, level_span};

// Re-export types used in our public API
pub use levelfilter_types::{AnsiColor, LogLevel, SGR_RESET};
