//! Utility modules for passenger-stats.

mod ansi;

pub use ansi::strip_ansi;
