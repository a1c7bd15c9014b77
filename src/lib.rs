//! passenger-stats - Phusion Passenger metrics collector library.
//!
//! Provides:
//! - `collector` — runs `passenger-status` / `passenger-memory-stats` and scrapes their output
//! - `model` — metric keys, values and the per-collection snapshot
//! - `config` — command lines, shell prefix and timeout
//! - `util` — helper utilities
//!
//! The `passenger-stats` binary wraps a single collection and prints it as JSON.

pub mod collector;
pub mod config;
pub mod model;
pub mod util;
