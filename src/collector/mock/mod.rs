//! Mock command runner for testing.
//!
//! This module provides `MockRunner` and canned Passenger output for testing
//! the collector without Passenger installed.

mod runner;
pub mod scenarios;

pub use runner::{MockResponse, MockRunner};
