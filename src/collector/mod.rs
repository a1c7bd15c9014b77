//! Phusion Passenger metrics collector.
//!
//! This module runs Passenger's reporting tools and scrapes their text
//! output, with support for mocking the tools for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   PassengerCollector                     │
//! │  ┌─────────────────────┐   ┌──────────────────────────┐  │
//! │  │   collect_status    │   │   collect_memory_stats   │  │
//! │  │  - passenger-status │   │  - passenger-memory-stats│  │
//! │  └──────────┬──────────┘   └────────────┬─────────────┘  │
//! │             └──────────────┬────────────┘                │
//! │                   strip_ansi + parser                    │
//! │                     ┌──────▼──────┐                      │
//! │                     │CommandRunner│ (trait)              │
//! │                     └──────┬──────┘                      │
//! └────────────────────────────┼─────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              │               │               │
//!       ┌──────▼──────┐ ┌──────▼──────┐ ┌──────▼──────┐
//!       │ ShellRunner │ │ MockRunner  │ │  Scenarios  │
//!       │  (sh -c)    │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use passenger_stats::collector::{PassengerCollector, ShellRunner};
//! use passenger_stats::config::CollectorConfig;
//!
//! let config = CollectorConfig::new().with_shell_prefix("rvmsudo");
//! let mut collector = PassengerCollector::new(ShellRunner::new(), config);
//! let snapshot = collector.run();
//! ```
//!
//! ## Testing (with MockRunner)
//!
//! ```
//! use passenger_stats::collector::{MockRunner, PassengerCollector};
//! use passenger_stats::config::CollectorConfig;
//!
//! let config = CollectorConfig::default();
//! let runner = MockRunner::typical_passenger(&config);
//! let mut collector = PassengerCollector::new(runner, config);
//! let snapshot = collector.run();
//! assert_eq!(snapshot.known_count(), 11);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod mock;
pub mod parser;
pub mod traits;

pub use collector::{CollectorTiming, PassengerCollector};
pub use mock::MockRunner;
pub use parser::SectionScan;
pub use traits::{CommandError, CommandOutput, CommandRunner, ShellRunner};
