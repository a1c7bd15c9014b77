//! Main collector that runs both Passenger tools.
//!
//! The `PassengerCollector` struct provides a unified interface for gathering
//! pool and memory metrics into a `MetricSnapshot`.

use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::collector::parser::{parse_memory_stats, parse_status};
use crate::collector::traits::{CommandError, CommandRunner};
use crate::config::CollectorConfig;
use crate::model::{
    MetricKey, MetricSnapshot, MetricValue, PassengerMemoryStats, PassengerStatus,
};
use crate::util::strip_ansi;

/// Timing information for each collector phase.
///
/// Used for debugging and performance monitoring.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Time spent running and parsing `passenger-status`.
    pub status: Duration,
    /// Time spent running and parsing `passenger-memory-stats`.
    pub memory_stats: Duration,
}

/// Collector for Phusion Passenger metrics.
///
/// Every call runs the external commands afresh; nothing is carried over
/// between calls except the timing of the last `run`.
pub struct PassengerCollector<R: CommandRunner> {
    runner: R,
    config: CollectorConfig,
    /// Timing information from the last run call.
    last_timing: Option<CollectorTiming>,
}

impl<R: CommandRunner> PassengerCollector<R> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `runner` - Command runner implementation (real or mock)
    /// * `config` - Command lines, shell prefix and timeout
    pub fn new(runner: R, config: CollectorConfig) -> Self {
        Self {
            runner,
            config,
            last_timing: None,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Returns timing information from the last run call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Collects pool counters from the status command.
    ///
    /// Returns an all-unknown fragment if the command fails.
    pub fn collect_status(&self) -> PassengerStatus {
        let command_line = self.config.status_command_line();
        let output = match self.execute(&command_line) {
            Ok(output) => output,
            Err(e) => {
                error!(command = %command_line, "status command failed: {}", e);
                return PassengerStatus::default();
            }
        };

        let status = parse_status(&strip_ansi(&output));
        log_extracted(&status.metrics());
        status
    }

    /// Collects per-process and section memory figures from the memory-stats command.
    ///
    /// Returns an all-unknown fragment if the command fails.
    pub fn collect_memory_stats(&self) -> PassengerMemoryStats {
        let command_line = self.config.memory_stats_command_line();
        let output = match self.execute(&command_line) {
            Ok(output) => output,
            Err(e) => {
                error!(command = %command_line, "memory stats command failed: {}", e);
                return PassengerMemoryStats::default();
            }
        };

        let stats = parse_memory_stats(&strip_ansi(&output));
        log_extracted(&stats.metrics());
        stats
    }

    /// Collects a complete snapshot.
    ///
    /// Runs the status command, then the memory-stats command, and merges
    /// both. Never fails: whatever could not be collected is unknown.
    ///
    /// Also records timing information accessible via `last_timing()`.
    pub fn run(&mut self) -> MetricSnapshot {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();

        let start = Instant::now();
        let status = self.collect_status();
        timing.status = start.elapsed();

        let start = Instant::now();
        let memory = self.collect_memory_stats();
        timing.memory_stats = start.elapsed();

        let snapshot = MetricSnapshot::from_parts(&status, &memory);
        timing.total = total_start.elapsed();

        debug!(
            known = snapshot.known_count(),
            total = snapshot.len(),
            elapsed = ?timing.total,
            "collection finished"
        );
        self.last_timing = Some(timing);

        snapshot
    }

    /// Runs `command_line` and returns its output if it exited with status 0.
    fn execute(&self, command_line: &str) -> Result<String, CommandError> {
        let out = self.runner.run(command_line, self.config.timeout)?;
        if !out.success() {
            if !out.output.is_empty() {
                debug!(
                    command = %command_line,
                    output = %out.output.trim_end(),
                    "failed command output"
                );
            }
            return Err(CommandError::Failed {
                exit_code: out.exit_code,
                output: out.output,
            });
        }
        Ok(out.output)
    }
}

fn log_extracted(metrics: &[(MetricKey, Option<MetricValue>)]) {
    for (key, value) in metrics {
        if let Some(value) = value {
            debug!(metric = %key, %value, "extracted");
        }
    }
}
