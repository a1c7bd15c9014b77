//! Collector configuration.
//!
//! How the external commands are invoked is decided by the deployment, not the
//! collector: command names may need full paths, and reading Passenger's state
//! usually requires a privilege-elevation wrapper such as `rvmsudo` or
//! `sudo -u app -i rvmsudo`.

use std::time::Duration;

/// Default status command.
pub const DEFAULT_STATUS_COMMAND: &str = "passenger-status";

/// Default memory statistics command.
pub const DEFAULT_MEMORY_STATS_COMMAND: &str = "passenger-memory-stats";

/// Default limit for a single external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`PassengerCollector`](crate::collector::PassengerCollector).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Command printing pool status.
    pub status_command: String,
    /// Command printing per-process memory usage.
    pub memory_stats_command: String,
    /// Prepended to both commands, separated by a space. Empty means none.
    pub shell_prefix: String,
    /// Upper bound on each command's run time.
    pub timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            status_command: DEFAULT_STATUS_COMMAND.to_string(),
            memory_stats_command: DEFAULT_MEMORY_STATS_COMMAND.to_string(),
            shell_prefix: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CollectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status_command(mut self, command: impl Into<String>) -> Self {
        self.status_command = command.into();
        self
    }

    pub fn with_memory_stats_command(mut self, command: impl Into<String>) -> Self {
        self.memory_stats_command = command.into();
        self
    }

    /// Sets the privilege-elevation wrapper, e.g. `"rvmsudo"`.
    pub fn with_shell_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.shell_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full shell command line for the status command.
    pub fn status_command_line(&self) -> String {
        self.command_line(&self.status_command)
    }

    /// Full shell command line for the memory statistics command.
    pub fn memory_stats_command_line(&self) -> String {
        self.command_line(&self.memory_stats_command)
    }

    fn command_line(&self, command: &str) -> String {
        let prefix = self.shell_prefix.trim();
        if prefix.is_empty() {
            command.trim().to_string()
        } else {
            format!("{} {}", prefix, command.trim())
        }
    }
}
