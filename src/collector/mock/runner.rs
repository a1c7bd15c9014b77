//! In-memory command runner that replays scripted output.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::collector::traits::{CommandError, CommandOutput, CommandRunner};

/// Scripted result for one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The command ran to completion.
    Output(CommandOutput),
    /// The command hangs past its limit.
    Hang,
}

/// Command runner backed by a map from command line to response.
///
/// Command lines without a scripted response behave like a missing binary
/// (exit status 127). Every invocation is recorded for later inspection.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockRunner {
    /// Creates a runner with no scripted commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful run printing `output`.
    pub fn add_output(&mut self, command_line: impl Into<String>, output: impl Into<String>) {
        self.add_response(
            command_line,
            MockResponse::Output(CommandOutput::new(Some(0), output)),
        );
    }

    /// Scripts a run exiting with `exit_code`.
    pub fn add_failure(
        &mut self,
        command_line: impl Into<String>,
        exit_code: i32,
        output: impl Into<String>,
    ) {
        self.add_response(
            command_line,
            MockResponse::Output(CommandOutput::new(Some(exit_code), output)),
        );
    }

    /// Scripts a run that never finishes.
    pub fn add_hang(&mut self, command_line: impl Into<String>) {
        self.add_response(command_line, MockResponse::Hang);
    }

    pub fn add_response(&mut self, command_line: impl Into<String>, response: MockResponse) {
        self.responses.insert(command_line.into(), response);
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command_line: &str, timeout: Duration) -> Result<CommandOutput, CommandError> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(command_line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(command_line.to_string()),
        }

        match self.responses.get(command_line) {
            Some(MockResponse::Output(output)) => Ok(output.clone()),
            Some(MockResponse::Hang) => Err(CommandError::Timeout(timeout)),
            None => Ok(CommandOutput::new(
                Some(127),
                format!("sh: 1: {}: not found\n", command_line),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(1);

    #[test]
    fn test_mock_runner_replays_output() {
        let mut runner = MockRunner::new();
        runner.add_output("passenger-status", "max = 4\n");

        let out = runner.run("passenger-status", LIMIT).unwrap();
        assert!(out.success());
        assert_eq!(out.output, "max = 4\n");
    }

    #[test]
    fn test_mock_runner_unknown_command() {
        let runner = MockRunner::new();
        let out = runner.run("passenger-status", LIMIT).unwrap();
        assert_eq!(out.exit_code, Some(127));
    }

    #[test]
    fn test_mock_runner_hang_times_out() {
        let mut runner = MockRunner::new();
        runner.add_hang("passenger-status");
        let result = runner.run("passenger-status", LIMIT);
        assert!(matches!(result, Err(CommandError::Timeout(d)) if d == LIMIT));
    }

    #[test]
    fn test_mock_runner_records_calls() {
        let mut runner = MockRunner::new();
        runner.add_failure("passenger-status", 1, "ERROR\n");
        let _ = runner.run("passenger-status", LIMIT);
        let _ = runner.run("passenger-memory-stats", LIMIT);
        assert_eq!(
            runner.calls(),
            vec!["passenger-status", "passenger-memory-stats"]
        );
    }
}
