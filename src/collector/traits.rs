//! Abstractions for running external commands to enable testing and mocking.
//!
//! The `CommandRunner` trait allows the collector to run the real Passenger
//! tools through a shell, or to replay canned output in tests and on hosts
//! where Passenger is not installed.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use subprocess::unix::PopenExt;
use subprocess::{ExitStatus, Popen, PopenConfig, PopenError, Redirection};
use tracing::{trace, warn};

/// Captured result of a command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Stdout and stderr, interleaved as the process wrote them.
    pub output: String,
}

impl CommandOutput {
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// Returns `true` if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Error type for command invocation failures.
#[derive(Debug)]
pub enum CommandError {
    /// The shell could not be started.
    Spawn(PopenError),
    /// I/O error while collecting output or waiting for exit.
    Io(io::Error),
    /// The command did not finish within the limit and was killed.
    Timeout(Duration),
    /// The command finished with a non-zero status.
    Failed {
        exit_code: Option<i32>,
        output: String,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Spawn(e) => write!(f, "failed to start: {}", e),
            CommandError::Io(e) => write!(f, "I/O error: {}", e),
            CommandError::Timeout(limit) => write!(f, "timed out after {:?}", limit),
            CommandError::Failed {
                exit_code: Some(code),
                ..
            } => write!(f, "exited with status {}", code),
            CommandError::Failed {
                exit_code: None, ..
            } => write!(f, "terminated by signal"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Spawn(e) => Some(e),
            CommandError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PopenError> for CommandError {
    fn from(e: PopenError) -> Self {
        CommandError::Spawn(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

/// Abstraction for running a shell command line.
///
/// Implementations return `Ok` for any process that ran to completion, whatever
/// its exit status; deciding what a non-zero status means is the caller's job.
pub trait CommandRunner: Send + Sync {
    /// Runs `command_line` and captures its combined output.
    ///
    /// # Arguments
    /// * `command_line` - Command line passed to the shell
    /// * `timeout` - Maximum time to wait for the command to exit
    fn run(&self, command_line: &str, timeout: Duration) -> Result<CommandOutput, CommandError>;
}

/// Real runner that executes command lines with `sh -c`.
///
/// Stderr is merged into stdout and stdin is closed immediately. The shell
/// leads its own process group; on timeout the whole group is killed, so
/// whatever the shell started (a `rvmsudo` wrapper, a pipeline, a `sudo`
/// password prompt on the tty) goes down with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    /// Creates a new `ShellRunner` instance.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str, timeout: Duration) -> Result<CommandOutput, CommandError> {
        let deadline = Instant::now() + timeout;
        trace!(command = command_line, ?timeout, "spawning shell");

        let mut child = Popen::create(
            &["sh", "-c", command_line],
            PopenConfig {
                stdin: Redirection::Pipe,
                stdout: Redirection::Pipe,
                stderr: Redirection::Merge,
                setpgid: true,
                ..Default::default()
            },
        )?;

        let captured = child
            .communicate_start(Some(Vec::new()))
            .limit_time(timeout)
            .read();
        let stdout = match captured {
            Ok((stdout, _)) => stdout.unwrap_or_default(),
            Err(e) => {
                terminate(&mut child);
                if e.error.kind() == io::ErrorKind::TimedOut {
                    return Err(CommandError::Timeout(timeout));
                }
                return Err(CommandError::Io(e.error));
            }
        };

        // Output is closed but the shell may still be running (e.g. it
        // backgrounded a child that closed its descriptors).
        let remaining = deadline.saturating_duration_since(Instant::now());
        let Some(status) = child.wait_timeout(remaining)? else {
            terminate(&mut child);
            return Err(CommandError::Timeout(timeout));
        };

        Ok(CommandOutput {
            exit_code: exit_code(status),
            output: String::from_utf8_lossy(&stdout).into_owned(),
        })
    }
}

/// Kills the shell's process group and reaps the shell.
fn terminate(child: &mut Popen) {
    if let Err(e) = child.send_signal_group(libc::SIGKILL) {
        warn!("failed to kill command group: {}", e);
        if let Err(e) = child.kill() {
            warn!("failed to kill command: {}", e);
        }
    }
    if let Err(e) = child.wait() {
        warn!("failed to reap command: {}", e);
    }
}

fn exit_code(status: ExitStatus) -> Option<i32> {
    match status {
        ExitStatus::Exited(code) => Some(code as i32),
        _ => None,
    }
}
