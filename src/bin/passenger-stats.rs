//! passenger-stats - One-shot Phusion Passenger metrics collector.
//!
//! Runs `passenger-status` and `passenger-memory-stats` once and prints the
//! resulting metrics as a single JSON object on stdout. Logs go to stderr.
//!
//! Usage:
//!   passenger-stats                          # default commands, 10s timeout
//!   passenger-stats --shell-prefix rvmsudo   # wrap both commands
//!   passenger-stats --pretty -v              # indented output, debug logs

use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use passenger_stats::collector::{MockRunner, PassengerCollector, ShellRunner};
use passenger_stats::config::{
    CollectorConfig, DEFAULT_MEMORY_STATS_COMMAND, DEFAULT_STATUS_COMMAND,
};
use passenger_stats::model::MetricSnapshot;

/// One-shot Phusion Passenger metrics collector.
#[derive(Parser)]
#[command(
    name = "passenger-stats",
    about = "Collect Phusion Passenger metrics as JSON",
    version
)]
struct Args {
    /// Command printing pool status.
    #[arg(long, env = "PASSENGER_STATUS_CMD", default_value = DEFAULT_STATUS_COMMAND)]
    status_command: String,

    /// Command printing per-process memory usage.
    #[arg(
        long,
        env = "PASSENGER_MEMORY_STATS_CMD",
        default_value = DEFAULT_MEMORY_STATS_COMMAND
    )]
    memory_stats_command: String,

    /// Wrapper prepended to both commands (e.g. "rvmsudo" or "sudo -u app -i rvmsudo").
    #[arg(long, env = "PASSENGER_SHELL_PREFIX", default_value = "")]
    shell_prefix: String,

    /// Per-command timeout in seconds.
    #[arg(short, long, env = "PASSENGER_TIMEOUT", default_value = "10")]
    timeout: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Use built-in sample output instead of running any command.
    #[arg(long)]
    demo: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("passenger_stats={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn collect(args: &Args, config: CollectorConfig) -> MetricSnapshot {
    if args.demo {
        let runner = MockRunner::typical_passenger(&config);
        return PassengerCollector::new(runner, config).run();
    }

    let mut collector = PassengerCollector::new(ShellRunner::new(), config);
    let snapshot = collector.run();
    if let Some(timing) = collector.last_timing() {
        info!(
            "collected {}/{} metrics in {:?} (status {:?}, memory {:?})",
            snapshot.known_count(),
            snapshot.len(),
            timing.total,
            timing.status,
            timing.memory_stats
        );
    }
    snapshot
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let config = CollectorConfig::new()
        .with_status_command(args.status_command.as_str())
        .with_memory_stats_command(args.memory_stats_command.as_str())
        .with_shell_prefix(args.shell_prefix.as_str())
        .with_timeout(Duration::from_secs(args.timeout));

    let snapshot = collect(&args, config);

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("failed to serialize metrics: {}", e);
            std::process::exit(1);
        }
    }
}
