//! Parsers for `passenger-status` and `passenger-memory-stats` output.
//!
//! These are pure functions over already de-coloured text (see
//! [`strip_ansi`](crate::util::strip_ansi)). Every field is extracted by its own
//! pattern, so a missing or malformed line only leaves that field unknown.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{PassengerMemoryStats, PassengerStatus};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("built-in pattern is valid")
}

/// `max = N`
static MAX_INSTANCES: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bmax[ \t]*[=:][ \t]*(\d+)"));
static COUNT_INSTANCES: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bcount[ \t]*[=:][ \t]*(\d+)"));
/// `\b` is what keeps `active` from matching the tail of `inactive`.
static ACTIVE_INSTANCES: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bactive[ \t]*[=:][ \t]*(\d+)"));
static INACTIVE_INSTANCES: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\binactive[ \t]*[=:][ \t]*(\d+)"));
static GLOBAL_QUEUE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"Waiting on global queue[ \t]*[=:][ \t]*(\d+)"));

/// `<pid> <virt> MB <rss> MB <name>`; captures the resident size.
fn process_rss_pattern(name: &str) -> Regex {
    pattern(&format!(
        r"(?m)^[ \t]*\d+[ \t]+\d+(?:\.\d+)?[ \t]+MB[ \t]+(\d+(?:\.\d+)?)[ \t]+MB[ \t]+{}\b",
        regex::escape(name)
    ))
}

static WATCHDOG_RSS: LazyLock<Regex> =
    LazyLock::new(|| process_rss_pattern("PassengerWatchdog"));
static HELPER_AGENT_RSS: LazyLock<Regex> =
    LazyLock::new(|| process_rss_pattern("PassengerHelperAgent"));
static SPAWN_SERVER_RSS: LazyLock<Regex> =
    LazyLock::new(|| process_rss_pattern("Passenger spawn server"));
static LOGGING_AGENT_RSS: LazyLock<Regex> =
    LazyLock::new(|| process_rss_pattern("PassengerLoggingAgent"));

/// Dashed rule opening the Passenger section, e.g. `------ Passenger processes ------`.
static PASSENGER_SECTION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^-+\s*Passenger processes\s*-+"));
static SECTION_PROCESSES: LazyLock<Regex> = LazyLock::new(|| pattern(r"^###\s*Processes:\s*(\d+)"));
static SECTION_PRIVATE_DIRTY_RSS: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^###\s*Total private dirty RSS:\s*(\d+(?:\.\d+)?)\s*MB"));

/// Returns the first capture group of `re` in `text`, parsed as `T`.
fn capture<T: FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parses `passenger-status` output.
///
/// Expected lines (Passenger 3 format):
/// ```text
/// max      = 40
/// count    = 40
/// active   = 0
/// inactive = 40
/// Waiting on global queue: 0
/// ```
pub fn parse_status(output: &str) -> PassengerStatus {
    PassengerStatus {
        max_application_instances: capture(&MAX_INSTANCES, output),
        count_application_instances: capture(&COUNT_INSTANCES, output),
        active_application_instances: capture(&ACTIVE_INSTANCES, output),
        inactive_application_instances: capture(&INACTIVE_INSTANCES, output),
        waiting_on_global_queue: capture(&GLOBAL_QUEUE, output),
    }
}

/// Position of the line scan relative to the "Passenger processes" section.
///
/// Moves from `BeforeSection` to `InSection` on the header rule and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionScan {
    #[default]
    BeforeSection,
    InSection,
}

impl SectionScan {
    /// Returns the state after seeing `line`.
    pub fn observe(self, line: &str) -> Self {
        match self {
            SectionScan::BeforeSection if PASSENGER_SECTION.is_match(line) => {
                SectionScan::InSection
            }
            state => state,
        }
    }
}

/// Parses `passenger-memory-stats` output.
///
/// Per-process resident sizes come from anywhere in the output:
/// ```text
/// 20998  22.9 MB   0.3 MB   PassengerWatchdog
/// 21001  126.4 MB  6.8 MB   PassengerHelperAgent
/// ```
///
/// The `### Processes:` and `### Total private dirty RSS:` totals are printed
/// once per section (Apache, Nginx, Passenger). Only the first of each after
/// the "Passenger processes" header is used.
pub fn parse_memory_stats(output: &str) -> PassengerMemoryStats {
    let mut stats = PassengerMemoryStats {
        passenger_watchdog_rss_mb: capture(&WATCHDOG_RSS, output),
        passenger_helper_agent_rss_mb: capture(&HELPER_AGENT_RSS, output),
        passenger_spawn_server_rss_mb: capture(&SPAWN_SERVER_RSS, output),
        passenger_logging_agent_rss_mb: capture(&LOGGING_AGENT_RSS, output),
        ..PassengerMemoryStats::default()
    };

    let mut scan = SectionScan::default();
    for line in output.lines() {
        if scan == SectionScan::BeforeSection {
            scan = scan.observe(line);
            continue;
        }

        if stats.processes.is_none() {
            stats.processes = capture(&SECTION_PROCESSES, line);
        }
        if stats.total_private_dirty_rss_mb.is_none() {
            stats.total_private_dirty_rss_mb = capture(&SECTION_PRIVATE_DIRTY_RSS, line);
        }
        if stats.processes.is_some() && stats.total_private_dirty_rss_mb.is_some() {
            break;
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::scenarios;

    #[test]
    fn test_parse_status_all_fields() {
        let status = parse_status(scenarios::STATUS_OUTPUT);

        assert_eq!(status.max_application_instances, Some(40));
        assert_eq!(status.count_application_instances, Some(38));
        assert_eq!(status.active_application_instances, Some(2));
        assert_eq!(status.inactive_application_instances, Some(36));
        assert_eq!(status.waiting_on_global_queue, Some(0));
    }

    #[test]
    fn test_parse_status_active_not_taken_from_inactive() {
        let status = parse_status("inactive = 40\nactive = 3\n");
        assert_eq!(status.active_application_instances, Some(3));
        assert_eq!(status.inactive_application_instances, Some(40));

        let status = parse_status("inactive = 40\n");
        assert_eq!(status.active_application_instances, None);
    }

    #[test]
    fn test_parse_status_colon_separator() {
        let status = parse_status("max: 6\ncount: 2\nWaiting on global queue = 7\n");
        assert_eq!(status.max_application_instances, Some(6));
        assert_eq!(status.count_application_instances, Some(2));
        assert_eq!(status.waiting_on_global_queue, Some(7));
    }

    #[test]
    fn test_parse_status_missing_fields_are_independent() {
        let status = parse_status("max      = 12\nWaiting on global queue: 5\n");
        assert_eq!(status.max_application_instances, Some(12));
        assert_eq!(status.count_application_instances, None);
        assert_eq!(status.active_application_instances, None);
        assert_eq!(status.inactive_application_instances, None);
        assert_eq!(status.waiting_on_global_queue, Some(5));
    }

    #[test]
    fn test_parse_status_garbage() {
        assert_eq!(
            parse_status("ERROR: Phusion Passenger doesn't seem to be running."),
            PassengerStatus::default()
        );
        assert_eq!(parse_status(""), PassengerStatus::default());
    }

    #[test]
    fn test_parse_memory_stats_full() {
        let stats = parse_memory_stats(scenarios::MEMORY_STATS_OUTPUT);

        assert_eq!(stats.passenger_watchdog_rss_mb, Some(0.3));
        assert_eq!(stats.passenger_helper_agent_rss_mb, Some(6.8));
        assert_eq!(stats.passenger_spawn_server_rss_mb, Some(8.3));
        assert_eq!(stats.passenger_logging_agent_rss_mb, Some(0.8));
        assert_eq!(stats.processes, Some(44));
        assert_eq!(stats.total_private_dirty_rss_mb, Some(2266.23));
    }

    #[test]
    fn test_parse_memory_stats_ignores_totals_before_section() {
        let output = "\
---------- Apache processes ----------
### Processes: 3
### Total private dirty RSS: 1.34 MB
";
        let stats = parse_memory_stats(output);
        assert_eq!(stats.processes, None);
        assert_eq!(stats.total_private_dirty_rss_mb, None);
    }

    #[test]
    fn test_parse_memory_stats_first_total_after_section_wins() {
        let output = "\
-------- Nginx processes --------
### Processes: 1
### Total private dirty RSS: 0.50 MB
----- Passenger processes -----
### Processes: 7
### Total private dirty RSS: 120.5 MB
### Processes: 99
### Total private dirty RSS: 999.9 MB
";
        let stats = parse_memory_stats(output);
        assert_eq!(stats.processes, Some(7));
        assert_eq!(stats.total_private_dirty_rss_mb, Some(120.5));
    }

    #[test]
    fn test_parse_memory_stats_header_line_not_scanned() {
        let stats = parse_memory_stats("--- Passenger processes --- ### Processes: 5\n");
        assert_eq!(stats.processes, None);
    }

    #[test]
    fn test_parse_memory_stats_integer_sizes() {
        let stats = parse_memory_stats("1234  23 MB  5 MB  PassengerWatchdog\n");
        assert_eq!(stats.passenger_watchdog_rss_mb, Some(5.0));
    }

    #[test]
    fn test_parse_memory_stats_missing_process() {
        let output = "\
20998  22.9 MB   0.3 MB   PassengerWatchdog
21001  126.4 MB  ?        PassengerHelperAgent
";
        let stats = parse_memory_stats(output);
        assert_eq!(stats.passenger_watchdog_rss_mb, Some(0.3));
        assert_eq!(stats.passenger_helper_agent_rss_mb, None);
        assert_eq!(stats.passenger_spawn_server_rss_mb, None);
        assert_eq!(stats.processes, None);
    }

    #[test]
    fn test_section_scan_never_reverts() {
        let scan = SectionScan::default();
        assert_eq!(scan, SectionScan::BeforeSection);

        let scan = scan.observe("---------- Apache processes ----------");
        assert_eq!(scan, SectionScan::BeforeSection);

        let scan = scan.observe("---------- Passenger processes ----------");
        assert_eq!(scan, SectionScan::InSection);

        let scan = scan.observe("---------- Apache processes ----------");
        assert_eq!(scan, SectionScan::InSection);
    }

    #[test]
    fn test_parse_memory_stats_is_deterministic() {
        let first = parse_memory_stats(scenarios::MEMORY_STATS_OUTPUT);
        let second = parse_memory_stats(scenarios::MEMORY_STATS_OUTPUT);
        assert_eq!(first, second);
    }
}
