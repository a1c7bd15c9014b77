//! Pre-built Passenger output scenarios for testing.
//!
//! Captured from Passenger 3 running behind Apache, trimmed to a readable size.

use super::runner::MockRunner;
use crate::config::CollectorConfig;

/// `passenger-status` output.
pub const STATUS_OUTPUT: &str = "\
----------- General information -----------
max      = 40
count    = 38
active   = 2
inactive = 36
Waiting on global queue: 0

----------- Application groups -----------
/var/www/shop/current:
  App root: /var/www/shop/current
  * PID: 21150   Sessions: 1    Processed: 10432   Uptime: 2h 13m 5s
  * PID: 21164   Sessions: 1    Processed: 9871    Uptime: 2h 13m 1s
  * PID: 21177   Sessions: 0    Processed: 10015   Uptime: 2h 12m 58s
";

/// `passenger-status` output as printed to a terminal, with colour codes.
pub const STATUS_OUTPUT_COLOURED: &str = "\
\x1B[33m\x1B[44m\x1B[1m----------- General information -----------\x1B[0m
\x1B[1mmax\x1B[0m      = 40
\x1B[1mcount\x1B[0m    = 38
\x1B[1mactive\x1B[0m   = 2
\x1B[1minactive\x1B[0m = 36
\x1B[1mWaiting on global queue\x1B[0m: 0
";

/// `passenger-status` output when the server is down (exit status 1).
pub const STATUS_NOT_RUNNING: &str = "\
ERROR: Phusion Passenger doesn't seem to be running.
";

/// `passenger-memory-stats` output with Apache and Nginx sections before the
/// Passenger one. The earlier sections carry their own totals.
pub const MEMORY_STATS_OUTPUT: &str = "\
---------- Apache processes ----------
PID    PPID   VMSize    Private  Name
--------------------------------------
1438   1      183.4 MB  0.3 MB   /usr/sbin/apache2 -k start
1452   1438   189.1 MB  0.5 MB   /usr/sbin/apache2 -k start
1453   1438   189.1 MB  0.5 MB   /usr/sbin/apache2 -k start
### Processes: 3
### Total private dirty RSS: 1.34 MB


-------- Nginx processes --------

### Processes: 0
### Total private dirty RSS: 0.00 MB


---------- Passenger processes -----------
PID    VMSize    Private   Name
-------------------------------------------
20998  22.9 MB   0.3 MB    PassengerWatchdog
21001  126.4 MB  6.8 MB    PassengerHelperAgent
21004  46.1 MB   8.3 MB    Passenger spawn server
21016  70.5 MB   0.8 MB    PassengerLoggingAgent
21150  218.5 MB  52.1 MB   Rack: /var/www/shop/current
21164  214.2 MB  50.6 MB   Rack: /var/www/shop/current
21177  216.0 MB  51.3 MB   Rack: /var/www/shop/current
### Processes: 44
### Total private dirty RSS: 2266.23 MB
";

/// `passenger-memory-stats` output as printed to a terminal, with colour codes.
pub const MEMORY_STATS_OUTPUT_COLOURED: &str = "\
\x1B[1m\x1B[33m\x1B[44m---------- Apache processes ----------\x1B[0m
\x1B[1m### Processes: 3\x1B[0m
\x1B[1m### Total private dirty RSS: 1.34 MB\x1B[0m
\x1B[1m\x1B[33m\x1B[44m---------- Passenger processes -----------\x1B[0m
20998  22.9 MB   \x1B[1m0.3 MB\x1B[0m    PassengerWatchdog
21001  126.4 MB  \x1B[1m6.8 MB\x1B[0m    PassengerHelperAgent
21004  46.1 MB   \x1B[1m8.3 MB\x1B[0m    Passenger spawn server
21016  70.5 MB   \x1B[1m0.8 MB\x1B[0m    PassengerLoggingAgent
\x1B[1m### Processes: 44\x1B[0m
\x1B[1m### Total private dirty RSS: 2266.23 MB\x1B[0m
";

impl MockRunner {
    /// Creates a runner answering both commands of `config` with healthy output.
    pub fn typical_passenger(config: &CollectorConfig) -> Self {
        let mut runner = Self::new();
        runner.add_output(config.status_command_line(), STATUS_OUTPUT);
        runner.add_output(config.memory_stats_command_line(), MEMORY_STATS_OUTPUT);
        runner
    }

    /// Creates a runner for a host where Passenger is installed but stopped.
    ///
    /// `passenger-status` fails; `passenger-memory-stats` still succeeds and
    /// reports only the web server.
    pub fn passenger_stopped(config: &CollectorConfig) -> Self {
        let mut runner = Self::new();
        runner.add_failure(config.status_command_line(), 1, STATUS_NOT_RUNNING);
        runner.add_output(
            config.memory_stats_command_line(),
            "\
---------- Apache processes ----------
### Processes: 3
### Total private dirty RSS: 1.34 MB


---------- Passenger processes -----------
### Processes: 0
### Total private dirty RSS: 0.00 MB
",
        );
        runner
    }
}
