//! Typed fragments produced by each external command.
//!
//! A `None` field means the value is unknown: the command failed or the field
//! was not present in its output. `Default` is the all-unknown fragment.

use serde::Serialize;

use super::snapshot::{MetricKey, MetricValue};

/// Pool counters reported by `passenger-status`.
///
/// Source: `passenger-status` general information block
#[derive(Clone, Serialize, Debug, PartialEq, Eq, Default)]
pub struct PassengerStatus {
    /// Maximum pool size.
    /// Source: `max = N`
    pub max_application_instances: Option<u64>,

    /// Application processes currently in the pool.
    /// Source: `count = N`
    pub count_application_instances: Option<u64>,

    /// Processes currently handling a request.
    /// Source: `active = N`
    pub active_application_instances: Option<u64>,

    /// Idle processes.
    /// Source: `inactive = N`
    pub inactive_application_instances: Option<u64>,

    /// Requests waiting for a free process.
    /// Source: `Waiting on global queue: N`
    pub waiting_on_global_queue: Option<u64>,
}

impl PassengerStatus {
    /// Returns every status metric paired with its key.
    pub fn metrics(&self) -> [(MetricKey, Option<MetricValue>); 5] {
        [
            (
                MetricKey::MaxApplicationInstances,
                self.max_application_instances.map(MetricValue::Int),
            ),
            (
                MetricKey::CountApplicationInstances,
                self.count_application_instances.map(MetricValue::Int),
            ),
            (
                MetricKey::ActiveApplicationInstances,
                self.active_application_instances.map(MetricValue::Int),
            ),
            (
                MetricKey::InactiveApplicationInstances,
                self.inactive_application_instances.map(MetricValue::Int),
            ),
            (
                MetricKey::WaitingOnGlobalQueue,
                self.waiting_on_global_queue.map(MetricValue::Int),
            ),
        ]
    }
}

/// Memory figures reported by `passenger-memory-stats`.
///
/// All sizes are in megabytes as printed by the command.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct PassengerMemoryStats {
    /// Resident size of the watchdog process.
    /// Source: `<pid> <virt> MB <rss> MB PassengerWatchdog`
    pub passenger_watchdog_rss_mb: Option<f64>,

    /// Resident size of the helper agent.
    /// Source: `<pid> <virt> MB <rss> MB PassengerHelperAgent`
    pub passenger_helper_agent_rss_mb: Option<f64>,

    /// Resident size of the spawn server.
    /// Source: `<pid> <virt> MB <rss> MB Passenger spawn server`
    pub passenger_spawn_server_rss_mb: Option<f64>,

    /// Resident size of the logging agent.
    /// Source: `<pid> <virt> MB <rss> MB PassengerLoggingAgent`
    pub passenger_logging_agent_rss_mb: Option<f64>,

    /// Number of Passenger-managed processes.
    /// Source: `### Processes: N` in the "Passenger processes" section
    pub processes: Option<u64>,

    /// Private dirty RSS summed over Passenger-managed processes.
    /// Source: `### Total private dirty RSS: X MB` in the "Passenger processes" section
    pub total_private_dirty_rss_mb: Option<f64>,
}

impl PassengerMemoryStats {
    /// Returns every memory metric paired with its key.
    pub fn metrics(&self) -> [(MetricKey, Option<MetricValue>); 6] {
        [
            (
                MetricKey::PassengerWatchdogRssMb,
                self.passenger_watchdog_rss_mb.map(MetricValue::Float),
            ),
            (
                MetricKey::PassengerHelperAgentRssMb,
                self.passenger_helper_agent_rss_mb.map(MetricValue::Float),
            ),
            (
                MetricKey::PassengerSpawnServerRssMb,
                self.passenger_spawn_server_rss_mb.map(MetricValue::Float),
            ),
            (
                MetricKey::PassengerLoggingAgentRssMb,
                self.passenger_logging_agent_rss_mb.map(MetricValue::Float),
            ),
            (MetricKey::Processes, self.processes.map(MetricValue::Int)),
            (
                MetricKey::TotalPrivateDirtyRssMb,
                self.total_private_dirty_rss_mb.map(MetricValue::Float),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fragments_are_unknown() {
        assert!(
            PassengerStatus::default()
                .metrics()
                .iter()
                .all(|(_, v)| v.is_none())
        );
        assert!(
            PassengerMemoryStats::default()
                .metrics()
                .iter()
                .all(|(_, v)| v.is_none())
        );
    }

    #[test]
    fn test_metric_values_match_key_kind() {
        let status = PassengerStatus {
            max_application_instances: Some(40),
            count_application_instances: Some(40),
            active_application_instances: Some(0),
            inactive_application_instances: Some(40),
            waiting_on_global_queue: Some(0),
        };
        let memory = PassengerMemoryStats {
            passenger_watchdog_rss_mb: Some(0.3),
            passenger_helper_agent_rss_mb: Some(6.8),
            passenger_spawn_server_rss_mb: Some(8.3),
            passenger_logging_agent_rss_mb: Some(0.8),
            processes: Some(44),
            total_private_dirty_rss_mb: Some(2266.23),
        };

        for (key, value) in status.metrics().into_iter().chain(memory.metrics()) {
            let value = value.unwrap();
            assert_eq!(value.kind(), key.kind(), "{key}");
        }
    }
}
