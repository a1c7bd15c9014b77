//! Flat metric snapshot handed back to the monitoring agent.
//!
//! A snapshot always carries all eleven keys. Values that could not be
//! collected are `None` and serialize as JSON `null`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::passenger::{PassengerMemoryStats, PassengerStatus};

/// Identifier of a collected metric.
///
/// Declaration order is the output order of [`MetricSnapshot`].
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    MaxApplicationInstances,
    CountApplicationInstances,
    ActiveApplicationInstances,
    InactiveApplicationInstances,
    WaitingOnGlobalQueue,
    PassengerWatchdogRssMb,
    PassengerHelperAgentRssMb,
    PassengerSpawnServerRssMb,
    PassengerLoggingAgentRssMb,
    Processes,
    TotalPrivateDirtyRssMb,
}

impl MetricKey {
    /// Every key, in output order.
    pub const ALL: [MetricKey; 11] = [
        MetricKey::MaxApplicationInstances,
        MetricKey::CountApplicationInstances,
        MetricKey::ActiveApplicationInstances,
        MetricKey::InactiveApplicationInstances,
        MetricKey::WaitingOnGlobalQueue,
        MetricKey::PassengerWatchdogRssMb,
        MetricKey::PassengerHelperAgentRssMb,
        MetricKey::PassengerSpawnServerRssMb,
        MetricKey::PassengerLoggingAgentRssMb,
        MetricKey::Processes,
        MetricKey::TotalPrivateDirtyRssMb,
    ];

    /// Metric name as reported to the agent.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::MaxApplicationInstances => "max_application_instances",
            MetricKey::CountApplicationInstances => "count_application_instances",
            MetricKey::ActiveApplicationInstances => "active_application_instances",
            MetricKey::InactiveApplicationInstances => "inactive_application_instances",
            MetricKey::WaitingOnGlobalQueue => "waiting_on_global_queue",
            MetricKey::PassengerWatchdogRssMb => "passenger_watchdog_rss_mb",
            MetricKey::PassengerHelperAgentRssMb => "passenger_helper_agent_rss_mb",
            MetricKey::PassengerSpawnServerRssMb => "passenger_spawn_server_rss_mb",
            MetricKey::PassengerLoggingAgentRssMb => "passenger_logging_agent_rss_mb",
            MetricKey::Processes => "processes",
            MetricKey::TotalPrivateDirtyRssMb => "total_private_dirty_rss_mb",
        }
    }

    /// Numeric type carried by this key.
    pub fn kind(self) -> MetricKind {
        match self {
            MetricKey::MaxApplicationInstances
            | MetricKey::CountApplicationInstances
            | MetricKey::ActiveApplicationInstances
            | MetricKey::InactiveApplicationInstances
            | MetricKey::WaitingOnGlobalQueue
            | MetricKey::Processes => MetricKind::Int,
            MetricKey::PassengerWatchdogRssMb
            | MetricKey::PassengerHelperAgentRssMb
            | MetricKey::PassengerSpawnServerRssMb
            | MetricKey::PassengerLoggingAgentRssMb
            | MetricKey::TotalPrivateDirtyRssMb => MetricKind::Float,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric type of a metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    Int,
    Float,
}

/// A collected numeric value.
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Int(u64),
    Float(f64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Int(_) => MetricKind::Int,
            MetricValue::Float(_) => MetricKind::Float,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Result of one collection cycle.
///
/// Built only from the typed fragments, so every key is present and every
/// value has the kind its key declares. There is no mutating API.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(transparent)]
pub struct MetricSnapshot {
    values: BTreeMap<MetricKey, Option<MetricValue>>,
}

#[allow(clippy::len_without_is_empty)]
impl MetricSnapshot {
    /// Merges the status and memory fragments into one snapshot.
    pub fn from_parts(status: &PassengerStatus, memory: &PassengerMemoryStats) -> Self {
        let values = status
            .metrics()
            .into_iter()
            .chain(memory.metrics())
            .collect();
        Self { values }
    }

    /// Snapshot with every metric unknown.
    pub fn unknown() -> Self {
        Self::from_parts(&PassengerStatus::default(), &PassengerMemoryStats::default())
    }

    /// Returns the value for `key`, or `None` if it is unknown.
    pub fn get(&self, key: MetricKey) -> Option<MetricValue> {
        self.values.get(&key).copied().flatten()
    }

    /// Iterates over all keys in output order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, Option<MetricValue>)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// Number of keys (always `MetricKey::ALL.len()`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Number of keys with a known value.
    pub fn known_count(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_status() -> PassengerStatus {
        PassengerStatus {
            max_application_instances: Some(40),
            count_application_instances: Some(38),
            active_application_instances: Some(2),
            inactive_application_instances: Some(36),
            waiting_on_global_queue: Some(0),
        }
    }

    #[test]
    fn test_unknown_snapshot_has_every_key() {
        let snapshot = MetricSnapshot::unknown();
        assert_eq!(snapshot.len(), MetricKey::ALL.len());
        assert_eq!(snapshot.known_count(), 0);
        let keys: Vec<MetricKey> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, MetricKey::ALL);
    }

    #[test]
    fn test_from_parts_keeps_partial_values() {
        let memory = PassengerMemoryStats {
            processes: Some(44),
            ..PassengerMemoryStats::default()
        };
        let snapshot = MetricSnapshot::from_parts(&sample_status(), &memory);

        assert_eq!(snapshot.len(), 11);
        assert_eq!(snapshot.known_count(), 6);
        assert_eq!(
            snapshot.get(MetricKey::CountApplicationInstances),
            Some(MetricValue::Int(38))
        );
        assert_eq!(snapshot.get(MetricKey::Processes), Some(MetricValue::Int(44)));
        assert_eq!(snapshot.get(MetricKey::TotalPrivateDirtyRssMb), None);
    }

    #[test]
    fn test_serializes_unknown_as_null() {
        let memory = PassengerMemoryStats {
            passenger_watchdog_rss_mb: Some(0.3),
            total_private_dirty_rss_mb: Some(2266.23),
            ..PassengerMemoryStats::default()
        };
        let snapshot = MetricSnapshot::from_parts(&PassengerStatus::default(), &memory);
        let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 11);
        assert!(object["max_application_instances"].is_null());
        assert_eq!(object["passenger_watchdog_rss_mb"], serde_json::json!(0.3));
        assert_eq!(object["total_private_dirty_rss_mb"], serde_json::json!(2266.23));
        assert!(object["processes"].is_null());
    }

    #[test]
    fn test_key_names_match_serialized_names() {
        for key in MetricKey::ALL {
            let serialized = serde_json::to_value(key).unwrap();
            assert_eq!(serialized, serde_json::json!(key.as_str()));
        }
    }

    #[test]
    fn test_metric_value_display() {
        assert_eq!(MetricValue::Int(44).to_string(), "44");
        assert_eq!(MetricValue::Float(2266.23).to_string(), "2266.23");
    }
}
