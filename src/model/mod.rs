//! Data model for collected Passenger metrics.
//!
//! Collection produces two typed fragments, [`PassengerStatus`] and
//! [`PassengerMemoryStats`], which are merged into one flat [`MetricSnapshot`]
//! keyed by [`MetricKey`].

mod passenger;
mod snapshot;

pub use passenger::{PassengerMemoryStats, PassengerStatus};
pub use snapshot::{MetricKey, MetricKind, MetricSnapshot, MetricValue};
