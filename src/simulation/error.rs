//! Error conditions raised by the simulation core

use thiserror::Error;

/// Errors that can occur while building or driving the simulation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("Signal ID cannot be empty")]
    InvalidIdentifier,

    #[error("Phase durations must be positive: red={red}, yellow={yellow}, green={green}")]
    InvalidDuration { red: i64, yellow: i64, green: i64 },

    #[error("Lane must be between 0 and {}, received {lane}", .lane_count.saturating_sub(1))]
    InvalidLane { lane: usize, lane_count: usize },

    /// `crossing` and `lane` are 1-based ordinals
    #[error("{vehicle_id} - access denied: crossing {crossing} does not exist on lane {lane}")]
    NoSuchCrossing {
        vehicle_id: String,
        crossing: usize,
        lane: usize,
    },

    #[error("No vehicle at index {index} ({len} vehicles)")]
    VehicleIndexOutOfRange { index: usize, len: usize },

    #[error("No signal at index {index} ({len} signals)")]
    SignalIndexOutOfRange { index: usize, len: usize },
}
