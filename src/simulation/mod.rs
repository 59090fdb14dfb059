//! Standalone lane simulation module
//!
//! This module contains the simulation core: vehicle motion, traffic signal
//! phases and intersection legality checks, plus the `SimWorld` driver that
//! steps them. Nothing here prints during a run.

mod config;
mod error;
mod intersection;
mod signal;
mod types;
mod vehicle;
mod world;

pub use config::{SimConfig, DEFAULT_RUN_SECS, DEFAULT_STEPS_PER_MINUTE};
pub use error::SimError;
pub use intersection::{CheckerStatus, CrossingOutcome, IntersectionChecker, RoadLayout};
pub use signal::{PhaseDurations, SignalRegistry, SignalStatus, SimSignal};
pub use types::{
    SignalId, SignalPhase, SimId, VehicleKind, CROSSING_COUNT, DEFAULT_GREEN_SECS,
    DEFAULT_RED_SECS, DEFAULT_YELLOW_SECS, LANE_COUNT, LANE_LABELS, TIME_INTERVAL,
};
pub use vehicle::{SimVehicle, VehicleSnapshot, VehicleStepResult};
pub use world::{SimEvent, SimWorld, VehicleListing};
