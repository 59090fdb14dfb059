//! Vehicle movement logic for the lane simulation
//!
//! Each vehicle advances along a single position axis by a fixed distance per
//! step and rotates through the lane labels in order.

use std::fmt;

use log::debug;
use ordered_float::OrderedFloat;

use super::types::{VehicleKind, LANE_LABELS, TIME_INTERVAL};

/// Step on which a vehicle reports its own state
const SNAPSHOT_ON_MOVE: u32 = 2;

/// Result of a vehicle step indicating whether a status report is due
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleStepResult {
    Moved,                        // Vehicle moved, nothing to report
    SnapshotDue(VehicleSnapshot), // Second step: caller should show this snapshot
}

/// Read-only view of a vehicle's state
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSnapshot {
    pub id: String,
    pub lane: u8,
    pub position: f64,
    pub velocity: f64,
}

impl fmt::Display for VehicleSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vehicle {}: lane {}, current position {:.2}, velocity {:.2}",
            self.id, self.lane, self.position, self.velocity
        )
    }
}

/// A vehicle in the lane simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    id: String,
    pub kind: VehicleKind,
    /// Cumulative distance travelled
    position: OrderedFloat<f64>,
    /// Index into `LANE_LABELS`
    lane_index: usize,
    velocity: f64,
    move_count: u32,
}

impl SimVehicle {
    /// The id is taken as given; rejecting empty ids is left to the caller.
    pub fn new(id: impl Into<String>, kind: VehicleKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: OrderedFloat(0.0),
            lane_index: 0,
            velocity: Self::velocity_for(kind),
            move_count: 0,
        }
    }

    fn velocity_for(kind: VehicleKind) -> f64 {
        kind.speed() / TIME_INTERVAL
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current lane label
    pub fn lane(&self) -> u8 {
        LANE_LABELS[self.lane_index]
    }

    pub fn position(&self) -> OrderedFloat<f64> {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Advance one step
    /// Returns `SnapshotDue` on exactly the second call for this vehicle
    pub fn step(&mut self) -> VehicleStepResult {
        self.move_count += 1;

        // Recomputed every step so a variable speed can be slotted in here
        self.velocity = Self::velocity_for(self.kind);
        self.position += self.velocity * TIME_INTERVAL;

        // Snapshot is taken before the lane change, showing the lane just driven
        let result = if self.move_count == SNAPSHOT_ON_MOVE {
            VehicleStepResult::SnapshotDue(self.snapshot())
        } else {
            VehicleStepResult::Moved
        };

        self.change_lane();

        debug!(
            "Vehicle {} step {}: position={:.2}, lane={}",
            self.id,
            self.move_count,
            self.position.into_inner(),
            self.lane()
        );

        result
    }

    fn change_lane(&mut self) {
        self.lane_index = (self.lane_index + 1) % LANE_LABELS.len();
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            id: self.id.clone(),
            lane: self.lane(),
            position: self.position.into_inner(),
            velocity: self.velocity,
        }
    }
}
