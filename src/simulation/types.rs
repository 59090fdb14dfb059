//! Core types for the lane simulation
//!
//! Identifiers, fixed constants and the small enums shared by the vehicle,
//! signal and intersection models.

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for signal IDs handed out by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(pub SimId);

/// Length of one discrete step in seconds
pub const TIME_INTERVAL: f64 = 5.0;

/// Lane labels a vehicle cycles through, in order
pub const LANE_LABELS: [u8; 3] = [1, 2, 3];

/// Default phase durations in seconds (red, yellow, green)
pub const DEFAULT_RED_SECS: u32 = 10;
pub const DEFAULT_YELLOW_SECS: u32 = 2;
pub const DEFAULT_GREEN_SECS: u32 = 15;

/// Reference road layout used by the intersection checker
pub const LANE_COUNT: usize = 3;
pub const CROSSING_COUNT: usize = 10;

/// Speed class of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    /// Ordinary passenger car
    Car,
    /// Heavy goods vehicle
    Truck,
    /// Transit bus
    Bus,
}

impl VehicleKind {
    /// Distance covered per time interval
    pub const fn speed(self) -> f64 {
        match self {
            VehicleKind::Car => 100.0,
            VehicleKind::Truck => 90.0,
            VehicleKind::Bus => 80.0,
        }
    }

    /// Prefix used when generating vehicle ids
    pub const fn id_prefix(self) -> &'static str {
        match self {
            VehicleKind::Car => "CAR",
            VehicleKind::Truck => "TRUCK",
            VehicleKind::Bus => "BUS",
        }
    }
}

/// One of the three timed phases of a traffic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalPhase {
    Red,
    Yellow,
    Green,
}

impl SignalPhase {
    /// Phases in cycle order
    pub const CYCLE: [SignalPhase; 3] = [SignalPhase::Red, SignalPhase::Yellow, SignalPhase::Green];

    /// Position of this phase within the cycle
    pub const fn index(self) -> usize {
        match self {
            SignalPhase::Red => 0,
            SignalPhase::Yellow => 1,
            SignalPhase::Green => 2,
        }
    }

    /// The phase that follows this one
    pub const fn next(self) -> SignalPhase {
        Self::CYCLE[(self.index() + 1) % Self::CYCLE.len()]
    }
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalPhase::Red => "red",
            SignalPhase::Yellow => "yellow",
            SignalPhase::Green => "green",
        };
        f.write_str(name)
    }
}
