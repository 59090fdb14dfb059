//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the vehicle fleet, the signal registry and the tracked
//! intersection checkers, and drives them on a discrete step counter. It never
//! prints on its own during a run; everything worth showing comes back as a
//! `SimEvent`.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use ordered_float::OrderedFloat;

use super::config::SimConfig;
use super::error::SimError;
use super::intersection::{CheckerStatus, IntersectionChecker, RoadLayout};
use super::signal::{SignalRegistry, SignalStatus};
use super::types::{SignalId, VehicleKind};
use super::vehicle::{SimVehicle, VehicleSnapshot, VehicleStepResult};

/// Something the caller should show while a run is in progress
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A vehicle reported its state on its second step
    Snapshot(VehicleSnapshot),
    /// Another simulated minute has passed (1-based count)
    MinuteCompleted(u32),
}

/// One row of the vehicle listing
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleListing {
    pub index: usize,
    pub id: String,
    pub position: f64,
    pub lane: u8,
}

/// The main simulation world
pub struct SimWorld {
    /// Vehicles in insertion order
    pub vehicles: Vec<SimVehicle>,

    /// Every signal ever created
    pub signals: SignalRegistry,

    /// Crossing layout shared by all checkers
    pub layout: Arc<RoadLayout>,

    /// One checker per tracked vehicle
    pub checkers: Vec<IntersectionChecker>,

    /// Run parameters
    pub config: SimConfig,

    /// Steps taken so far
    pub step_count: u32,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self::with_layout(config, RoadLayout::reference())
    }

    pub fn with_layout(config: SimConfig, layout: RoadLayout) -> Self {
        Self {
            vehicles: Vec::new(),
            signals: SignalRegistry::new(),
            layout: Arc::new(layout),
            checkers: Vec::new(),
            config,
            step_count: 0,
        }
    }

    /// Add a vehicle to the end of the fleet and return its index
    pub fn add_vehicle(&mut self, id: impl Into<String>, kind: VehicleKind) -> usize {
        let vehicle = SimVehicle::new(id, kind);
        info!("Added {:?} {}", kind, vehicle.id());
        self.vehicles.push(vehicle);
        self.vehicles.len() - 1
    }

    /// Remove the vehicle at `index`, returning it
    pub fn remove_vehicle(&mut self, index: usize) -> Result<SimVehicle, SimError> {
        let len = self.vehicles.len();
        if index >= len {
            return Err(SimError::VehicleIndexOutOfRange { index, len });
        }
        let vehicle = self.vehicles.remove(index);
        info!("Removed vehicle {}", vehicle.id());
        Ok(vehicle)
    }

    pub fn list_vehicles(&self) -> Vec<VehicleListing> {
        self.vehicles
            .iter()
            .enumerate()
            .map(|(index, vehicle)| VehicleListing {
                index,
                id: vehicle.id().to_string(),
                position: vehicle.position().into_inner(),
                lane: vehicle.lane(),
            })
            .collect()
    }

    pub fn add_signal(&mut self, id: impl Into<String>) -> Result<SignalId, SimError> {
        self.signals.register(id)
    }

    /// Reconfigure the signal at `index` in construction order
    pub fn set_signal_durations(
        &mut self,
        index: usize,
        red: i64,
        yellow: i64,
        green: i64,
    ) -> Result<(), SimError> {
        self.signals
            .by_index_mut(index)?
            .reconfigure_durations(red, yellow, green)
    }

    /// Start tracking a vehicle's passage through the crossings
    pub fn track_vehicle(
        &mut self,
        vehicle_id: impl Into<String>,
        lane: usize,
    ) -> Result<(), SimError> {
        let checker = IntersectionChecker::new(vehicle_id, lane, Arc::clone(&self.layout))?;
        self.checkers.push(checker);
        Ok(())
    }

    /// Advance every vehicle, then every signal, by one step
    pub fn tick(&mut self) -> Vec<SimEvent> {
        self.step_count += 1;

        let mut events = Vec::new();
        for vehicle in &mut self.vehicles {
            if let VehicleStepResult::SnapshotDue(snapshot) = vehicle.step() {
                events.push(SimEvent::Snapshot(snapshot));
            }
        }
        self.signals.advance_all();

        if self.step_count.checked_rem(self.config.steps_per_minute) == Some(0) {
            events.push(SimEvent::MinuteCompleted(
                self.step_count / self.config.steps_per_minute,
            ));
        }
        events
    }

    /// Run the configured number of steps
    pub fn run(&mut self) -> Result<Vec<SimEvent>> {
        self.config.validate().context("Invalid run configuration")?;

        let mut events = Vec::new();
        for _ in 0..self.config.steps {
            events.extend(self.tick());
        }

        info!(
            "Run finished after {} steps: {} vehicles, {} signals",
            self.step_count,
            self.vehicles.len(),
            self.signals.len()
        );
        Ok(events)
    }

    /// Drive every tracked checker through all crossing indices
    ///
    /// Crossings are processed in increasing order, each one across every
    /// checker. Missing crossings are collected rather than stopping the
    /// survey.
    pub fn check_crossings(&mut self) -> Vec<SimError> {
        let mut failures = Vec::new();
        for _ in 0..self.layout.crossing_count() {
            for checker in &mut self.checkers {
                if checker.is_exhausted() {
                    continue;
                }
                if let Err(e) = checker.check_next() {
                    warn!("{}", e);
                    failures.push(e);
                }
            }
        }
        failures
    }

    pub fn vehicle_snapshots(&self) -> Vec<VehicleSnapshot> {
        self.vehicles.iter().map(SimVehicle::snapshot).collect()
    }

    pub fn signal_statuses(&self) -> Vec<SignalStatus> {
        self.signals.list_all()
    }

    pub fn checker_statuses(&self) -> Vec<CheckerStatus> {
        self.checkers
            .iter()
            .map(IntersectionChecker::status_report)
            .collect()
    }

    /// Vehicle ids ranked by distance travelled, furthest first
    pub fn ranking(&self) -> Vec<(&str, OrderedFloat<f64>)> {
        let mut ranked: Vec<_> = self
            .vehicles
            .iter()
            .map(|vehicle| (vehicle.id(), vehicle.position()))
            .collect();
        ranked.sort_by_key(|&(_, position)| std::cmp::Reverse(position));
        ranked
    }

    /// Create a world with one vehicle of each kind, two signals and a checker per lane
    pub fn create_test_world() -> Result<Self> {
        let mut world = SimWorld::new();
        world.add_vehicle("CAR-1", VehicleKind::Car);
        world.add_vehicle("TRUCK-1", VehicleKind::Truck);
        world.add_vehicle("BUS-1", VehicleKind::Bus);
        world.add_signal("A").context("Failed to add signal A")?;
        world.add_signal("B").context("Failed to add signal B")?;
        for lane in 0..world.layout.lane_count() {
            world
                .track_vehicle(format!("V{}", lane + 1), lane)
                .context("Failed to track vehicle")?;
        }
        Ok(world)
    }

    /// Print the state of the world
    pub fn print_summary(&self) {
        println!("=== Simulation Finished: Vehicle States ===");
        if self.vehicles.is_empty() {
            println!("No vehicles were added to the simulation.");
        } else {
            for snapshot in self.vehicle_snapshots() {
                println!("{}", snapshot);
            }
            println!("--- Distance Ranking ---");
            for (rank, (id, position)) in self.ranking().into_iter().enumerate() {
                println!("  {}. {} ({:.2})", rank + 1, id, position.into_inner());
            }
        }

        println!("=== Simulation Finished: Traffic Signal States ===");
        if self.signals.is_empty() {
            println!("No traffic signals were added to the simulation.");
        } else {
            for status in self.signal_statuses() {
                println!("{}", status);
            }
        }
    }
}
