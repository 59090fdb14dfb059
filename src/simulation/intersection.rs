//! Intersection legality checks for the lane simulation
//!
//! A `RoadLayout` records which (lane, crossing) pairs hold a crossing. Each
//! tracked vehicle gets an `IntersectionChecker` that walks the crossings in
//! order, attempting every other one, and keeps a log of what happened.
//!
//! Lanes and crossings are 0-based internally and 1-based in all text.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::error::SimError;
use super::types::{CROSSING_COUNT, LANE_COUNT};

/// Which lanes have a crossing at each crossing index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadLayout {
    /// `crossings[lane][index]`
    crossings: Vec<Vec<bool>>,
    crossing_count: usize,
}

impl Default for RoadLayout {
    fn default() -> Self {
        Self::reference()
    }
}

impl RoadLayout {
    /// Build a layout from per-lane crossing flags
    /// Every lane must list the same number of crossings
    pub fn new(crossings: Vec<Vec<bool>>) -> anyhow::Result<Self> {
        anyhow::ensure!(!crossings.is_empty(), "Road layout needs at least one lane");
        let crossing_count = crossings[0].len();
        anyhow::ensure!(
            crossings.iter().all(|lane| lane.len() == crossing_count),
            "Every lane must have {} crossing entries",
            crossing_count
        );
        Ok(Self {
            crossings,
            crossing_count,
        })
    }

    /// Three lanes, ten crossings; crossings on the outer lanes only
    pub fn reference() -> Self {
        let crossings = (0..LANE_COUNT)
            .map(|lane| vec![lane != 1; CROSSING_COUNT])
            .collect();
        Self {
            crossings,
            crossing_count: CROSSING_COUNT,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.crossings.len()
    }

    pub fn crossing_count(&self) -> usize {
        self.crossing_count
    }

    pub fn crossing_exists(&self, lane: usize, crossing: usize) -> bool {
        self.crossings
            .get(lane)
            .and_then(|row| row.get(crossing))
            .copied()
            .unwrap_or(false)
    }
}

/// Result of a successful `check_next`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingOutcome {
    Passed,    // Crossing attempted and present
    Skipped,   // Intent pattern says skip this one
    Completed, // Nothing left to check
}

/// Tracks one vehicle's progress through the crossings of its lane
#[derive(Debug, Clone)]
pub struct IntersectionChecker {
    vehicle_id: String,
    lane: usize,
    layout: Arc<RoadLayout>,
    /// `true` where the vehicle tries to use the crossing
    intent: Vec<bool>,
    /// Next crossing index to process
    cursor: usize,
    log: Vec<String>,
    completion_logged: bool,
}

impl IntersectionChecker {
    pub fn new(
        vehicle_id: impl Into<String>,
        lane: usize,
        layout: Arc<RoadLayout>,
    ) -> Result<Self, SimError> {
        let lane_count = layout.lane_count();
        if lane >= lane_count {
            return Err(SimError::InvalidLane { lane, lane_count });
        }

        // Attempt crossings 0, 2, 4, ... and skip the odd ones
        let intent = (0..layout.crossing_count()).map(|i| i % 2 == 0).collect();

        Ok(Self {
            vehicle_id: vehicle_id.into(),
            lane,
            layout,
            intent,
            cursor: 0,
            log: Vec::new(),
            completion_logged: false,
        })
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn intent(&self) -> &[bool] {
        &self.intent
    }

    /// Next crossing index, or `None` once every crossing has been processed
    pub fn next_crossing(&self) -> Option<usize> {
        (self.cursor < self.intent.len()).then_some(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_crossing().is_none()
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Process the crossing under the cursor
    ///
    /// A missing crossing is logged and still consumed; the error is returned
    /// after the cursor has moved on.
    pub fn check_next(&mut self) -> Result<CrossingOutcome, SimError> {
        let Some(crossing) = self.next_crossing() else {
            if !self.completion_logged {
                self.log
                    .push(format!("{}: All crossings processed.", self.vehicle_id));
                self.completion_logged = true;
            }
            return Ok(CrossingOutcome::Completed);
        };

        let prefix = format!(
            "{} at crossing {} on lane {}: ",
            self.vehicle_id,
            crossing + 1,
            self.lane + 1
        );
        self.cursor += 1;

        if !self.intent[crossing] {
            self.log.push(prefix + "Skipped as per intent pattern.");
            return Ok(CrossingOutcome::Skipped);
        }

        if self.layout.crossing_exists(self.lane, crossing) {
            debug!("{} passed crossing {}", self.vehicle_id, crossing + 1);
            self.log.push(prefix + "Successfully passed.");
            Ok(CrossingOutcome::Passed)
        } else {
            self.log
                .push(prefix + "Attempted to pass a non-existent crossing.");
            Err(SimError::NoSuchCrossing {
                vehicle_id: self.vehicle_id.clone(),
                crossing: crossing + 1,
                lane: self.lane + 1,
            })
        }
    }

    pub fn status_report(&self) -> CheckerStatus {
        CheckerStatus {
            vehicle_id: self.vehicle_id.clone(),
            lane: self.lane,
            intent: self.intent.clone(),
            next_crossing: self.next_crossing(),
            log: self.log.clone(),
        }
    }
}

/// Snapshot of a checker, rendered as a multi-line block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerStatus {
    pub vehicle_id: String,
    /// 0-based lane index
    pub lane: usize,
    pub intent: Vec<bool>,
    /// 0-based; `None` when completed
    pub next_crossing: Option<usize>,
    pub log: Vec<String>,
}

impl fmt::Display for CheckerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- Crossing Status for: {} -----", self.vehicle_id)?;
        writeln!(f, "Lane: {}", self.lane + 1)?;

        let pattern: Vec<&str> = self
            .intent
            .iter()
            .map(|&attempt| if attempt { "1" } else { "0" })
            .collect();
        writeln!(f, "Intent Pattern: [{}]", pattern.join(", "))?;

        match self.next_crossing {
            Some(crossing) => writeln!(f, "Next Crossing: {}", crossing + 1)?,
            None => writeln!(f, "Next Crossing: completed")?,
        }

        writeln!(f, "Activity Log:")?;
        if self.log.is_empty() {
            writeln!(f, "  No activity recorded yet.")?;
        }
        for entry in &self.log {
            writeln!(f, "  {}", entry)?;
        }
        write!(f, "----------------------")
    }
}
