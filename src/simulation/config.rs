//! Run configuration for the lane simulation

use anyhow::{ensure, Result};

use super::types::TIME_INTERVAL;

/// Length of a default run in simulated seconds
pub const DEFAULT_RUN_SECS: u32 = 300;

/// Steps reported as one simulated minute
pub const DEFAULT_STEPS_PER_MINUTE: u32 = 12;

/// Parameters for a fixed-length run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of steps to run
    pub steps: u32,
    /// A minute marker is emitted every this many steps
    pub steps_per_minute: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            steps: (DEFAULT_RUN_SECS as f64 / TIME_INTERVAL) as u32,
            steps_per_minute: DEFAULT_STEPS_PER_MINUTE,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.steps_per_minute > 0, "steps per minute must be positive");
        Ok(())
    }
}
