//! Lane Simulation Library
//!
//! A discrete-step model of a multi-lane road: vehicles, traffic signals and
//! per-vehicle intersection checks. Runs headless from the `lane_sim` binary.

pub mod simulation;
