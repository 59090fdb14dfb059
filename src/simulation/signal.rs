//! Traffic signal logic for the lane simulation
//!
//! A signal cycles Red -> Yellow -> Green -> Red, one phase per step. Every
//! signal lives in a `SignalRegistry` owned by the orchestrator; the registry
//! only ever grows and lists signals in construction order.

use std::fmt;

use log::{debug, info, warn};

use super::error::SimError;
use super::types::{
    SignalId, SignalPhase, SimId, DEFAULT_GREEN_SECS, DEFAULT_RED_SECS, DEFAULT_YELLOW_SECS,
};

/// Duration of each phase in seconds, all strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    red: u32,
    yellow: u32,
    green: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            red: DEFAULT_RED_SECS,
            yellow: DEFAULT_YELLOW_SECS,
            green: DEFAULT_GREEN_SECS,
        }
    }
}

impl PhaseDurations {
    /// Validate a full set of durations
    /// Fails with `InvalidDuration` if any value is zero or negative
    pub fn new(red: i64, yellow: i64, green: i64) -> Result<Self, SimError> {
        let invalid = || SimError::InvalidDuration { red, yellow, green };
        let positive = |secs: i64| u32::try_from(secs).ok().filter(|s| *s > 0);

        Ok(Self {
            red: positive(red).ok_or_else(invalid)?,
            yellow: positive(yellow).ok_or_else(invalid)?,
            green: positive(green).ok_or_else(invalid)?,
        })
    }

    pub fn get(&self, phase: SignalPhase) -> u32 {
        match phase {
            SignalPhase::Red => self.red,
            SignalPhase::Yellow => self.yellow,
            SignalPhase::Green => self.green,
        }
    }
}

/// Status line for one signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalStatus {
    pub id: String,
    pub phase: SignalPhase,
    pub duration: u32,
}

impl fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal {}: {} ({}s)", self.id, self.phase, self.duration)
    }
}

/// A traffic signal in the lane simulation
#[derive(Debug, Clone)]
pub struct SimSignal {
    id: String,
    phase: SignalPhase,
    durations: PhaseDurations,
}

impl SimSignal {
    /// Create a signal in the Red phase with default durations
    pub fn new(id: impl Into<String>) -> Result<Self, SimError> {
        let id = id.into();
        if id.is_empty() {
            return Err(SimError::InvalidIdentifier);
        }

        Ok(Self {
            id,
            phase: SignalPhase::Red,
            durations: PhaseDurations::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Move to the next phase, wrapping after Green
    pub fn advance(&mut self) {
        self.phase = self.phase.next();
        debug!("Signal {} -> {}", self.id, self.phase);
    }

    /// Replace all three durations, or none of them
    pub fn reconfigure_durations(
        &mut self,
        red: i64,
        yellow: i64,
        green: i64,
    ) -> Result<(), SimError> {
        match PhaseDurations::new(red, yellow, green) {
            Ok(durations) => {
                self.durations = durations;
                Ok(())
            }
            Err(e) => {
                warn!("Rejected durations for signal {}: {}", self.id, e);
                Err(e)
            }
        }
    }

    pub fn current_state(&self) -> SignalPhase {
        self.phase
    }

    pub fn current_duration(&self) -> u32 {
        self.durations.get(self.phase)
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn status(&self) -> SignalStatus {
        SignalStatus {
            id: self.id.clone(),
            phase: self.phase,
            duration: self.current_duration(),
        }
    }
}

/// Append-only registry of every signal constructed during a run
///
/// Single-threaded: the orchestrator owns the registry outright. Sharing it
/// across threads would need a lock around both `register` and iteration.
#[derive(Debug, Clone, Default)]
pub struct SignalRegistry {
    signals: Vec<SimSignal>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a signal and append it to the registry
    /// The returned id confirms registration
    pub fn register(&mut self, id: impl Into<String>) -> Result<SignalId, SimError> {
        let signal = SimSignal::new(id)?;
        let handle = SignalId(SimId(self.signals.len()));
        info!("Registered signal {} (#{})", signal.id(), handle.0 .0);
        self.signals.push(signal);
        Ok(handle)
    }

    pub fn get(&self, id: SignalId) -> Option<&SimSignal> {
        self.signals.get(id.0 .0)
    }

    pub fn get_mut(&mut self, id: SignalId) -> Option<&mut SimSignal> {
        self.signals.get_mut(id.0 .0)
    }

    /// Look up a signal by its position in construction order
    pub fn by_index_mut(&mut self, index: usize) -> Result<&mut SimSignal, SimError> {
        let len = self.signals.len();
        self.signals
            .get_mut(index)
            .ok_or(SimError::SignalIndexOutOfRange { index, len })
    }

    /// Advance every registered signal by one phase
    pub fn advance_all(&mut self) {
        for signal in &mut self.signals {
            signal.advance();
        }
    }

    /// Status of every signal ever registered, in construction order
    pub fn list_all(&self) -> Vec<SignalStatus> {
        self.signals.iter().map(SimSignal::status).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimSignal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
