//! World facts - the planner's view of everything a guard knows

pub mod sensors;
pub mod target;

pub use sensors::{SenseContext, Sensor, SensorSuite};
pub use target::{resolve_target, Target, TargetKind};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Named observations a sensor can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKey {
    // Player knowledge
    PlayerSpotted,
    PlayerInCaptureRange,
    PlayerCaptured,
    PlayerInMemory,
    // Alerts
    AlertActive,
    AlertHandled,
    NoiseHeard,
    NoiseInvestigated,
    AtInvestigationPoint,
    AreaSearched,
    // Energy
    EnergyDepleted,
    EnergyFull,
    EnergyLevel,
    // Patrol
    AtPatrolPost,
    OnPatrol,
    // Meters exposed for conditions and UI
    DetectionCharge,
}

/// A fact's value: boolean flags plus numeric meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    Float(f32),
}

impl FactValue {
    pub fn as_bool(&self) -> bool {
        match self {
            FactValue::Bool(b) => *b,
            FactValue::Int(i) => *i != 0,
            FactValue::Float(f) => *f != 0.0,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            FactValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FactValue::Int(i) => *i as f32,
            FactValue::Float(f) => *f,
        }
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

impl From<f32> for FactValue {
    fn from(f: f32) -> Self {
        FactValue::Float(f)
    }
}

impl From<i64> for FactValue {
    fn from(i: i64) -> Self {
        FactValue::Int(i)
    }
}

/// Snapshot of everything the agent currently believes
///
/// Rebuilt from scratch by the sensor suite every planning tick. Nothing
/// is ever patched incrementally, so stale values cannot leak across
/// ticks.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    facts: AHashMap<FactKey, FactValue>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FactKey, value: impl Into<FactValue>) {
        self.facts.insert(key, value.into());
    }

    pub fn get(&self, key: FactKey) -> Option<FactValue> {
        self.facts.get(&key).copied()
    }

    /// Missing facts read as false; sensors write the full key set each
    /// tick, so this only matters for hypothetical planner states.
    pub fn get_or_false(&self, key: FactKey) -> FactValue {
        self.facts.get(&key).copied().unwrap_or(FactValue::Bool(false))
    }

    pub fn truthy(&self, key: FactKey) -> bool {
        self.get_or_false(key).as_bool()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
