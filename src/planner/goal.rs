//! Goals: desired partial world-states with priority

use crate::facts::{FactKey, FactValue, WorldState};

/// How a condition compares the observed fact against its reference value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One (fact, comparator, value) requirement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub key: FactKey,
    pub comparator: Comparator,
    pub value: FactValue,
}

impl Condition {
    pub fn new(key: FactKey, comparator: Comparator, value: impl Into<FactValue>) -> Self {
        Self { key, comparator, value: value.into() }
    }

    /// Shorthand for the common boolean-equals case
    pub fn is(key: FactKey, value: bool) -> Self {
        Self::new(key, Comparator::Eq, value)
    }

    pub fn is_met(&self, state: &WorldState) -> bool {
        let observed = state.get_or_false(self.key);
        match self.comparator {
            Comparator::Eq => match (observed, self.value) {
                (FactValue::Bool(a), FactValue::Bool(b)) => a == b,
                (a, b) => (a.as_f32() - b.as_f32()).abs() < f32::EPSILON,
            },
            Comparator::Ne => match (observed, self.value) {
                (FactValue::Bool(a), FactValue::Bool(b)) => a != b,
                (a, b) => (a.as_f32() - b.as_f32()).abs() >= f32::EPSILON,
            },
            Comparator::Lt => observed.as_f32() < self.value.as_f32(),
            Comparator::Le => observed.as_f32() <= self.value.as_f32(),
            Comparator::Gt => observed.as_f32() > self.value.as_f32(),
            Comparator::Ge => observed.as_f32() >= self.value.as_f32(),
        }
    }
}

/// A named desired state with priority
///
/// `activation` gates when the goal is considered at all (a recharge
/// goal only matters once energy is empty); `conditions` is the state
/// the plan must reach. Higher priority wins when several goals are
/// live.
#[derive(Debug, Clone)]
pub struct Goal {
    pub name: &'static str,
    pub priority: u32,
    pub activation: Vec<Condition>,
    pub conditions: Vec<Condition>,
}

impl Goal {
    pub fn new(name: &'static str, priority: u32) -> Self {
        Self { name, priority, activation: Vec::new(), conditions: Vec::new() }
    }

    pub fn activated_by(mut self, condition: Condition) -> Self {
        self.activation.push(condition);
        self
    }

    pub fn desiring(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Whether the goal should compete for a plan this tick
    pub fn is_active(&self, state: &WorldState) -> bool {
        self.activation.iter().all(|c| c.is_met(state))
    }

    /// Whether the desired state already holds
    pub fn is_satisfied(&self, state: &WorldState) -> bool {
        self.conditions.iter().all(|c| c.is_met(state))
    }
}

/// The standing guard goal set, highest priority first
pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::new("hunt_intruder", 100)
            .activated_by(Condition::is(FactKey::PlayerSpotted, true))
            .desiring(Condition::is(FactKey::PlayerCaptured, true)),
        Goal::new("stay_charged", 90)
            .activated_by(Condition::is(FactKey::EnergyDepleted, true))
            .desiring(Condition::is(FactKey::EnergyFull, true)),
        Goal::new("respond_to_alert", 80)
            .activated_by(Condition::is(FactKey::AlertActive, true))
            .desiring(Condition::is(FactKey::AlertHandled, true)),
        // Lost sight mid-hunt: sweep the remembered position before
        // giving the trail up
        Goal::new("sweep_lost_trail", 70)
            .activated_by(Condition::is(FactKey::PlayerInMemory, true))
            .activated_by(Condition::is(FactKey::PlayerSpotted, false))
            .desiring(Condition::is(FactKey::AreaSearched, true)),
        Goal::new("investigate_noise", 60)
            .activated_by(Condition::is(FactKey::NoiseHeard, true))
            .desiring(Condition::is(FactKey::NoiseInvestigated, true)),
        Goal::new("hold_patrol", 10).desiring(Condition::is(FactKey::OnPatrol, true)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_condition() {
        let mut ws = WorldState::new();
        ws.set(FactKey::PlayerSpotted, true);
        assert!(Condition::is(FactKey::PlayerSpotted, true).is_met(&ws));
        assert!(!Condition::is(FactKey::PlayerSpotted, false).is_met(&ws));
    }

    #[test]
    fn test_numeric_comparators() {
        let mut ws = WorldState::new();
        ws.set(FactKey::EnergyLevel, 0.3f32);
        assert!(Condition::new(FactKey::EnergyLevel, Comparator::Lt, 0.5f32).is_met(&ws));
        assert!(Condition::new(FactKey::EnergyLevel, Comparator::Ge, 0.3f32).is_met(&ws));
        assert!(!Condition::new(FactKey::EnergyLevel, Comparator::Gt, 0.3f32).is_met(&ws));
    }

    #[test]
    fn test_goal_activation_gates() {
        let goal = Goal::new("stay_charged", 90)
            .activated_by(Condition::is(FactKey::EnergyDepleted, true))
            .desiring(Condition::is(FactKey::EnergyFull, true));

        let mut ws = WorldState::new();
        assert!(!goal.is_active(&ws));
        ws.set(FactKey::EnergyDepleted, true);
        assert!(goal.is_active(&ws));
        assert!(!goal.is_satisfied(&ws));
    }

    #[test]
    fn test_lost_trail_goal_needs_memory_without_sight() {
        let goal = default_goals()
            .into_iter()
            .find(|g| g.name == "sweep_lost_trail")
            .unwrap();

        let mut ws = WorldState::new();
        ws.set(FactKey::PlayerInMemory, true);
        ws.set(FactKey::PlayerSpotted, true);
        // Still in sight: pursuit owns the situation
        assert!(!goal.is_active(&ws));

        ws.set(FactKey::PlayerSpotted, false);
        assert!(goal.is_active(&ws));
        assert!(!goal.is_satisfied(&ws));
    }

    #[test]
    fn test_default_goals_ordered_by_priority() {
        let goals = default_goals();
        for pair in goals.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }
}
