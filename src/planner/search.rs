//! Lowest-cost plan search over fact states
//!
//! Small uniform-cost search: actions whose preconditions hold in a
//! hypothetical state are applied forward until the goal's conditions
//! are met. The action set is small enough that no heuristic or visited
//! set is needed; a depth cap plus a no-repeat rule bounds the frontier.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::facts::WorldState;
use crate::planner::action::{Action, ActionKind};
use crate::planner::goal::Goal;

/// Longest chain the search will consider
const MAX_PLAN_DEPTH: usize = 5;

/// A finished plan: the cheapest action chain reaching the goal
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub goal: &'static str,
    pub goal_priority: u32,
    pub steps: Vec<ActionKind>,
    pub total_cost: f32,
}

#[derive(Debug)]
struct Node {
    state: WorldState,
    steps: Vec<ActionKind>,
}

/// Search for the cheapest chain satisfying `goal` from `current`
///
/// `cost_of` folds in the designer multiplier and the difficulty
/// translation, so the search itself stays policy-free. Returns None
/// when the goal is unreachable with the given actions.
pub fn plan_for_goal(
    goal: &Goal,
    current: &WorldState,
    actions: &[Box<dyn Action>],
    cost_of: &dyn Fn(&dyn Action) -> f32,
) -> Option<Plan> {
    // Already satisfied: an empty plan would mean "do nothing", which the
    // executor treats as no plan at all.
    if goal.is_satisfied(current) {
        return None;
    }

    let mut frontier: BinaryHeap<(Reverse<OrderedFloat<f32>>, usize)> = BinaryHeap::new();
    let mut nodes: Vec<Node> = vec![Node {
        state: current.clone(),
        steps: Vec::new(),
    }];
    frontier.push((Reverse(OrderedFloat(0.0)), 0));

    while let Some((Reverse(OrderedFloat(cost)), idx)) = frontier.pop() {
        let (state, steps) = {
            let node = &nodes[idx];
            (node.state.clone(), node.steps.clone())
        };

        if goal.is_satisfied(&state) {
            return Some(Plan {
                goal: goal.name,
                goal_priority: goal.priority,
                steps,
                total_cost: cost,
            });
        }

        if steps.len() >= MAX_PLAN_DEPTH {
            continue;
        }

        for action in actions {
            // Effects are idempotent fact-setters; repeating a kind in
            // one chain can never help.
            if steps.contains(&action.kind()) {
                continue;
            }
            if !action.preconditions().iter().all(|c| c.is_met(&state)) {
                continue;
            }

            let mut next_state = state.clone();
            for (key, value) in action.effects() {
                next_state.set(*key, *value);
            }
            let mut next_steps = steps.clone();
            next_steps.push(action.kind());
            let next_cost = cost + cost_of(action.as_ref()).max(0.0);

            let next_idx = nodes.len();
            nodes.push(Node { state: next_state, steps: next_steps });
            frontier.push((Reverse(OrderedFloat(next_cost)), next_idx));
        }
    }

    None
}

/// Pick the highest-priority active, unsatisfied goal that has a plan
pub fn select_plan(
    goals: &[Goal],
    current: &WorldState,
    actions: &[Box<dyn Action>],
    cost_of: &dyn Fn(&dyn Action) -> f32,
) -> Option<Plan> {
    let mut ordered: Vec<&Goal> = goals.iter().collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

    for goal in ordered {
        if !goal.is_active(current) || goal.is_satisfied(current) {
            continue;
        }
        if let Some(plan) = plan_for_goal(goal, current, actions, cost_of) {
            tracing::debug!(goal = plan.goal, steps = ?plan.steps, cost = plan.total_cost, "plan selected");
            return Some(plan);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{FactKey, FactValue};
    use crate::facts::target::TargetKind;
    use crate::planner::action::{ActionStatus, ExecContext, Invocation};
    use crate::planner::goal::Condition;

    /// Minimal test action: pure preconditions/effects, no execution
    struct Stub {
        kind: ActionKind,
        cost: f32,
        pre: Vec<Condition>,
        eff: Vec<(FactKey, FactValue)>,
    }

    impl Action for Stub {
        fn kind(&self) -> ActionKind {
            self.kind
        }
        fn base_cost(&self) -> f32 {
            self.cost
        }
        fn preconditions(&self) -> &[Condition] {
            &self.pre
        }
        fn effects(&self) -> &[(FactKey, FactValue)] {
            &self.eff
        }
        fn target_kind(&self) -> TargetKind {
            TargetKind::None
        }
        fn perform(&self, _inv: &mut Invocation, _ctx: &mut ExecContext) -> ActionStatus {
            ActionStatus::Completed
        }
    }

    fn stub(
        kind: ActionKind,
        cost: f32,
        pre: Vec<Condition>,
        eff: Vec<(FactKey, FactValue)>,
    ) -> Box<dyn Action> {
        Box::new(Stub { kind, cost, pre, eff })
    }

    fn base_cost(action: &dyn Action) -> f32 {
        action.base_cost()
    }

    #[test]
    fn test_two_step_chain() {
        let actions = vec![
            stub(
                ActionKind::Pursue,
                2.0,
                vec![Condition::is(FactKey::PlayerSpotted, true)],
                vec![(FactKey::PlayerInCaptureRange, FactValue::Bool(true))],
            ),
            stub(
                ActionKind::Capture,
                1.0,
                vec![Condition::is(FactKey::PlayerInCaptureRange, true)],
                vec![(FactKey::PlayerCaptured, FactValue::Bool(true))],
            ),
        ];
        let goal = Goal::new("hunt", 100).desiring(Condition::is(FactKey::PlayerCaptured, true));

        let mut ws = WorldState::new();
        ws.set(FactKey::PlayerSpotted, true);

        let plan = plan_for_goal(&goal, &ws, &actions, &base_cost).unwrap();
        assert_eq!(plan.steps, vec![ActionKind::Pursue, ActionKind::Capture]);
        assert_eq!(plan.total_cost, 3.0);
    }

    #[test]
    fn test_cheaper_chain_wins() {
        // Two routes to the same fact; the planner must take the cheap one
        let actions = vec![
            stub(
                ActionKind::InvestigateAlert,
                5.0,
                vec![],
                vec![(FactKey::AtInvestigationPoint, FactValue::Bool(true))],
            ),
            stub(
                ActionKind::InvestigateNoise,
                1.0,
                vec![],
                vec![(FactKey::AtInvestigationPoint, FactValue::Bool(true))],
            ),
        ];
        let goal = Goal::new("go", 50).desiring(Condition::is(FactKey::AtInvestigationPoint, true));
        let plan = plan_for_goal(&goal, &WorldState::new(), &actions, &base_cost).unwrap();
        assert_eq!(plan.steps, vec![ActionKind::InvestigateNoise]);
    }

    #[test]
    fn test_unreachable_goal_yields_none() {
        let actions = vec![stub(
            ActionKind::Capture,
            1.0,
            vec![Condition::is(FactKey::PlayerInCaptureRange, true)],
            vec![(FactKey::PlayerCaptured, FactValue::Bool(true))],
        )];
        let goal = Goal::new("hunt", 100).desiring(Condition::is(FactKey::PlayerCaptured, true));
        assert!(plan_for_goal(&goal, &WorldState::new(), &actions, &base_cost).is_none());
    }

    #[test]
    fn test_satisfied_goal_yields_none() {
        let goal = Goal::new("idle", 10).desiring(Condition::is(FactKey::OnPatrol, true));
        let mut ws = WorldState::new();
        ws.set(FactKey::OnPatrol, true);
        assert!(plan_for_goal(&goal, &ws, &[], &base_cost).is_none());
    }

    #[test]
    fn test_select_plan_prefers_priority() {
        let actions = vec![
            stub(
                ActionKind::Patrol,
                1.0,
                vec![],
                vec![(FactKey::OnPatrol, FactValue::Bool(true))],
            ),
            stub(
                ActionKind::Recharge,
                1.0,
                vec![Condition::is(FactKey::EnergyDepleted, true)],
                vec![(FactKey::EnergyFull, FactValue::Bool(true))],
            ),
        ];
        let goals = vec![
            Goal::new("hold_patrol", 10).desiring(Condition::is(FactKey::OnPatrol, true)),
            Goal::new("stay_charged", 90)
                .activated_by(Condition::is(FactKey::EnergyDepleted, true))
                .desiring(Condition::is(FactKey::EnergyFull, true)),
        ];

        let mut ws = WorldState::new();
        ws.set(FactKey::EnergyDepleted, true);

        let plan = select_plan(&goals, &ws, &actions, &base_cost).unwrap();
        assert_eq!(plan.goal, "stay_charged");

        // Without the depleted fact the recharge goal is inactive
        let plan = select_plan(&goals, &WorldState::new(), &actions, &base_cost).unwrap();
        assert_eq!(plan.goal, "hold_patrol");
    }
}
