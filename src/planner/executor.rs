//! Plan execution state machine
//!
//! Exactly one action executes per agent at a time. Every tick the
//! current action is re-validated against the fresh world state, its
//! target is re-resolved, and `perform` runs once. `on_end` always runs
//! before another action starts, so exclusive state (paused perception,
//! halted movement, claimed alerts) is released deterministically.

use crate::facts::target::{resolve_target, TargetKind, TargetView};
use crate::facts::WorldState;
use crate::planner::action::{Action, ActionKind, ActionStatus, ExecContext, Invocation};
use crate::planner::catalog::ActionCatalog;
use crate::planner::goal::Goal;
use crate::planner::search::{plan_for_goal, select_plan, Plan};

#[derive(Debug)]
pub struct PlanExecutor {
    goals: Vec<Goal>,
    plan: Option<Plan>,
    step_index: usize,
    invocation: Invocation,
    started: bool,
}

impl PlanExecutor {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self {
            goals,
            plan: None,
            step_index: 0,
            invocation: Invocation::fresh(),
            started: false,
        }
    }

    /// Kind of the action executing right now, if any
    pub fn current_kind(&self) -> Option<ActionKind> {
        let plan = self.plan.as_ref()?;
        plan.steps.get(self.step_index).copied()
    }

    pub fn current_goal(&self) -> Option<&'static str> {
        self.plan.as_ref().map(|p| p.goal)
    }

    /// Replace the standing goal set (external request/withdraw)
    pub fn set_goals(&mut self, goals: Vec<Goal>) {
        self.goals = goals;
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Drop any in-flight plan without running `on_end`
    ///
    /// Only for full agent resets, where the surrounding state is being
    /// rebuilt anyway; mid-run interruption goes through `tick`.
    pub fn hard_reset(&mut self) {
        self.plan = None;
        self.step_index = 0;
        self.invocation = Invocation::fresh();
        self.started = false;
    }

    /// One planning/execution tick
    pub fn tick(&mut self, state: &WorldState, catalog: &ActionCatalog, ctx: &mut ExecContext) {
        let cost_mult = ctx.config.action_costs.clone();
        let difficulty_cost = ctx.action_cost_mult;
        let cost_of = move |action: &dyn Action| {
            action.base_cost() * cost_mult.multiplier(action.kind()) * difficulty_cost
        };

        // A strictly higher-priority goal that became satisfiable preempts
        // the current plan.
        if let Some(current_priority) = self.plan.as_ref().map(|p| p.goal_priority) {
            let preempt = self
                .goals
                .iter()
                .filter(|g| g.priority > current_priority)
                .filter(|g| g.is_active(state) && !g.is_satisfied(state))
                .find_map(|g| plan_for_goal(g, state, catalog.actions(), &cost_of));
            if let Some(new_plan) = preempt {
                tracing::debug!(agent = ?ctx.agent_id, to = new_plan.goal, "plan preempted");
                self.interrupt_current(catalog, ctx);
                self.install_plan(new_plan);
            }
        }

        if self.plan.is_none() {
            match select_plan(&self.goals, state, catalog.actions(), &cost_of) {
                Some(plan) => self.install_plan(plan),
                None => return,
            }
        }

        let Some(kind) = self.current_kind() else {
            self.plan = None;
            return;
        };
        let Some(action) = catalog.get(kind) else {
            tracing::warn!(?kind, "plan references unknown action, dropping plan");
            self.plan = None;
            return;
        };

        // Re-validate preconditions against this tick's facts
        if !action.preconditions().iter().all(|c| c.is_met(state)) {
            tracing::debug!(agent = ?ctx.agent_id, ?kind, "preconditions invalidated");
            self.interrupt_current(catalog, ctx);
            return;
        }

        // Re-resolve the spatial argument every tick
        if action.target_kind() != TargetKind::None {
            let view = build_target_view(ctx);
            match resolve_target(action.target_kind(), &view) {
                Ok(target) => self.invocation.target = Some(target),
                Err(err) => {
                    tracing::debug!(agent = ?ctx.agent_id, ?kind, %err, "target resolution failed");
                    self.interrupt_current(catalog, ctx);
                    return;
                }
            }
        }

        if !self.started {
            let target = self.invocation.target;
            self.invocation = Invocation::fresh();
            self.invocation.target = target;
            action.on_start(&mut self.invocation, ctx);
            self.started = true;
        }

        self.invocation.elapsed += ctx.dt;
        match action.perform(&mut self.invocation, ctx) {
            ActionStatus::Continue => {}
            ActionStatus::Completed => {
                self.invocation.completed_normally = true;
                action.on_complete(&mut self.invocation, ctx);
                action.on_end(&mut self.invocation, ctx);
                self.started = false;
                self.invocation = Invocation::fresh();
                self.step_index += 1;
                let finished = self
                    .plan
                    .as_ref()
                    .map(|p| self.step_index >= p.steps.len())
                    .unwrap_or(true);
                if finished {
                    self.plan = None;
                    self.step_index = 0;
                }
            }
            ActionStatus::Stop => {
                self.invocation.completed_normally = false;
                action.on_end(&mut self.invocation, ctx);
                self.clear_execution();
            }
        }
    }

    fn install_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
        self.step_index = 0;
        self.started = false;
        self.invocation = Invocation::fresh();
    }

    /// End the in-flight action (if any) and drop the plan
    fn interrupt_current(&mut self, catalog: &ActionCatalog, ctx: &mut ExecContext) {
        if self.started {
            if let Some(action) = self.current_kind().and_then(|k| catalog.get(k)) {
                self.invocation.completed_normally = false;
                action.on_end(&mut self.invocation, ctx);
            }
        }
        self.clear_execution();
    }

    fn clear_execution(&mut self) {
        self.plan = None;
        self.step_index = 0;
        self.started = false;
        self.invocation = Invocation::fresh();
    }
}

fn build_target_view(ctx: &ExecContext) -> TargetView {
    TargetView {
        own_position: ctx.nav.position(),
        player_position: ctx.player_position,
        last_known_player: ctx.memory.last_player_position(),
        patrol_waypoint: ctx.patrol.current_waypoint(),
        post: ctx.patrol.nearest_waypoint(ctx.nav.position()).unwrap_or(ctx.nav.position()),
        alert_position: ctx
            .memory
            .focus_channel
            .and_then(|ch| ctx.alerts.visible_to(ch, ctx.agent_id))
            .map(|r| r.position()),
        noise_position: ctx.memory.noise_position(),
    }
}
