//! Action contract: preconditions/effects for planning, a fixed
//! lifecycle for execution
//!
//! Action values are stateless and shared by every agent; everything
//! that changes during a run lives in the per-invocation record the
//! executing agent owns. That split is what makes one `Pursue` value
//! safe to run for twenty guards at once.

use crate::agent::{GuardEvent, GuardMemory, PatrolRoute};
use crate::alert::{AlertChannel, AlertCoordinator, AnchorSnapshot};
use crate::core::config::GuardConfig;
use crate::core::error::WardenError;
use crate::core::types::{AgentId, Pose, Tick, Vec3};
use crate::energy::EnergyState;
use crate::facts::target::{Target, TargetKind};
use crate::facts::{FactKey, FactValue};
use crate::interface::navigation::Navigation;
use crate::interface::presentation::Presentation;
use crate::perception::Perception;
use crate::planner::goal::Condition;

/// Every guard action kind, used for costs, plans and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Patrol,
    ReturnToPost,
    InvestigateAlert,
    InvestigateNoise,
    SeekLastKnown,
    SearchArea,
    Pursue,
    Capture,
    Recharge,
}

/// Result of one `perform` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Still working; call again next tick
    Continue,
    /// Finished normally; effects are now true
    Completed,
    /// Cannot proceed; the executor ends the action and re-plans
    Stop,
}

/// Per-invocation scratch state, owned by the executing agent
///
/// Reset whenever an action starts; never shared across agents or
/// invocations.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub target: Option<Target>,
    /// Total seconds since `on_start`
    pub elapsed: f32,
    /// Index of the current timed phase (search sweeps)
    pub phase: u32,
    /// Seconds accumulated within the current phase
    pub phase_elapsed: f32,
    /// Alert bookkeeping for responder actions
    pub channel: Option<AlertChannel>,
    pub snapshot: Option<AnchorSnapshot>,
    /// Destination last pushed to navigation, to avoid re-issuing
    pub committed_destination: Option<Vec3>,
    /// Set by the executor before `on_end` when the action finished
    /// normally; cleanup can tell completion from interruption
    pub completed_normally: bool,
}

impl Invocation {
    pub fn fresh() -> Self {
        Self::default()
    }
}

/// Mutable view of the world an action may touch while executing
pub struct ExecContext<'a> {
    pub agent_id: AgentId,
    pub config: &'a GuardConfig,
    /// Body pose; actions may rotate the guard in place (search sweeps)
    pub pose: &'a mut Pose,
    pub nav: &'a mut dyn Navigation,
    pub presentation: &'a mut dyn Presentation,
    pub perception: &'a mut Perception,
    pub energy: &'a mut EnergyState,
    pub memory: &'a mut GuardMemory,
    pub patrol: &'a mut PatrolRoute,
    pub alerts: &'a mut AlertCoordinator,
    /// Live player position; None when the player entity is gone
    pub player_position: Option<Vec3>,
    pub events: &'a mut Vec<GuardEvent>,
    pub dt: f32,
    pub tick: Tick,
    /// Accumulated sim time in seconds
    pub time: f64,
    /// Pre-translated difficulty modifiers for this tick
    pub guard_speed_mult: f32,
    pub action_cost_mult: f32,
}

impl ExecContext<'_> {
    /// Drive navigation toward a point, re-issuing only when it moved
    ///
    /// Returns false when the navigation handle refuses the request,
    /// which actions treat as an immediate stop.
    pub fn steer_to(&mut self, inv: &mut Invocation, dest: Vec3, speed: f32) -> bool {
        self.nav.set_speed(speed);
        let moved = match inv.committed_destination {
            Some(prev) => prev.distance(&dest) > 0.05,
            None => true,
        };
        if moved {
            if !self.nav.set_destination(dest) {
                let err = WardenError::MissingDependency("navigation");
                tracing::warn!(agent = ?self.agent_id, %err, "destination refused");
                return false;
            }
            inv.committed_destination = Some(dest);
        }
        true
    }

    pub fn arrived(&self) -> bool {
        !self.nav.is_path_pending() && self.nav.remaining_distance() <= self.config.arrival_radius
    }
}

/// The capability interface the planner iterates generically
///
/// `Created` init happens once, in the constructor that builds the
/// catalog value. The rest of the lifecycle is: `on_start` when the
/// executor selects the action, `perform` every tick, `on_complete`
/// only on normal completion, `on_end` always.
pub trait Action: Send + Sync {
    fn kind(&self) -> ActionKind;

    /// Base planning cost; the executor scales it by the per-action
    /// config multiplier and the ActionCost difficulty translation
    fn base_cost(&self) -> f32;

    fn preconditions(&self) -> &[Condition];

    fn effects(&self) -> &[(FactKey, FactValue)];

    /// Spatial argument this action needs resolved each tick
    fn target_kind(&self) -> TargetKind;

    fn on_start(&self, _inv: &mut Invocation, _ctx: &mut ExecContext) {}

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus;

    fn on_complete(&self, _inv: &mut Invocation, _ctx: &mut ExecContext) {}

    /// Unconditional cleanup; runs on completion, interruption and stop
    fn on_end(&self, _inv: &mut Invocation, _ctx: &mut ExecContext) {}
}
