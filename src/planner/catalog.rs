//! The concrete guard action set
//!
//! Every action is a stateless value; run-state lives in the invocation
//! record. Movement goes through the navigation seam and a refused
//! request is always an immediate Stop, never a panic.

use crate::agent::GuardEvent;
use crate::core::types::Vec3;
use crate::facts::target::TargetKind;
use crate::facts::{FactKey, FactValue};
use crate::interface::presentation::{AnimationCue, AudioCue};
use crate::planner::action::{Action, ActionKind, ActionStatus, ExecContext, Invocation};
use crate::planner::goal::Condition;

/// All actions a stock guard plans with
pub struct ActionCatalog {
    actions: Vec<Box<dyn Action>>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self {
            actions: vec![
                Box::new(Patrol::new()),
                Box::new(ReturnToPost::new()),
                Box::new(InvestigateAlert::new()),
                Box::new(InvestigateNoise::new()),
                Box::new(SeekLastKnown::new()),
                Box::new(SearchArea::new()),
                Box::new(Pursue::new()),
                Box::new(Capture::new()),
                Box::new(Recharge::new()),
            ],
        }
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    pub fn get(&self, kind: ActionKind) -> Option<&dyn Action> {
        self.actions.iter().find(|a| a.kind() == kind).map(|a| a.as_ref())
    }
}

// --- Patrol ---------------------------------------------------------------

/// Walk the patrol route forever; the idle default
pub struct Patrol {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl Patrol {
    pub fn new() -> Self {
        Self {
            pre: vec![
                Condition::is(FactKey::AtPatrolPost, true),
                Condition::is(FactKey::PlayerSpotted, false),
            ],
            eff: vec![(FactKey::OnPatrol, FactValue::Bool(true))],
        }
    }
}

impl Action for Patrol {
    fn kind(&self) -> ActionKind {
        ActionKind::Patrol
    }

    fn base_cost(&self) -> f32 {
        1.0
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::PatrolWaypoint
    }

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.animation(AnimationCue::Walk);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        if !ctx.steer_to(inv, target.position, ctx.config.patrol_speed) {
            return ActionStatus::Stop;
        }
        if ctx.arrived() {
            ctx.patrol.advance();
            // Force a fresh destination push toward the next waypoint
            inv.committed_destination = None;
        }
        // Patrolling never finishes on its own; a goal change interrupts it
        ActionStatus::Continue
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- ReturnToPost ---------------------------------------------------------

/// Walk back to the nearest route waypoint after an away-mission
pub struct ReturnToPost {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl ReturnToPost {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::PlayerSpotted, false)],
            eff: vec![(FactKey::AtPatrolPost, FactValue::Bool(true))],
        }
    }
}

impl Action for ReturnToPost {
    fn kind(&self) -> ActionKind {
        ActionKind::ReturnToPost
    }

    fn base_cost(&self) -> f32 {
        1.5
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::OwnPost
    }

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.animation(AnimationCue::Walk);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        if !ctx.steer_to(inv, target.position, ctx.config.patrol_speed) {
            return ActionStatus::Stop;
        }
        if ctx.arrived() {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- InvestigateAlert -----------------------------------------------------

/// Move to the active alert's anchor, claiming exclusive response
pub struct InvestigateAlert {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl InvestigateAlert {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::AlertActive, true)],
            eff: vec![(FactKey::AtInvestigationPoint, FactValue::Bool(true))],
        }
    }
}

impl Action for InvestigateAlert {
    fn kind(&self) -> ActionKind {
        ActionKind::InvestigateAlert
    }

    fn base_cost(&self) -> f32 {
        2.0
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::AlertAnchor
    }

    fn on_start(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        if let Some(channel) = ctx.memory.focus_channel {
            if ctx.alerts.assign(channel, ctx.agent_id) {
                inv.channel = Some(channel);
                inv.snapshot = ctx.alerts.snapshot(channel);
                ctx.memory.focus_snapshot = inv.snapshot;
            }
        }
        ctx.presentation.animation(AnimationCue::Run);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        let speed = ctx.config.pursuit_speed * ctx.guard_speed_mult;
        if !ctx.steer_to(inv, target.position, speed) {
            return ActionStatus::Stop;
        }
        if ctx.arrived() {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_complete(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.memory.investigation_point = inv.target.map(|t| t.position);
    }

    fn on_end(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
        // Interrupted before reaching the anchor: free the record so
        // another guard can respond
        if !inv.completed_normally {
            if let Some(channel) = inv.channel {
                ctx.alerts.release_assignment(channel, ctx.agent_id);
                ctx.memory.focus_snapshot = None;
            }
        }
    }
}

// --- InvestigateNoise -----------------------------------------------------

/// Walk toward a remembered noise
pub struct InvestigateNoise {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl InvestigateNoise {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::NoiseHeard, true)],
            eff: vec![(FactKey::AtInvestigationPoint, FactValue::Bool(true))],
        }
    }
}

impl Action for InvestigateNoise {
    fn kind(&self) -> ActionKind {
        ActionKind::InvestigateNoise
    }

    fn base_cost(&self) -> f32 {
        2.5
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::NoiseSource
    }

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.animation(AnimationCue::Walk);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        if !ctx.steer_to(inv, target.position, ctx.config.patrol_speed) {
            return ActionStatus::Stop;
        }
        if ctx.arrived() {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_complete(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.memory.investigation_point = inv.target.map(|t| t.position);
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- SeekLastKnown --------------------------------------------------------

/// Run to where the player was last positively seen
///
/// Costed above the investigate actions so an active alert or noise is
/// always handled through its own anchor rather than a stale sighting.
pub struct SeekLastKnown {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl SeekLastKnown {
    pub fn new() -> Self {
        Self {
            pre: vec![
                Condition::is(FactKey::PlayerInMemory, true),
                Condition::is(FactKey::PlayerSpotted, false),
            ],
            eff: vec![(FactKey::AtInvestigationPoint, FactValue::Bool(true))],
        }
    }
}

impl Action for SeekLastKnown {
    fn kind(&self) -> ActionKind {
        ActionKind::SeekLastKnown
    }

    fn base_cost(&self) -> f32 {
        3.0
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::LastKnownPlayer
    }

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.animation(AnimationCue::Run);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        let speed = ctx.config.pursuit_speed * ctx.guard_speed_mult;
        if !ctx.steer_to(inv, target.position, speed) {
            return ActionStatus::Stop;
        }
        if ctx.arrived() {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_complete(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.memory.investigation_point = inv.target.map(|t| t.position);
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- SearchArea -----------------------------------------------------------

/// Stand at the investigation point and sweep the gaze around
///
/// Timed phases accumulate across `perform` calls; there is no blocking
/// wait anywhere.
pub struct SearchArea {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl SearchArea {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::AtInvestigationPoint, true)],
            eff: vec![
                (FactKey::AreaSearched, FactValue::Bool(true)),
                (FactKey::AlertHandled, FactValue::Bool(true)),
                (FactKey::NoiseInvestigated, FactValue::Bool(true)),
            ],
        }
    }
}

impl Action for SearchArea {
    fn kind(&self) -> ActionKind {
        ActionKind::SearchArea
    }

    fn base_cost(&self) -> f32 {
        1.5
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

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Search);
        ctx.presentation.audio(AudioCue::SearchLoop);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let look_count = ctx.config.search_look_count.max(1);
        inv.phase_elapsed += ctx.dt;

        if inv.phase_elapsed >= ctx.config.search_look_seconds {
            inv.phase_elapsed = 0.0;
            inv.phase += 1;
            if inv.phase >= look_count {
                return ActionStatus::Completed;
            }
            // Rotate the gaze one step around the circle
            let step = std::f32::consts::TAU / look_count as f32;
            let base = ctx.pose.forward.flatten();
            let (sin, cos) = step.sin_cos();
            let rotated = Vec3::new(
                base.x * cos - base.z * sin,
                0.0,
                base.x * sin + base.z * cos,
            );
            ctx.pose.forward = rotated.normalize();
        }
        ActionStatus::Continue
    }

    fn on_complete(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        // Consume whatever prompted the search
        if let Some(channel) = ctx.memory.focus_channel.take() {
            let consume = ctx
                .alerts
                .record(channel)
                .map(|r| r.clear_on_consume())
                .unwrap_or(false);
            if consume {
                if let Some(snapshot) = ctx.memory.focus_snapshot.take() {
                    ctx.alerts.try_clear_for_anchor(channel, snapshot);
                }
            }
            ctx.alerts.release_assignment(channel, ctx.agent_id);
            ctx.memory.focus_snapshot = None;
        }
        ctx.memory.clear_noise();
        // The sweep covered the remembered sighting; drop it so the
        // trail is not chased again
        ctx.memory.forget_player();
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.memory.investigation_point = None;
        ctx.presentation.stop_audio(AudioCue::SearchLoop);
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- Pursue ---------------------------------------------------------------

/// Run at the player while they are spotted
pub struct Pursue {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl Pursue {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::PlayerSpotted, true)],
            eff: vec![(FactKey::PlayerInCaptureRange, FactValue::Bool(true))],
        }
    }
}

impl Action for Pursue {
    fn kind(&self) -> ActionKind {
        ActionKind::Pursue
    }

    fn base_cost(&self) -> f32 {
        3.0
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Player
    }

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.animation(AnimationCue::Run);
        ctx.presentation.audio(AudioCue::SpottedBark);
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            // Player entity gone: treated as a precondition failure
            return ActionStatus::Stop;
        };
        let speed = ctx.config.pursuit_speed * ctx.guard_speed_mult;
        if !ctx.steer_to(inv, target.position, speed) {
            return ActionStatus::Stop;
        }
        let distance = ctx.nav.position().distance(&target.position);
        if distance <= ctx.config.capture_radius {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- Capture --------------------------------------------------------------

/// Close the last step and notify game flow
pub struct Capture {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl Capture {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::PlayerInCaptureRange, true)],
            eff: vec![(FactKey::PlayerCaptured, FactValue::Bool(true))],
        }
    }
}

impl Action for Capture {
    fn kind(&self) -> ActionKind {
        ActionKind::Capture
    }

    fn base_cost(&self) -> f32 {
        1.0
    }

    fn preconditions(&self) -> &[Condition] {
        &self.pre
    }

    fn effects(&self) -> &[(FactKey, FactValue)] {
        &self.eff
    }

    fn target_kind(&self) -> TargetKind {
        TargetKind::Player
    }

    fn perform(&self, inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        let Some(target) = inv.target else {
            return ActionStatus::Stop;
        };
        let distance = ctx.nav.position().distance(&target.position);
        if distance > ctx.config.capture_radius {
            // Player slipped out; re-plan back into pursuit
            return ActionStatus::Stop;
        }
        ctx.events.push(GuardEvent::PlayerCaught { by: ctx.agent_id });
        ActionStatus::Completed
    }

    fn on_complete(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.presentation.audio(AudioCue::CaptureSting);
    }

    fn on_end(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Idle);
    }
}

// --- Recharge -------------------------------------------------------------

/// Stand down and refill energy; perception is suspended throughout
pub struct Recharge {
    pre: Vec<Condition>,
    eff: Vec<(FactKey, FactValue)>,
}

impl Recharge {
    pub fn new() -> Self {
        Self {
            pre: vec![Condition::is(FactKey::EnergyDepleted, true)],
            eff: vec![(FactKey::EnergyFull, FactValue::Bool(true))],
        }
    }
}

impl Action for Recharge {
    fn kind(&self) -> ActionKind {
        ActionKind::Recharge
    }

    fn base_cost(&self) -> f32 {
        1.0
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

    fn on_start(&self, _inv: &mut Invocation, ctx: &mut ExecContext) {
        ctx.energy.start_recharge();
        ctx.perception.pause();
        ctx.nav.stop();
        ctx.presentation.animation(AnimationCue::Recharge);
        ctx.presentation.audio(AudioCue::RechargeLoop);
    }

    fn perform(&self, _inv: &mut Invocation, ctx: &mut ExecContext) -> ActionStatus {
        if ctx.energy.recharge(ctx.dt) {
            ActionStatus::Completed
        } else {
            ActionStatus::Continue
        }
    }

    fn on_end(&self, inv: &mut Invocation, ctx: &mut ExecContext) {
        if !inv.completed_normally {
            ctx.energy.interrupt_recharge();
        }
        ctx.perception.resume();
        ctx.nav.resume();
        ctx.presentation.stop_audio(AudioCue::RechargeLoop);
        ctx.presentation.animation(AnimationCue::Idle);
    }
}
