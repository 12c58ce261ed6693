//! Per-tick target resolution
//!
//! Actions declare what kind of spatial objective they need; the actual
//! point is re-resolved every tick, independent of the action's internal
//! logic, so a moving player or a re-anchored alert is always chased at
//! its current location.

use crate::core::error::{Result, WardenError};
use crate::core::types::{AgentId, Vec3};

/// What kind of objective an action wants resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// No spatial argument needed
    None,
    /// Next waypoint on the agent's patrol route
    PatrolWaypoint,
    /// The player's live position
    Player,
    /// Where the player was last positively seen
    LastKnownPlayer,
    /// The active alert's anchor/position
    AlertAnchor,
    /// Where the last noise came from
    NoiseSource,
    /// The agent's own patrol post
    OwnPost,
}

impl TargetKind {
    /// Short label for diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            TargetKind::None => "none",
            TargetKind::PatrolWaypoint => "patrol waypoint",
            TargetKind::Player => "player",
            TargetKind::LastKnownPlayer => "last known player position",
            TargetKind::AlertAnchor => "alert anchor",
            TargetKind::NoiseSource => "noise source",
            TargetKind::OwnPost => "own post",
        }
    }
}

/// A resolved objective
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub kind: TargetKind,
    pub position: Vec3,
    /// Set when the objective is an entity rather than a point
    pub entity: Option<AgentId>,
}

impl Target {
    pub fn point(kind: TargetKind, position: Vec3) -> Self {
        Self { kind, position, entity: None }
    }
}

/// Everything resolution may draw from, assembled fresh each tick
#[derive(Debug, Clone, Copy)]
pub struct TargetView {
    pub own_position: Vec3,
    pub player_position: Option<Vec3>,
    pub last_known_player: Option<Vec3>,
    pub patrol_waypoint: Option<Vec3>,
    pub post: Vec3,
    pub alert_position: Option<Vec3>,
    pub noise_position: Option<Vec3>,
}

/// Resolve an objective, or `InvalidTarget` when the referenced thing
/// is gone
///
/// The error is a precondition failure from the executor's point of
/// view: the action stops and the next tick re-plans.
pub fn resolve_target(kind: TargetKind, view: &TargetView) -> Result<Target> {
    let resolved = match kind {
        TargetKind::None => Some(Target::point(kind, view.own_position)),
        TargetKind::PatrolWaypoint => view.patrol_waypoint.map(|p| Target::point(kind, p)),
        TargetKind::Player => view.player_position.map(|p| Target::point(kind, p)),
        TargetKind::LastKnownPlayer => view.last_known_player.map(|p| Target::point(kind, p)),
        TargetKind::AlertAnchor => view.alert_position.map(|p| Target::point(kind, p)),
        TargetKind::NoiseSource => view.noise_position.map(|p| Target::point(kind, p)),
        TargetKind::OwnPost => Some(Target::point(kind, view.post)),
    };
    resolved.ok_or(WardenError::InvalidTarget(kind.describe()))
}
