//! Sensors: adapters from raw state to named facts
//!
//! The suite runs once per tick per agent and produces the complete
//! WorldState from scratch. Each sensor owns a narrow slice of the key
//! space; none of them read the previous tick's facts.

use crate::agent::{GuardMemory, PatrolRoute, PlayerView};
use crate::alert::{AlertChannel, AlertCoordinator};
use crate::core::config::GuardConfig;
use crate::core::types::{AgentId, Vec3};
use crate::energy::EnergyState;
use crate::facts::{FactKey, WorldState};
use crate::perception::Perception;
use crate::planner::action::ActionKind;

/// Channels in response-priority order; a laser trip outranks a noise
const CHANNEL_PRIORITY: [AlertChannel; 2] = [AlertChannel::Laser, AlertChannel::Noise];

/// Read view over everything sensors may consult
///
/// `memory` and `alerts` are mutable: the alert sensor drives lazy
/// expiry timers and records which channel holds the agent's focus.
pub struct SenseContext<'a> {
    pub agent_id: AgentId,
    pub config: &'a GuardConfig,
    pub own_position: Vec3,
    pub perception: &'a Perception,
    pub energy: &'a EnergyState,
    pub memory: &'a mut GuardMemory,
    pub patrol: &'a PatrolRoute,
    pub alerts: &'a mut AlertCoordinator,
    pub player: &'a PlayerView,
    pub current_action: Option<ActionKind>,
    /// Accumulated sim time in seconds
    pub time: f64,
}

pub trait Sensor: Send + Sync {
    fn name(&self) -> &'static str;
    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState);
}

/// The standard guard sensor set
pub struct SensorSuite {
    sensors: Vec<Box<dyn Sensor>>,
}

impl std::fmt::Debug for SensorSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorSuite")
            .field("sensors", &self.sensors.len())
            .finish()
    }
}

impl Default for SensorSuite {
    fn default() -> Self {
        Self {
            sensors: vec![
                Box::new(VisionSensor),
                Box::new(EnergySensor),
                Box::new(AlertSensor),
                Box::new(MemorySensor),
                Box::new(PatrolSensor),
            ],
        }
    }
}

impl SensorSuite {
    pub fn build_world_state(&self, ctx: &mut SenseContext) -> WorldState {
        let mut out = WorldState::new();
        for sensor in &self.sensors {
            sensor.sense(ctx, &mut out);
        }
        out
    }
}

/// Spotted flag, detection charge, capture range, capture outcome
pub struct VisionSensor;

impl Sensor for VisionSensor {
    fn name(&self) -> &'static str {
        "vision"
    }

    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState) {
        let spotted = ctx.perception.meter.is_spotted();
        out.set(FactKey::PlayerSpotted, spotted);
        out.set(FactKey::DetectionCharge, ctx.perception.meter.charge());

        let in_range = spotted
            && ctx
                .player
                .position
                .map(|p| ctx.own_position.distance(&p) <= ctx.config.capture_radius)
                .unwrap_or(false);
        out.set(FactKey::PlayerInCaptureRange, in_range);
        out.set(FactKey::PlayerCaptured, ctx.player.caught);
    }
}

pub struct EnergySensor;

impl Sensor for EnergySensor {
    fn name(&self) -> &'static str {
        "energy"
    }

    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState) {
        out.set(FactKey::EnergyDepleted, ctx.energy.is_depleted() || ctx.energy.is_recharging());
        out.set(FactKey::EnergyFull, ctx.energy.is_full());
        out.set(FactKey::EnergyLevel, ctx.energy.fraction());
    }
}

/// Drives lazy alert expiry and picks the agent's focus channel
pub struct AlertSensor;

impl Sensor for AlertSensor {
    fn name(&self) -> &'static str {
        "alert"
    }

    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState) {
        for channel in CHANNEL_PRIORITY {
            ctx.alerts.update_timer(channel, ctx.time);
        }

        // Keep an existing focus while its record is still actionable;
        // otherwise take the highest-priority visible channel.
        let focus = ctx
            .memory
            .focus_channel
            .filter(|&ch| ctx.alerts.visible_to(ch, ctx.agent_id).is_some())
            .or_else(|| {
                CHANNEL_PRIORITY
                    .into_iter()
                    .find(|&ch| ctx.alerts.visible_to(ch, ctx.agent_id).is_some())
            });
        ctx.memory.focus_channel = focus;

        let active = focus.is_some();
        out.set(FactKey::AlertActive, active);
        out.set(FactKey::AlertHandled, !active);
    }
}

/// Noise recall and the investigation-point anchor
pub struct MemorySensor;

impl Sensor for MemorySensor {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState) {
        let noise_heard = ctx.memory.noise_position().is_some();
        out.set(FactKey::NoiseHeard, noise_heard);
        out.set(FactKey::NoiseInvestigated, !noise_heard);
        out.set(FactKey::PlayerInMemory, ctx.memory.last_player_position().is_some());

        let at_point = ctx
            .memory
            .investigation_point
            .map(|p| ctx.own_position.distance(&p) <= ctx.config.arrival_radius * 2.0)
            .unwrap_or(false);
        out.set(FactKey::AtInvestigationPoint, at_point);
    }
}

pub struct PatrolSensor;

impl Sensor for PatrolSensor {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn sense(&self, ctx: &mut SenseContext, out: &mut WorldState) {
        out.set(FactKey::AtPatrolPost, ctx.patrol.is_on_route(ctx.own_position));
        out.set(FactKey::OnPatrol, ctx.current_action == Some(ActionKind::Patrol));
    }
}
