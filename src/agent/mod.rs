//! The guard agent: owned state plus the per-tick sense/plan/execute loop

use serde::{Deserialize, Serialize};

use crate::alert::{AlertChannel, AlertCoordinator, AnchorSnapshot};
use crate::core::config::GuardConfig;
use crate::core::types::{AgentId, Pose, Tick, Vec3};
use crate::difficulty::{Consumer, DifficultyController};
use crate::energy::EnergyState;
use crate::facts::sensors::{SenseContext, SensorSuite};
use crate::interface::navigation::Navigation;
use crate::interface::presentation::Presentation;
use crate::interface::spatial::SpatialQuery;
use crate::perception::Perception;
use crate::planner::action::ExecContext;
use crate::planner::catalog::ActionCatalog;
use crate::planner::executor::PlanExecutor;
use crate::planner::goal::default_goals;

/// Notifications surfaced to game-flow collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardEvent {
    PlayerCaught { by: AgentId },
}

/// What the core knows about the player this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerView {
    /// None when the player entity is destroyed or not yet spawned
    pub position: Option<Vec3>,
    pub caught: bool,
}

/// Short-term recall: where things were, and which alert holds focus
#[derive(Debug, Clone, Default)]
pub struct GuardMemory {
    last_player: Option<(Vec3, f64)>,
    noise: Option<(Vec3, f64)>,
    /// Alert channel this agent is responding to
    pub focus_channel: Option<AlertChannel>,
    pub focus_snapshot: Option<AnchorSnapshot>,
    /// Anchor for an in-progress search sweep
    pub investigation_point: Option<Vec3>,
}

/// Seconds a remembered position stays actionable
const MEMORY_HORIZON_SECS: f64 = 20.0;

impl GuardMemory {
    pub fn remember_player(&mut self, position: Vec3, time: f64) {
        self.last_player = Some((position, time));
    }

    pub fn hear_noise(&mut self, position: Vec3, time: f64) {
        self.noise = Some((position, time));
    }

    pub fn last_player_position(&self) -> Option<Vec3> {
        self.last_player.map(|(p, _)| p)
    }

    pub fn noise_position(&self) -> Option<Vec3> {
        self.noise.map(|(p, _)| p)
    }

    pub fn clear_noise(&mut self) {
        self.noise = None;
    }

    /// Give up on a remembered player position (the spot was swept)
    pub fn forget_player(&mut self) {
        self.last_player = None;
    }

    /// Drop entries older than the horizon; called once per sense pass
    pub fn expire(&mut self, now: f64) {
        if let Some((_, t)) = self.last_player {
            if now - t > MEMORY_HORIZON_SECS {
                self.last_player = None;
            }
        }
        if let Some((_, t)) = self.noise {
            if now - t > MEMORY_HORIZON_SECS {
                self.noise = None;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Cyclic waypoint route with a notion of "near the route"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatrolRoute {
    waypoints: Vec<Vec3>,
    current: usize,
}

/// Fallback containment radius for degenerate (0/1 waypoint) routes
const DEFAULT_POST_RADIUS: f32 = 5.0;

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self { waypoints, current: 0 }
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current).copied()
    }

    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.current = (self.current + 1) % self.waypoints.len();
        }
    }

    pub fn nearest_waypoint(&self, pos: Vec3) -> Option<Vec3> {
        self.waypoints
            .iter()
            .copied()
            .min_by(|a, b| {
                pos.distance(a)
                    .partial_cmp(&pos.distance(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Longest adjacent segment, the radius within which an agent walking
    /// the route always stays of its nearest waypoint
    pub fn containment_radius(&self) -> f32 {
        if self.waypoints.len() < 2 {
            return DEFAULT_POST_RADIUS;
        }
        let mut max_segment: f32 = 0.0;
        for i in 0..self.waypoints.len() {
            let next = (i + 1) % self.waypoints.len();
            max_segment = max_segment.max(self.waypoints[i].distance(&self.waypoints[next]));
        }
        max_segment.max(DEFAULT_POST_RADIUS)
    }

    pub fn is_on_route(&self, pos: Vec3) -> bool {
        match self.nearest_waypoint(pos) {
            Some(wp) => pos.distance(&wp) <= self.containment_radius(),
            None => true,
        }
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// A guard: identity, senses, energy, memory and a plan executor
#[derive(Debug)]
pub struct Agent {
    pub id: AgentId,
    pub config: GuardConfig,
    pub pose: Pose,
    pub perception: Perception,
    pub energy: EnergyState,
    pub memory: GuardMemory,
    pub patrol: PatrolRoute,
    pub executor: PlanExecutor,
    sensors: SensorSuite,
    spawn_pose: Pose,
}

impl Agent {
    pub fn new(config: GuardConfig, pose: Pose, waypoints: Vec<Vec3>) -> Self {
        Self {
            id: AgentId::new(),
            perception: Perception::from_config(&config),
            energy: EnergyState::from_config(&config),
            memory: GuardMemory::default(),
            patrol: PatrolRoute::new(waypoints),
            executor: PlanExecutor::new(default_goals()),
            sensors: SensorSuite::default(),
            spawn_pose: pose,
            pose,
            config,
        }
    }

    /// One full agent tick: sense, plan (when triggered), execute
    ///
    /// Returns events for game-flow collaborators (captures).
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        nav: &mut dyn Navigation,
        presentation: &mut dyn Presentation,
        spatial: &dyn SpatialQuery,
        alerts: &mut AlertCoordinator,
        difficulty: &DifficultyController,
        catalog: &ActionCatalog,
        player: &PlayerView,
        dt: f32,
        tick: Tick,
        time: f64,
    ) -> Vec<GuardEvent> {
        // Body follows navigation; facing follows movement unless an
        // action is steering the gaze itself.
        self.pose.position = nav.position();
        let velocity = nav.velocity();
        if velocity.length() > 0.01 {
            self.pose.forward = velocity.normalize();
        }

        self.memory.expire(time);

        // --- sense -------------------------------------------------------
        let decay_mult = difficulty.translate(Consumer::DetectionDecay);
        let hit = self
            .perception
            .observe(&self.pose, player.position, spatial, dt, decay_mult);
        if hit {
            if let Some(pos) = player.position {
                self.memory.remember_player(pos, time);
            }
        }

        let energy_mult = difficulty.translate(Consumer::EnergyUsage);
        self.energy.drain(dt, energy_mult);

        let current_action = self.executor.current_kind();
        let world_state = {
            let mut sense_ctx = SenseContext {
                agent_id: self.id,
                config: &self.config,
                own_position: self.pose.position,
                perception: &self.perception,
                energy: &self.energy,
                memory: &mut self.memory,
                patrol: &self.patrol,
                alerts,
                player,
                current_action,
                time,
            };
            self.sensors.build_world_state(&mut sense_ctx)
        };

        // --- plan + execute ----------------------------------------------
        let mut events = Vec::new();
        let mut ctx = ExecContext {
            agent_id: self.id,
            config: &self.config,
            pose: &mut self.pose,
            nav,
            presentation,
            perception: &mut self.perception,
            energy: &mut self.energy,
            memory: &mut self.memory,
            patrol: &mut self.patrol,
            alerts,
            player_position: player.position,
            events: &mut events,
            dt,
            tick,
            time,
            guard_speed_mult: difficulty.translate(Consumer::GuardSpeed),
            action_cost_mult: difficulty.translate(Consumer::ActionCost),
        };
        self.executor.tick(&world_state, catalog, &mut ctx);
        events
    }

    /// Checkpoint/retry reset: back to spawn, senses and plans wiped
    pub fn reset(&mut self) {
        self.pose = self.spawn_pose;
        self.perception.reset();
        self.energy.reset();
        self.memory.reset();
        self.patrol.reset();
        self.executor.hard_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_route_cycles() {
        let mut route = PatrolRoute::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 4.0),
        ]);
        assert_eq!(route.current_waypoint(), Some(Vec3::new(0.0, 0.0, 0.0)));
        route.advance();
        route.advance();
        route.advance();
        assert_eq!(route.current_waypoint(), Some(Vec3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_route_containment() {
        let route = PatrolRoute::new(vec![Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)]);
        // Between waypoints: on route
        assert!(route.is_on_route(Vec3::new(3.0, 0.0, 0.0)));
        // Far across the map: off route
        assert!(!route.is_on_route(Vec3::new(30.0, 0.0, 0.0)));
    }

    #[test]
    fn test_memory_expiry() {
        let mut memory = GuardMemory::default();
        memory.hear_noise(Vec3::ZERO, 0.0);
        memory.expire(10.0);
        assert!(memory.noise_position().is_some());
        memory.expire(30.0);
        assert!(memory.noise_position().is_none());
    }

    #[test]
    fn test_agent_reset_restores_spawn() {
        let pose = Pose::looking_at(Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 0.0, 1.0));
        let mut agent = Agent::new(GuardConfig::default(), pose, vec![Vec3::ZERO]);
        agent.pose.position = Vec3::new(9.0, 0.0, 9.0);
        agent.memory.hear_noise(Vec3::ZERO, 1.0);
        agent.reset();
        assert_eq!(agent.pose.position, Vec3::new(1.0, 0.0, 1.0));
        assert!(agent.memory.noise_position().is_none());
    }
}
