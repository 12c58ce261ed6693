//! The headless guard world and its per-tick driver
//!
//! Single-threaded cooperative simulation: every guard senses, plans and
//! executes within one discrete tick. Agent order is arbitrary; the
//! shared registers tolerate read-while-mutated within a tick because
//! alert re-raises are idempotent and difficulty updates are
//! last-write-wins per metric.

use crate::agent::{Agent, GuardEvent, PlayerView};
use crate::alert::AlertChannel;
use crate::core::types::{Tick, Vec3};
use crate::difficulty::{DifficultyTables, PlayerMetric};
use crate::interface::navigation::FixedSpeedNav;
use crate::interface::presentation::Presentation;
use crate::interface::spatial::SpatialQuery;
use crate::planner::catalog::ActionCatalog;
use crate::simulation::context::SharedContext;

/// One guard plus its host-side collaborators
pub struct GuardRig {
    pub agent: Agent,
    pub nav: FixedSpeedNav,
    pub presentation: Box<dyn Presentation>,
}

impl GuardRig {
    pub fn new(agent: Agent, presentation: Box<dyn Presentation>) -> Self {
        let nav = FixedSpeedNav::at(agent.pose.position);
        Self { agent, nav, presentation }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerState {
    pub position: Option<Vec3>,
    pub caught: bool,
}

/// Everything the headless sim owns
pub struct GuardWorld {
    pub guards: Vec<GuardRig>,
    pub shared: SharedContext,
    pub catalog: ActionCatalog,
    pub player: PlayerState,
    pub tick: Tick,
    captures: u32,
    detections: u32,
    last_theft_time: Option<f64>,
}

impl GuardWorld {
    pub fn new(tables: DifficultyTables) -> Self {
        Self {
            guards: Vec::new(),
            shared: SharedContext::new(tables),
            catalog: ActionCatalog::new(),
            player: PlayerState::default(),
            tick: 0,
            captures: 0,
            detections: 0,
            last_theft_time: None,
        }
    }

    pub fn spawn_guard(&mut self, rig: GuardRig) {
        self.guards.push(rig);
    }

    /// Advance the whole world by one tick
    pub fn run_tick(&mut self, spatial: &dyn SpatialQuery, dt: f32) -> Vec<GuardEvent> {
        self.tick += 1;
        self.shared.time += dt as f64;

        let player = PlayerView {
            position: self.player.position,
            caught: self.player.caught,
        };

        let mut events = Vec::new();
        for rig in &mut self.guards {
            let spotted_before = rig.agent.perception.meter.is_spotted();
            events.extend(rig.agent.update(
                &mut rig.nav,
                rig.presentation.as_mut(),
                spatial,
                &mut self.shared.alerts,
                &self.shared.difficulty,
                &self.catalog,
                &player,
                dt,
                self.tick,
                self.shared.time,
            ));
            if !spotted_before && rig.agent.perception.meter.is_spotted() {
                self.detections += 1;
                self.shared
                    .difficulty
                    .alter(PlayerMetric::DetectionCount, self.detections as f32);
            }
            rig.nav.advance(dt);
        }

        for event in &events {
            match event {
                GuardEvent::PlayerCaught { by } => {
                    tracing::info!(agent = ?by, "player caught");
                    self.player.caught = true;
                    self.captures += 1;
                    self.shared
                        .difficulty
                        .alter(PlayerMetric::CaptureCount, self.captures as f32);
                }
            }
        }
        events
    }

    // --- player event intake ---------------------------------------------

    /// The player stole something; feeds the theft-pacing metric
    pub fn note_theft(&mut self) {
        if let Some(last) = self.last_theft_time {
            let gap = (self.shared.time - last) as f32;
            self.shared.difficulty.alter(PlayerMetric::TimeBetweenThefts, gap);
        }
        self.last_theft_time = Some(self.shared.time);
    }

    /// The player shook off an active pursuit lasting `seconds`
    pub fn note_evasion(&mut self, seconds: f32) {
        self.shared.difficulty.alter(PlayerMetric::EvasionTime, seconds);
    }

    /// The player crossed a laser; raises the shared alert channel
    pub fn trip_laser(&mut self, position: Vec3, anchor: u64) {
        self.shared
            .alerts
            .raise(AlertChannel::Laser, position, Some(anchor), None);
    }

    /// The laser beam is no longer broken; the alert holds, then expires
    pub fn laser_released(&mut self) {
        self.shared
            .alerts
            .on_source_deactivated(AlertChannel::Laser, self.shared.time);
    }

    /// A noise at `position` audible within `radius`
    ///
    /// Guards in range remember it personally; everyone else stays
    /// oblivious.
    pub fn emit_noise(&mut self, position: Vec3, radius: f32) {
        let time = self.shared.time;
        for rig in &mut self.guards {
            if rig.agent.pose.position.distance(&position) <= radius {
                rig.agent.memory.hear_noise(position, time);
            }
        }
    }

    /// Read-only difficulty percentage for UI display
    pub fn difficulty_percent(&self) -> f32 {
        self.shared.difficulty.percent()
    }

    /// Checkpoint/retry: guards respawn, shared registers clear
    pub fn reset_run(&mut self) {
        self.shared.reset_run();
        self.player = PlayerState::default();
        self.captures = 0;
        self.detections = 0;
        self.last_theft_time = None;
        for rig in &mut self.guards {
            rig.agent.reset();
            rig.nav = FixedSpeedNav::at(rig.agent.pose.position);
        }
        tracing::info!("run reset");
    }
}
