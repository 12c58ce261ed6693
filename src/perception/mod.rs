//! Per-agent visual perception: vision cone plus detection hysteresis

pub mod detection;
pub mod vision;

pub use detection::DetectionMeter;
pub use vision::VisionCone;

use crate::core::config::GuardConfig;
use crate::core::types::{Pose, Vec3};
use crate::interface::spatial::SpatialQuery;

/// Bundled cone + meter, the unit an agent owns
#[derive(Debug, Clone)]
pub struct Perception {
    pub cone: VisionCone,
    pub meter: DetectionMeter,
    /// Where the target was last positively seen, if ever
    last_seen: Option<Vec3>,
}

impl Perception {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            cone: VisionCone::from_config(config),
            meter: DetectionMeter::from_config(config),
            last_seen: None,
        }
    }

    /// Run one sensing tick against a target position
    ///
    /// Returns the transient hit signal; `is_spotted` on the meter holds
    /// the debounced confirmation.
    pub fn observe(
        &mut self,
        eye: &Pose,
        target: Option<Vec3>,
        spatial: &dyn SpatialQuery,
        dt: f32,
        decay_multiplier: f32,
    ) -> bool {
        let hit = match target {
            Some(pos) if !self.meter.is_paused() => self.cone.can_see(eye, pos, spatial),
            _ => false,
        };
        if hit {
            self.last_seen = target;
        }
        self.meter.update(hit, dt, decay_multiplier);
        hit
    }

    /// Suspend sensing entirely; the charge and latch are wiped
    pub fn pause(&mut self) {
        self.meter.pause();
    }

    pub fn resume(&mut self) {
        self.meter.resume();
    }

    pub fn last_seen(&self) -> Option<Vec3> {
        self.last_seen
    }

    pub fn forget(&mut self) {
        self.last_seen = None;
    }

    pub fn reset(&mut self) {
        self.meter.reset();
        self.last_seen = None;
    }
}
