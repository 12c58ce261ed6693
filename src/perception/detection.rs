//! Detection confidence meter with decay and grace-period hysteresis

use serde::{Deserialize, Serialize};

use crate::core::config::GuardConfig;

/// Accumulated confidence that a guard has visually confirmed the player
///
/// Charge fills in real time while the vision test reports a hit and
/// drains while it does not. Reaching `detection_delay` latches the
/// spotted flag, which then survives brief occlusions via a grace period
/// so a chase does not flicker on and off at every pillar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionMeter {
    /// Seconds of confidence banked, always within [0, detection_delay]
    charge: f32,
    /// Seconds of continuous sight required to latch spotted
    detection_delay: f32,
    /// Drain speed as a multiple of the fill speed
    decay_rate: f32,
    /// How long spotted stays latched after the last positive hit
    grace_period: f32,
    grace_remaining: f32,
    spotted: bool,
    paused: bool,
}

impl DetectionMeter {
    pub fn new(detection_delay: f32, decay_rate: f32, grace_period: f32) -> Self {
        Self {
            charge: 0.0,
            detection_delay: detection_delay.max(1e-3),
            decay_rate,
            grace_period,
            grace_remaining: 0.0,
            spotted: false,
            paused: false,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(
            config.detection_delay,
            config.decay_rate,
            config.spotted_grace_period,
        )
    }

    /// Integrate one tick of sensor input
    ///
    /// `decay_multiplier` comes from the difficulty translation: values
    /// above 1 drain faster (more forgiving play at low difficulty).
    pub fn update(&mut self, hit: bool, dt: f32, decay_multiplier: f32) {
        if self.paused {
            return;
        }

        if hit {
            self.charge = (self.charge + dt).min(self.detection_delay);
            if self.charge >= self.detection_delay {
                self.spotted = true;
            }
            self.grace_remaining = self.grace_period;
        } else {
            let decay = dt * self.decay_rate * decay_multiplier.max(0.0);
            self.charge = (self.charge - decay).max(0.0);
            if self.spotted {
                self.grace_remaining = (self.grace_remaining - dt).max(0.0);
                if self.grace_remaining <= 0.0 {
                    self.spotted = false;
                }
            }
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    /// Charge as a fraction of a full detection, for UI meters
    pub fn charge_fraction(&self) -> f32 {
        self.charge / self.detection_delay
    }

    pub fn is_spotted(&self) -> bool {
        self.spotted
    }

    /// Suspend sensing entirely (used while recharging)
    ///
    /// Charge and spotted reset immediately; resuming later does not
    /// retroactively credit the time spent paused.
    pub fn pause(&mut self) {
        self.paused = true;
        self.charge = 0.0;
        self.spotted = false;
        self.grace_remaining = 0.0;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.charge = 0.0;
        self.spotted = false;
        self.grace_remaining = 0.0;
        self.paused = false;
    }
}
