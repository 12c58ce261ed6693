//! Guard tuning configuration with documented constants
//!
//! All per-agent magic numbers are collected here with explanations of
//! their purpose and how they interact with each other. Values load once
//! from `guard.toml`; missing fields fall back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::planner::action::ActionKind;

/// Per-agent guard tunables
///
/// These values have been tuned to produce fair stealth pacing.
/// Changing them will affect how forgiving detection feels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    // === VISION ===
    /// Horizontal field-of-view half-angle (degrees)
    ///
    /// A target is inside the cone when its horizontal angular offset from
    /// the guard's forward vector is at most this value.
    pub horizontal_fov_deg: f32,

    /// Vertical field-of-view half-angle (degrees)
    pub vertical_fov_deg: f32,

    /// Maximum distance (world units) at which the vision test runs at all
    pub view_distance: f32,

    // === DETECTION ===
    /// Seconds of continuous sight required before the guard latches "spotted"
    ///
    /// This is also the upper clamp of the detection charge, so a long look
    /// never banks extra confidence beyond one full detection.
    pub detection_delay: f32,

    /// Charge lost per second while the target is not in sight,
    /// expressed as a multiple of the charge gain rate
    ///
    /// At 0.5 the charge drains half as fast as it fills; higher values
    /// make guards more forgiving between glimpses.
    pub decay_rate: f32,

    /// Seconds "spotted" stays latched after the last positive sighting
    ///
    /// Suppresses flicker when the player clips a pillar edge mid-chase.
    pub spotted_grace_period: f32,

    // === ENERGY ===
    /// Energy capacity
    pub max_energy: f32,

    /// Energy drained per second while the guard is active
    ///
    /// The effective rate is scaled by the EnergyUsage difficulty
    /// translation before integration.
    pub energy_drain_rate: f32,

    /// Energy restored per second while recharging
    pub energy_recharge_rate: f32,

    // === MOVEMENT ===
    /// Patrol walking speed (world units per second)
    pub patrol_speed: f32,

    /// Pursuit running speed before the difficulty translation is applied
    pub pursuit_speed: f32,

    /// Distance at which a destination counts as reached
    pub arrival_radius: f32,

    /// Distance at which a pursuing guard captures the player
    pub capture_radius: f32,

    // === SEARCH ===
    /// Seconds spent looking in each direction during a search sweep
    pub search_look_seconds: f32,

    /// Number of look directions in one search sweep
    pub search_look_count: u32,

    // === PLANNING ===
    /// Per-action cost multipliers, keyed by action kind
    ///
    /// Designers bias behavior here without touching planner logic:
    /// raising `investigate_noise` makes guards lazier about sounds.
    pub action_costs: ActionCosts,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: 50.0,
            vertical_fov_deg: 35.0,
            view_distance: 18.0,
            detection_delay: 1.0,
            decay_rate: 0.5,
            spotted_grace_period: 2.0,
            max_energy: 100.0,
            energy_drain_rate: 1.5,
            energy_recharge_rate: 8.0,
            patrol_speed: 2.0,
            pursuit_speed: 4.5,
            arrival_radius: 0.5,
            capture_radius: 1.2,
            search_look_seconds: 1.5,
            search_look_count: 4,
            action_costs: ActionCosts::default(),
        }
    }
}

/// Cost multipliers applied on top of each action's base cost
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCosts {
    pub patrol: f32,
    pub return_to_post: f32,
    pub investigate_alert: f32,
    pub investigate_noise: f32,
    pub seek_last_known: f32,
    pub pursue: f32,
    pub capture: f32,
    pub search_area: f32,
    pub recharge: f32,
}

impl Default for ActionCosts {
    fn default() -> Self {
        Self {
            patrol: 1.0,
            return_to_post: 1.0,
            investigate_alert: 1.0,
            investigate_noise: 1.0,
            seek_last_known: 1.0,
            pursue: 1.0,
            capture: 1.0,
            search_area: 1.0,
            recharge: 1.0,
        }
    }
}

impl ActionCosts {
    pub fn multiplier(&self, kind: ActionKind) -> f32 {
        match kind {
            ActionKind::Patrol => self.patrol,
            ActionKind::ReturnToPost => self.return_to_post,
            ActionKind::InvestigateAlert => self.investigate_alert,
            ActionKind::InvestigateNoise => self.investigate_noise,
            ActionKind::SeekLastKnown => self.seek_last_known,
            ActionKind::Pursue => self.pursue,
            ActionKind::Capture => self.capture,
            ActionKind::SearchArea => self.search_area,
            ActionKind::Recharge => self.recharge,
        }
    }
}

/// Load guard tunables from a TOML file
///
/// A missing file is not an error: defaults apply and a note is logged.
pub fn load_guard_config(path: &Path) -> Result<GuardConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "guard config not found, using defaults");
        return Ok(GuardConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: GuardConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = GuardConfig::default();
        assert!(cfg.detection_delay > 0.0);
        assert!(cfg.view_distance > 0.0);
        assert!(cfg.max_energy > 0.0);
        assert_eq!(cfg.action_costs.multiplier(ActionKind::Pursue), 1.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: GuardConfig = toml::from_str(
            r#"
            detection_delay = 2.0

            [action_costs]
            investigate_noise = 3.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.detection_delay, 2.0);
        assert_eq!(cfg.action_costs.investigate_noise, 3.0);
        // Untouched fields keep defaults
        assert_eq!(cfg.action_costs.pursue, 1.0);
        assert_eq!(cfg.max_energy, 100.0);
    }
}
