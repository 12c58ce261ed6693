//! Vision cone test - distance, angular offsets, then occlusion

use crate::core::config::GuardConfig;
use crate::core::types::{Pose, Vec3};
use crate::interface::spatial::SpatialQuery;

/// Field-of-view cone parameters, derived from guard config
#[derive(Debug, Clone, Copy)]
pub struct VisionCone {
    /// Horizontal half-angle in degrees
    pub horizontal_fov_deg: f32,
    /// Vertical half-angle in degrees
    pub vertical_fov_deg: f32,
    pub view_distance: f32,
}

impl VisionCone {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            horizontal_fov_deg: config.horizontal_fov_deg,
            vertical_fov_deg: config.vertical_fov_deg,
            view_distance: config.view_distance,
        }
    }

    /// Raw per-tick sight test
    ///
    /// This is a transient hit signal; sustained confirmation is the
    /// detection meter's job. Order matters for cost: the cheap distance
    /// gate runs first, the occlusion raycast last.
    pub fn can_see(&self, eye: &Pose, target: Vec3, spatial: &dyn SpatialQuery) -> bool {
        let to_target = target - eye.position;
        let distance = to_target.length();
        if distance > self.view_distance || distance < 1e-4 {
            return false;
        }

        // Horizontal offset: angle between forward and target direction,
        // both projected onto the xz plane
        let flat_dir = to_target.flatten().normalize();
        let flat_fwd = eye.forward.flatten().normalize();
        if flat_fwd == Vec3::ZERO {
            // Looking straight up/down has no horizontal facing
            return false;
        }
        let horizontal = angle_between_deg(&flat_fwd, &flat_dir);
        if horizontal > self.horizontal_fov_deg {
            return false;
        }

        // Vertical offset: difference between elevation angles
        let target_pitch = pitch_deg(&to_target);
        let forward_pitch = pitch_deg(&eye.forward);
        if (target_pitch - forward_pitch).abs() > self.vertical_fov_deg {
            return false;
        }

        spatial.line_of_sight(eye, target, self.view_distance)
    }
}

fn angle_between_deg(a: &Vec3, b: &Vec3) -> f32 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Elevation angle of a direction above the horizontal plane, degrees
fn pitch_deg(dir: &Vec3) -> f32 {
    let flat_len = dir.flatten().length();
    dir.y.atan2(flat_len).to_degrees()
}
