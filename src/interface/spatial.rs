//! Spatial query seam - occlusion and surface snapping
//!
//! The physics/level geometry lives outside the core; perception only
//! needs a line-of-sight test and a way to pin an arbitrary point onto
//! navigable ground.

use crate::core::types::{Pose, Vec3};

pub trait SpatialQuery {
    /// True when the segment from the eye to the target is unobstructed
    /// within `max_dist`
    fn line_of_sight(&self, origin: &Pose, target: Vec3, max_dist: f32) -> bool;

    /// Project a point onto the nearest navigable surface
    fn snap_to_surface(&self, pos: Vec3) -> Vec3;
}

/// Empty level: every sight line is clear, every point is navigable
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenField;

impl SpatialQuery for OpenField {
    fn line_of_sight(&self, origin: &Pose, target: Vec3, max_dist: f32) -> bool {
        origin.position.distance(&target) <= max_dist
    }

    fn snap_to_surface(&self, pos: Vec3) -> Vec3 {
        Vec3::new(pos.x, 0.0, pos.z)
    }
}

/// Axis-aligned wall segments on the xz plane, for tests and the headless sim
#[derive(Debug, Default, Clone)]
pub struct WallGrid {
    /// Each wall is a segment (a, b) blocking sight lines that cross it
    walls: Vec<(Vec3, Vec3)>,
}

impl WallGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_wall(&mut self, a: Vec3, b: Vec3) {
        self.walls.push((a, b));
    }

    fn segments_cross(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> bool {
        // 2D orientation test on the xz plane
        let d = |a: Vec3, b: Vec3, c: Vec3| (b.x - a.x) * (c.z - a.z) - (b.z - a.z) * (c.x - a.x);
        let d1 = d(p3, p4, p1);
        let d2 = d(p3, p4, p2);
        let d3 = d(p1, p2, p3);
        let d4 = d(p1, p2, p4);
        (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
    }
}

impl SpatialQuery for WallGrid {
    fn line_of_sight(&self, origin: &Pose, target: Vec3, max_dist: f32) -> bool {
        if origin.position.distance(&target) > max_dist {
            return false;
        }
        !self
            .walls
            .iter()
            .any(|&(a, b)| Self::segments_cross(origin.position, target, a, b))
    }

    fn snap_to_surface(&self, pos: Vec3) -> Vec3 {
        Vec3::new(pos.x, 0.0, pos.z)
    }
}
