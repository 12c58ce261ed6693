//! Navigation seam - pathing is solved by an external collaborator
//!
//! The core only asks to move, and asks whether it has arrived. A guard
//! whose navigation handle is absent or disabled stands idle; actions
//! treat that as an immediate stop, never a crash.

use crate::core::types::Vec3;

/// Minimal surface of whatever pathfinding/steering system hosts the guards
pub trait Navigation {
    /// Request movement toward a position. Returns false when the request
    /// cannot be accepted (agent disabled, no navigable surface).
    fn set_destination(&mut self, pos: Vec3) -> bool;

    /// Path computation still in flight; remaining distance is meaningless
    /// until this clears.
    fn is_path_pending(&self) -> bool;

    fn remaining_distance(&self) -> f32;

    /// Halt in place, keeping the current path for a later resume
    fn stop(&mut self);

    fn resume(&mut self);

    fn is_stopped(&self) -> bool;

    fn velocity(&self) -> Vec3;

    /// Desired movement speed, set per action (patrol walk vs pursuit run)
    fn set_speed(&mut self, speed: f32);

    /// Current agent position as the navigation system sees it
    fn position(&self) -> Vec3;
}

/// Stand-in used when no navigation system is wired up
///
/// Every request is refused, so actions stop immediately and the agent
/// degrades to standing idle.
#[derive(Debug, Default)]
pub struct NullNavigation {
    position: Vec3,
}

impl NullNavigation {
    pub fn at(position: Vec3) -> Self {
        Self { position }
    }
}

impl Navigation for NullNavigation {
    fn set_destination(&mut self, _pos: Vec3) -> bool {
        false
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        f32::INFINITY
    }

    fn stop(&mut self) {}

    fn resume(&mut self) {}

    fn is_stopped(&self) -> bool {
        true
    }

    fn velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn set_speed(&mut self, _speed: f32) {}

    fn position(&self) -> Vec3 {
        self.position
    }
}

/// Straight-line mover for tests and the headless sim
///
/// No obstacle avoidance: advances toward the destination at the
/// configured speed each `advance` call.
#[derive(Debug)]
pub struct FixedSpeedNav {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopped: bool,
}

impl FixedSpeedNav {
    pub fn at(position: Vec3) -> Self {
        Self { position, destination: None, speed: 2.0, stopped: false }
    }

    /// Integrate movement for one tick; the host calls this after the
    /// agent's own update.
    pub fn advance(&mut self, dt: f32) {
        if self.stopped {
            return;
        }
        let Some(dest) = self.destination else { return };
        let to_dest = dest - self.position;
        let dist = to_dest.length();
        let step = self.speed * dt;
        if dist <= step {
            self.position = dest;
            self.destination = None;
        } else {
            self.position = self.position + to_dest.normalize() * step;
        }
    }
}

impl Navigation for FixedSpeedNav {
    fn set_destination(&mut self, pos: Vec3) -> bool {
        self.destination = Some(pos);
        self.stopped = false;
        true
    }

    fn is_path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        match self.destination {
            Some(dest) => self.position.distance(&dest),
            None => 0.0,
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn velocity(&self) -> Vec3 {
        match (self.stopped, self.destination) {
            (false, Some(dest)) => (dest - self.position).normalize() * self.speed,
            _ => Vec3::ZERO,
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}
