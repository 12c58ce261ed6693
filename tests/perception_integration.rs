//! Perception integration tests
//!
//! Vision cone, line-of-sight occlusion and the detection meter working
//! together through `Perception::observe`.

use night_warden::core::config::GuardConfig;
use night_warden::core::types::{Pose, Vec3};
use night_warden::interface::spatial::{OpenField, WallGrid};
use night_warden::perception::Perception;

fn perception() -> Perception {
    Perception::from_config(&GuardConfig::default())
}

#[test]
fn test_continuous_sight_latches_spotted() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
    let target = Vec3::new(0.0, 0.0, 5.0);

    // detection_delay is 1.0s; ten 0.1s hits fill the charge exactly
    for _ in 0..10 {
        assert!(perception.observe(&eye, Some(target), &OpenField, 0.1, 1.0));
    }
    assert!(perception.meter.is_spotted());
    assert_eq!(perception.last_seen(), Some(target));
}

#[test]
fn test_wall_blocks_charge_entirely() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
    let target = Vec3::new(0.0, 0.0, 5.0);

    let mut grid = WallGrid::new();
    grid.add_wall(Vec3::new(-3.0, 0.0, 2.5), Vec3::new(3.0, 0.0, 2.5));

    for _ in 0..30 {
        assert!(!perception.observe(&eye, Some(target), &grid, 0.1, 1.0));
    }
    assert_eq!(perception.meter.charge(), 0.0);
    assert!(!perception.meter.is_spotted());
}

#[test]
fn test_cone_edge_is_inclusive() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    // Default horizontal half-angle is 50 degrees; 49 is inside, 51 out
    let inside = Vec3::new(5.0 * 49f32.to_radians().sin(), 0.0, 5.0 * 49f32.to_radians().cos());
    let outside = Vec3::new(5.0 * 51f32.to_radians().sin(), 0.0, 5.0 * 51f32.to_radians().cos());

    assert!(perception.observe(&eye, Some(inside), &OpenField, 0.1, 1.0));
    assert!(!perception.observe(&eye, Some(outside), &OpenField, 0.1, 1.0));
}

#[test]
fn test_view_distance_gates_everything() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    // Default view_distance is 18
    assert!(perception.observe(&eye, Some(Vec3::new(0.0, 0.0, 17.0)), &OpenField, 0.1, 1.0));
    assert!(!perception.observe(&eye, Some(Vec3::new(0.0, 0.0, 19.0)), &OpenField, 0.1, 1.0));
}

#[test]
fn test_grace_period_bridges_brief_occlusion() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
    let target = Vec3::new(0.0, 0.0, 5.0);

    for _ in 0..10 {
        perception.observe(&eye, Some(target), &OpenField, 0.1, 1.0);
    }
    assert!(perception.meter.is_spotted());

    // Target gone for 1.5s: inside the 2s grace window
    for _ in 0..15 {
        perception.observe(&eye, None, &OpenField, 0.1, 1.0);
        assert!(perception.meter.is_spotted());
    }
    // Another second: grace expires
    for _ in 0..10 {
        perception.observe(&eye, None, &OpenField, 0.1, 1.0);
    }
    assert!(!perception.meter.is_spotted());
}

#[test]
fn test_pause_suspends_and_resume_restores() {
    let mut perception = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
    let target = Vec3::new(0.0, 0.0, 5.0);

    perception.pause();
    for _ in 0..20 {
        assert!(!perception.observe(&eye, Some(target), &OpenField, 0.1, 1.0));
    }
    assert_eq!(perception.meter.charge(), 0.0);

    // No retroactive credit: the charge starts from zero after resuming
    perception.resume();
    assert!(perception.observe(&eye, Some(target), &OpenField, 0.1, 1.0));
    assert!((perception.meter.charge() - 0.1).abs() < 1e-5);
}

#[test]
fn test_decay_multiplier_speeds_forgetting() {
    let mut lenient = perception();
    let mut strict = perception();
    let eye = Pose::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
    let target = Vec3::new(0.0, 0.0, 5.0);

    for _ in 0..8 {
        lenient.observe(&eye, Some(target), &OpenField, 0.1, 1.0);
        strict.observe(&eye, Some(target), &OpenField, 0.1, 1.0);
    }
    // Lenient decay (low difficulty) drains faster
    for _ in 0..5 {
        lenient.observe(&eye, None, &OpenField, 0.1, 1.5);
        strict.observe(&eye, None, &OpenField, 0.1, 0.75);
    }
    assert!(lenient.meter.charge() < strict.meter.charge());
}
