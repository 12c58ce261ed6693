//! Property tests for the numeric invariants
//!
//! The detection charge and the difficulty aggregate both carry hard
//! range guarantees that downstream code relies on without re-checking.

use proptest::prelude::*;

use night_warden::difficulty::{
    Consumer, CurveKey, DifficultyController, DifficultyTables, PlayerMetric, ResponseCurve,
};
use night_warden::perception::DetectionMeter;

proptest! {
    /// Charge stays within [0, detection_delay] for any input sequence
    #[test]
    fn prop_detection_charge_bounded(
        steps in prop::collection::vec((any::<bool>(), 0.0f32..0.5, 0.0f32..3.0), 1..300)
    ) {
        let delay = 1.0;
        let mut meter = DetectionMeter::new(delay, 0.5, 2.0);
        for (hit, dt, mult) in steps {
            meter.update(hit, dt, mult);
            prop_assert!(meter.charge() >= 0.0);
            prop_assert!(meter.charge() <= delay);
        }
    }

    /// The aggregate is always inside [0, 1], whatever the metrics did
    #[test]
    fn prop_difficulty_aggregate_clamped(
        samples in prop::collection::vec((0u8..4, -1000.0f32..1000.0), 0..60)
    ) {
        let mut dda = DifficultyController::new(DifficultyTables::builtin());
        for (which, value) in samples {
            let metric = match which {
                0 => PlayerMetric::TimeBetweenThefts,
                1 => PlayerMetric::EvasionTime,
                2 => PlayerMetric::CaptureCount,
                _ => PlayerMetric::DetectionCount,
            };
            dda.alter(metric, value);
            let aggregate = dda.get();
            prop_assert!((0.0..=1.0).contains(&aggregate));
        }
    }

    /// Bounded consumers never escape their configured range
    #[test]
    fn prop_guard_speed_translation_bounded(
        samples in prop::collection::vec((0u8..4, -1000.0f32..1000.0), 0..60)
    ) {
        let mut dda = DifficultyController::new(DifficultyTables::builtin());
        for (which, value) in samples {
            let metric = match which {
                0 => PlayerMetric::TimeBetweenThefts,
                1 => PlayerMetric::EvasionTime,
                2 => PlayerMetric::CaptureCount,
                _ => PlayerMetric::DetectionCount,
            };
            dda.alter(metric, value);
            let speed = dda.translate(Consumer::GuardSpeed);
            prop_assert!((0.85..=1.25).contains(&speed));
        }
    }

    /// Linear interpolation never leaves the hull of its key values
    #[test]
    fn prop_curve_output_within_key_values(
        keys in prop::collection::vec((-100.0f32..100.0, -100.0f32..100.0), 1..10),
        query in -200.0f32..200.0,
    ) {
        let curve = ResponseCurve::new(
            keys.iter().map(|&(at, value)| CurveKey { at, value }).collect(),
        );
        let lo = keys.iter().map(|&(_, v)| v).fold(f32::INFINITY, f32::min);
        let hi = keys.iter().map(|&(_, v)| v).fold(f32::NEG_INFINITY, f32::max);
        let out = curve.evaluate(query);
        prop_assert!(out >= lo - 1e-3 && out <= hi + 1e-3);
    }

    /// Override stepping always lands on the 25-point grid
    #[test]
    fn prop_override_steps_stay_on_grid(directions in prop::collection::vec(any::<bool>(), 1..40)) {
        let mut dda = DifficultyController::new(DifficultyTables::builtin());
        for up in directions {
            let value = dda.step_override(up);
            prop_assert!((0.0..=100.0).contains(&value));
            prop_assert!((value % 25.0).abs() < 1e-4);
        }
    }
}
