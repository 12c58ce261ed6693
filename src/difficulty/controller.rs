//! Dynamic difficulty controller
//!
//! Player metrics flow in through per-metric response curves; the
//! aggregate is the clamped sum of the latest contribution per metric.
//! Consumers read the aggregate through their own translation curves.

use ahash::AHashMap;

use crate::core::error::WardenError;
use crate::difficulty::curve::ResponseCurve;
use crate::difficulty::tables::{Consumer, ConsumerBounds, DifficultyTables, PlayerMetric};

/// Fixed step used by the tuning override (0 / 25 / 50 / 75 / 100)
const OVERRIDE_STEP_PERCENT: f32 = 25.0;

#[derive(Debug)]
pub struct DifficultyController {
    metric_curves: AHashMap<PlayerMetric, ResponseCurve>,
    consumer_curves: AHashMap<Consumer, (ResponseCurve, Option<ConsumerBounds>)>,
    /// Latest contribution per metric; insertion order preserved for
    /// stable diagnostics output
    contributions: Vec<(PlayerMetric, f32)>,
    /// Tuning override: freezes the aggregate to a fixed percentage
    override_percent: Option<f32>,
}

impl DifficultyController {
    pub fn new(tables: DifficultyTables) -> Self {
        Self {
            metric_curves: tables.metric_curves,
            consumer_curves: tables.consumer_curves,
            contributions: Vec::new(),
            override_percent: None,
        }
    }

    /// Re-evaluate one metric's curve and replace its stored contribution
    ///
    /// Latest sample wins; there is no integration over history. A metric
    /// without a configured curve contributes zero. NaN/inf outputs are
    /// reported and sanitized to zero so they can never reach a speed or
    /// cost computation.
    pub fn alter(&mut self, metric: PlayerMetric, raw_value: f32) {
        let contribution = match self.metric_curves.get(&metric) {
            Some(curve) => {
                let value = curve.evaluate(raw_value);
                if value.is_finite() {
                    value
                } else {
                    let err = WardenError::NumericAnomaly { context: "difficulty contribution", value };
                    tracing::warn!(?metric, raw_value, %err, "using 0");
                    0.0
                }
            }
            None => {
                let err = WardenError::ConfigurationGap(format!("metric {metric:?}"));
                tracing::warn!(%err, "contributing 0");
                0.0
            }
        };

        match self.contributions.iter_mut().find(|(m, _)| *m == metric) {
            Some(slot) => slot.1 = contribution,
            None => self.contributions.push((metric, contribution)),
        }
        tracing::debug!(?metric, raw_value, contribution, "difficulty altered");
    }

    /// Current aggregate difficulty in [0, 1], recomputed on every call
    pub fn get(&self) -> f32 {
        if let Some(percent) = self.override_percent {
            return percent / 100.0;
        }
        let sum: f32 = self
            .contributions
            .iter()
            .map(|(metric, c)| {
                if c.is_finite() {
                    *c
                } else {
                    tracing::warn!(?metric, value = *c, "non-finite stored contribution ignored");
                    0.0
                }
            })
            .sum();
        sum.clamp(0.0, 1.0)
    }

    /// Aggregate as a whole percentage, for UI display
    pub fn percent(&self) -> f32 {
        self.get() * 100.0
    }

    /// Map the aggregate through one consumer's translation curve
    ///
    /// A consumer without a curve gets the neutral modifier 1.0 rather
    /// than zeroing its subsystem.
    pub fn translate(&self, consumer: Consumer) -> f32 {
        let Some((curve, bounds)) = self.consumer_curves.get(&consumer) else {
            let err = WardenError::ConfigurationGap(format!("consumer {consumer:?}"));
            tracing::warn!(%err, "using neutral 1.0");
            return 1.0;
        };
        let raw = curve.evaluate(self.get());
        let value = if raw.is_finite() {
            raw
        } else {
            let err = WardenError::NumericAnomaly { context: "difficulty translation", value: raw };
            tracing::warn!(?consumer, %err, "using neutral 1.0");
            1.0
        };
        match bounds {
            Some(b) => value.clamp(b.min, b.max),
            None => value,
        }
    }

    /// Latest stored contribution for a metric, if any (diagnostics)
    pub fn contribution(&self, metric: PlayerMetric) -> Option<f32> {
        self.contributions.iter().find(|(m, _)| *m == metric).map(|(_, c)| *c)
    }

    // --- tuning override -------------------------------------------------

    /// Freeze the aggregate to a fixed percentage, bypassing live tracking
    pub fn set_override(&mut self, percent: f32) {
        self.override_percent = Some(percent.clamp(0.0, 100.0));
    }

    /// Step the frozen percentage up or down by 25 points, clamped;
    /// enables override mode starting from the live value if needed
    pub fn step_override(&mut self, up: bool) -> f32 {
        let current = self.override_percent.unwrap_or_else(|| self.percent());
        let stepped = if up {
            current + OVERRIDE_STEP_PERCENT
        } else {
            current - OVERRIDE_STEP_PERCENT
        };
        // Snap to the step grid so repeated presses land on 0/25/50/75/100
        let snapped = (stepped / OVERRIDE_STEP_PERCENT).round() * OVERRIDE_STEP_PERCENT;
        let clamped = snapped.clamp(0.0, 100.0);
        self.override_percent = Some(clamped);
        clamped
    }

    pub fn clear_override(&mut self) {
        self.override_percent = None;
    }

    pub fn is_overridden(&self) -> bool {
        self.override_percent.is_some()
    }

    /// Retry/checkpoint reset: drop tracked contributions and override
    pub fn reset_run(&mut self) {
        self.contributions.clear();
        self.override_percent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::curve::ResponseCurve;

    fn controller() -> DifficultyController {
        DifficultyController::new(DifficultyTables::builtin())
    }

    #[test]
    fn test_alter_stores_exact_curve_output() {
        let mut dda = controller();
        dda.alter(PlayerMetric::EvasionTime, 60.0);
        let expected = DifficultyTables::builtin().metric_curves[&PlayerMetric::EvasionTime].evaluate(60.0);
        assert_eq!(dda.contribution(PlayerMetric::EvasionTime), Some(expected));
    }

    #[test]
    fn test_latest_sample_wins() {
        let mut dda = controller();
        dda.alter(PlayerMetric::EvasionTime, 5.0);
        dda.alter(PlayerMetric::EvasionTime, 60.0);
        let tables = DifficultyTables::builtin();
        let expected = tables.metric_curves[&PlayerMetric::EvasionTime].evaluate(60.0);
        assert_eq!(dda.contribution(PlayerMetric::EvasionTime), Some(expected));
        // Not cumulative
        assert!(dda.get() <= 1.0);
    }

    #[test]
    fn test_aggregate_clamped_both_ends() {
        let mut tables = DifficultyTables::builtin();
        tables
            .metric_curves
            .insert(PlayerMetric::EvasionTime, ResponseCurve::constant(5.0));
        tables
            .metric_curves
            .insert(PlayerMetric::CaptureCount, ResponseCurve::constant(-9.0));
        let mut dda = DifficultyController::new(tables);

        dda.alter(PlayerMetric::EvasionTime, 0.0);
        assert_eq!(dda.get(), 1.0);

        dda.alter(PlayerMetric::CaptureCount, 0.0);
        assert_eq!(dda.get(), 0.0);
    }

    #[test]
    fn test_unknown_metric_contributes_zero() {
        let mut tables = DifficultyTables::builtin();
        tables.metric_curves.remove(&PlayerMetric::DetectionCount);
        let mut dda = DifficultyController::new(tables);
        dda.alter(PlayerMetric::DetectionCount, 3.0);
        assert_eq!(dda.contribution(PlayerMetric::DetectionCount), Some(0.0));
    }

    #[test]
    fn test_missing_consumer_curve_is_neutral() {
        let mut tables = DifficultyTables::builtin();
        tables.consumer_curves.remove(&Consumer::ActionCost);
        let dda = DifficultyController::new(tables);
        assert_eq!(dda.translate(Consumer::ActionCost), 1.0);
    }

    #[test]
    fn test_override_steps_snap_and_clamp() {
        let mut dda = controller();
        dda.set_override(50.0);
        assert_eq!(dda.step_override(true), 75.0);
        assert_eq!(dda.step_override(true), 100.0);
        assert_eq!(dda.step_override(true), 100.0);
        assert_eq!(dda.step_override(false), 75.0);
        dda.clear_override();
        assert!(!dda.is_overridden());
    }

    #[test]
    fn test_override_freezes_aggregate() {
        let mut dda = controller();
        dda.set_override(75.0);
        dda.alter(PlayerMetric::EvasionTime, 60.0);
        assert_eq!(dda.get(), 0.75);
    }

    #[test]
    fn test_reset_run_clears_state() {
        let mut dda = controller();
        dda.alter(PlayerMetric::EvasionTime, 60.0);
        dda.set_override(25.0);
        dda.reset_run();
        assert_eq!(dda.get(), 0.0);
        assert_eq!(dda.contribution(PlayerMetric::EvasionTime), None);
    }

    #[test]
    fn test_non_finite_curve_output_sanitized() {
        let mut tables = DifficultyTables::builtin();
        tables
            .metric_curves
            .insert(PlayerMetric::EvasionTime, ResponseCurve::constant(f32::NAN));
        let mut dda = DifficultyController::new(tables);
        dda.alter(PlayerMetric::EvasionTime, 1.0);
        assert_eq!(dda.contribution(PlayerMetric::EvasionTime), Some(0.0));
        assert!(dda.get().is_finite());
    }
}
