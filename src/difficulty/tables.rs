//! Difficulty curve tables loaded from TOML
//!
//! Two independent tables: metric curves map raw player measurements to
//! difficulty contributions; consumer curves map the aggregate scalar to
//! one subsystem's modifier. Designers tune "what difficulty is" and
//! "what it changes" separately.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WardenError};
use crate::difficulty::curve::{CurveKey, ResponseCurve};

/// Tracked player behavior measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMetric {
    /// Seconds between successful thefts; short gaps mean a confident player
    TimeBetweenThefts,
    /// Seconds the player evaded an active pursuit
    EvasionTime,
    /// Times the player has been caught this run
    CaptureCount,
    /// Times the player fully triggered a detection
    DetectionCount,
}

/// Subsystems that consume a translated difficulty modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consumer {
    GuardSpeed,
    EnergyUsage,
    ActionCost,
    DetectionDecay,
}

/// Optional output bounds on a consumer curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsumerBounds {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConsumerCurveSpec {
    keys: Vec<CurveKey>,
    min: Option<f32>,
    max: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetricCurveSpec {
    keys: Vec<CurveKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TablesFile {
    #[serde(default)]
    metrics: AHashMap<PlayerMetric, MetricCurveSpec>,
    #[serde(default)]
    consumers: AHashMap<Consumer, ConsumerCurveSpec>,
}

/// Parsed, normalized curve tables
#[derive(Debug, Clone)]
pub struct DifficultyTables {
    pub metric_curves: AHashMap<PlayerMetric, ResponseCurve>,
    pub consumer_curves: AHashMap<Consumer, (ResponseCurve, Option<ConsumerBounds>)>,
}

impl DifficultyTables {
    /// Load from a TOML file; failure here is the one fatal startup error
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WardenError::ConfigLoad(format!("difficulty tables {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: TablesFile = toml::from_str(content)?;

        let metric_curves = file
            .metrics
            .into_iter()
            .map(|(metric, spec)| (metric, ResponseCurve::new(spec.keys)))
            .collect();

        let consumer_curves = file
            .consumers
            .into_iter()
            .map(|(consumer, spec)| {
                let bounds = normalize_bounds(consumer, spec.min, spec.max);
                (consumer, (ResponseCurve::new(spec.keys), bounds))
            })
            .collect();

        Ok(Self { metric_curves, consumer_curves })
    }

    /// Built-in tables used by tests and as a sane baseline
    pub fn builtin() -> Self {
        let mut metric_curves = AHashMap::new();
        // Fast thefts push difficulty up; a 2-minute gap contributes nothing
        metric_curves.insert(
            PlayerMetric::TimeBetweenThefts,
            ResponseCurve::linear((10.0, 0.35), (120.0, 0.0)),
        );
        // Long evasions mean the player outruns guards comfortably
        metric_curves.insert(
            PlayerMetric::EvasionTime,
            ResponseCurve::linear((5.0, 0.0), (60.0, 0.3)),
        );
        // Repeated captures ease off
        metric_curves.insert(
            PlayerMetric::CaptureCount,
            ResponseCurve::linear((0.0, 0.0), (5.0, -0.4)),
        );
        metric_curves.insert(
            PlayerMetric::DetectionCount,
            ResponseCurve::linear((0.0, 0.0), (8.0, -0.2)),
        );

        let mut consumer_curves = AHashMap::new();
        consumer_curves.insert(
            Consumer::GuardSpeed,
            (
                ResponseCurve::linear((0.0, 0.85), (1.0, 1.25)),
                Some(ConsumerBounds { min: 0.85, max: 1.25 }),
            ),
        );
        consumer_curves.insert(
            Consumer::EnergyUsage,
            (ResponseCurve::linear((0.0, 1.2), (1.0, 0.8)), None),
        );
        consumer_curves.insert(
            Consumer::ActionCost,
            (ResponseCurve::linear((0.0, 1.1), (1.0, 0.9)), None),
        );
        // Low difficulty decays detection faster (more forgiving)
        consumer_curves.insert(
            Consumer::DetectionDecay,
            (ResponseCurve::linear((0.0, 1.5), (1.0, 0.75)), None),
        );

        Self { metric_curves, consumer_curves }
    }
}

/// Inverted min/max pairs get swapped rather than trusted
fn normalize_bounds(consumer: Consumer, min: Option<f32>, max: Option<f32>) -> Option<ConsumerBounds> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            tracing::warn!(?consumer, min, max, "consumer bounds inverted, swapping");
            Some(ConsumerBounds { min: max, max: min })
        }
        (Some(min), Some(max)) => Some(ConsumerBounds { min, max }),
        (Some(min), None) => Some(ConsumerBounds { min, max: f32::INFINITY }),
        (None, Some(max)) => Some(ConsumerBounds { min: f32::NEG_INFINITY, max }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [metrics.evasion_time]
        keys = [{ at = 5.0, value = 0.0 }, { at = 60.0, value = 0.3 }]

        [consumers.guard_speed]
        keys = [{ at = 0.0, value = 0.85 }, { at = 1.0, value = 1.25 }]
        min = 0.85
        max = 1.25
    "#;

    #[test]
    fn test_parse_sample() {
        let tables = DifficultyTables::parse(SAMPLE).unwrap();
        let curve = &tables.metric_curves[&PlayerMetric::EvasionTime];
        assert_eq!(curve.evaluate(5.0), 0.0);
        assert!((curve.evaluate(60.0) - 0.3).abs() < 1e-5);
        assert!(tables.consumer_curves.contains_key(&Consumer::GuardSpeed));
    }

    #[test]
    fn test_inverted_bounds_are_swapped() {
        let content = r#"
            [consumers.guard_speed]
            keys = [{ at = 0.0, value = 1.0 }]
            min = 1.5
            max = 0.5
        "#;
        let tables = DifficultyTables::parse(content).unwrap();
        let (_, bounds) = &tables.consumer_curves[&Consumer::GuardSpeed];
        let bounds = bounds.unwrap();
        assert_eq!(bounds.min, 0.5);
        assert_eq!(bounds.max, 1.5);
    }

    #[test]
    fn test_broken_toml_is_an_error() {
        assert!(DifficultyTables::parse("[metrics.nope").is_err());
    }

    #[test]
    fn test_builtin_covers_all_consumers() {
        let tables = DifficultyTables::builtin();
        for consumer in [
            Consumer::GuardSpeed,
            Consumer::EnergyUsage,
            Consumer::ActionCost,
            Consumer::DetectionDecay,
        ] {
            assert!(tables.consumer_curves.contains_key(&consumer));
        }
    }
}
