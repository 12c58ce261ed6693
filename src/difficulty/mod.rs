//! Dynamic difficulty: response curves, the feedback controller and tables

pub mod controller;
pub mod curve;
pub mod tables;

pub use controller::DifficultyController;
pub use curve::{CurveKey, ResponseCurve};
pub use tables::{Consumer, DifficultyTables, PlayerMetric};
