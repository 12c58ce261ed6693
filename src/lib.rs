//! Night Warden - stealth-game guard AI core
//!
//! Goal-oriented guards: vision-cone perception with detection
//! hysteresis, a fact-based planner, a shared alert registry, per-agent
//! energy and a dynamic difficulty feedback loop, all driven by a
//! single-threaded simulation tick. Rendering, animation, audio and the
//! navigation solver live behind narrow trait seams.

pub mod agent;
pub mod alert;
pub mod core;
pub mod difficulty;
pub mod energy;
pub mod facts;
pub mod interface;
pub mod perception;
pub mod planner;
pub mod simulation;
