//! Shared cross-agent context
//!
//! The alert coordinator and difficulty controller are the only mutable
//! state shared between agents. They are constructed once and passed to
//! agents explicitly; there are no ambient statics, which keeps test
//! isolation trivial and makes checkpoint resets a single call.

use crate::alert::AlertCoordinator;
use crate::difficulty::{DifficultyController, DifficultyTables};

#[derive(Debug)]
pub struct SharedContext {
    pub alerts: AlertCoordinator,
    pub difficulty: DifficultyController,
    /// Accumulated sim time in seconds, advanced once per tick
    pub time: f64,
}

impl SharedContext {
    pub fn new(tables: DifficultyTables) -> Self {
        Self {
            alerts: AlertCoordinator::new(),
            difficulty: DifficultyController::new(tables),
            time: 0.0,
        }
    }

    /// Retry/checkpoint reset; time stays monotonic
    pub fn reset_run(&mut self) {
        self.alerts.reset();
        self.difficulty.reset_run();
    }
}
