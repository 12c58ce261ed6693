//! Per-agent energy: continuous drain, goal-driven recharge

use serde::{Deserialize, Serialize};

use crate::core::config::GuardConfig;

/// Stamina scalar hard-clamped to [0, max] at every integration step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyState {
    current: f32,
    max: f32,
    /// Drain per second before the difficulty multiplier
    drain_rate: f32,
    recharge_rate: f32,
    recharging: bool,
}

impl EnergyState {
    pub fn new(max: f32, drain_rate: f32, recharge_rate: f32) -> Self {
        Self {
            current: max,
            max,
            drain_rate,
            recharge_rate,
            recharging: false,
        }
    }

    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(
            config.max_energy,
            config.energy_drain_rate,
            config.energy_recharge_rate,
        )
    }

    /// Drain one tick while active; no-op while recharging
    ///
    /// `difficulty_multiplier` comes from the EnergyUsage translation.
    pub fn drain(&mut self, dt: f32, difficulty_multiplier: f32) {
        if self.recharging {
            return;
        }
        let loss = self.drain_rate * difficulty_multiplier.max(0.0) * dt;
        self.current = (self.current - loss).clamp(0.0, self.max);
    }

    pub fn start_recharge(&mut self) {
        self.recharging = true;
    }

    /// Integrate one recharge tick; returns true the moment energy is full
    pub fn recharge(&mut self, dt: f32) -> bool {
        self.current = (self.current + self.recharge_rate * dt).clamp(0.0, self.max);
        if self.current >= self.max {
            self.recharging = false;
            true
        } else {
            false
        }
    }

    /// Abandon an unfinished recharge (the action was interrupted)
    pub fn interrupt_recharge(&mut self) {
        self.recharging = false;
    }

    pub fn is_recharging(&self) -> bool {
        self.recharging
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    pub fn reset(&mut self) {
        self.current = self.max;
        self.recharging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_never_goes_negative() {
        let mut energy = EnergyState::new(10.0, 100.0, 8.0);
        energy.drain(1.0, 1.0);
        assert_eq!(energy.current(), 0.0);
        assert!(energy.is_depleted());
    }

    #[test]
    fn test_recharge_completes_exactly_at_max() {
        let mut energy = EnergyState::new(100.0, 1.0, 8.0);
        energy.drain(200.0, 1.0);
        assert!(energy.is_depleted());
        energy.start_recharge();

        // 100 / 8 = 12.5 seconds to full
        let mut elapsed = 0.0;
        let dt = 0.1;
        let mut finished_at = None;
        while finished_at.is_none() && elapsed < 20.0 {
            elapsed += dt;
            if energy.recharge(dt) {
                finished_at = Some(elapsed);
            }
        }
        let finished_at = finished_at.expect("recharge finished");
        assert!((finished_at - 12.5).abs() < dt + 1e-4);
        assert!(energy.is_full());
        assert!(!energy.is_recharging());
    }

    #[test]
    fn test_drain_paused_while_recharging() {
        let mut energy = EnergyState::new(100.0, 10.0, 8.0);
        energy.start_recharge();
        let before = energy.current();
        energy.drain(1.0, 1.0);
        assert_eq!(energy.current(), before);
    }

    #[test]
    fn test_difficulty_multiplier_scales_drain() {
        let mut easy = EnergyState::new(100.0, 2.0, 8.0);
        let mut hard = EnergyState::new(100.0, 2.0, 8.0);
        easy.drain(1.0, 0.8);
        hard.drain(1.0, 1.2);
        assert!(hard.current() < easy.current());
    }

    #[test]
    fn test_recharge_never_overshoots() {
        let mut energy = EnergyState::new(100.0, 1.0, 50.0);
        energy.start_recharge();
        energy.recharge(10.0);
        assert_eq!(energy.current(), 100.0);
    }
}
