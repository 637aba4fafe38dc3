//! Reward economy
//!
//! Drop probabilities, super-needle gauge growth and the gauge kept after a
//! failed attempt.

use serde::{Deserialize, Serialize};

use crate::clamp;
use crate::tuning::EconomyConfig;

/// Independent per-hit drop chances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropChances {
    pub coin: f32,
    pub shard: f32,
    pub card: f32,
}

#[derive(Debug, Clone)]
pub struct EconomyEngine {
    cfg: EconomyConfig,
}

impl EconomyEngine {
    pub fn new(cfg: EconomyConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.cfg
    }

    pub fn drop_probabilities(&self, q: f32) -> DropChances {
        DropChances {
            coin: clamp(self.cfg.drop_coin_p0 * q, 0.0, self.cfg.drop_coin_p_max),
            shard: clamp(self.cfg.drop_shard_p0 * q, 0.0, self.cfg.drop_shard_p_max),
            card: clamp(self.cfg.drop_card_p0 * q, 0.0, self.cfg.drop_card_p_max),
        }
    }

    pub fn gauge_delta(&self, m: f32, combo_quality: f32) -> f32 {
        self.cfg.gauge_a + self.cfg.gauge_b * (m - 1.0) + self.cfg.gauge_c * combo_quality.max(0.0)
    }

    pub fn carry_gauge_on_fail(&self, gauge: f32) -> f32 {
        gauge * self.cfg.gauge_carry_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(f: impl FnOnce(&mut EconomyConfig)) -> EconomyEngine {
        let mut cfg = EconomyConfig::default();
        f(&mut cfg);
        EconomyEngine::new(cfg)
    }

    #[test]
    fn test_gauge_delta() {
        let e = engine_with(|c| {
            c.gauge_a = 0.1;
            c.gauge_b = 0.05;
            c.gauge_c = 0.02;
        });
        assert!((e.gauge_delta(1.5, 2.0) - 0.165).abs() < 1e-6);
        // Negative quality contributes nothing
        assert!((e.gauge_delta(1.0, -3.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_drop_probability_clamps_to_max() {
        let e = engine_with(|c| {
            c.drop_coin_p0 = 0.1;
            c.drop_coin_p_max = 0.3;
        });
        let p = e.drop_probabilities(5.0);
        assert!((p.coin - 0.3).abs() < 1e-6);
        let p = e.drop_probabilities(2.0);
        assert!((p.coin - 0.2).abs() < 1e-6);
        let p = e.drop_probabilities(-1.0);
        assert_eq!(p.coin, 0.0);
    }

    #[test]
    fn test_carry_gauge_on_fail() {
        let e = engine_with(|c| c.gauge_carry_fail = 0.5);
        assert!((e.carry_gauge_on_fail(0.8) - 0.4).abs() < 1e-6);
    }
}
