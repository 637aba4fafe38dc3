//! Combat formulas
//!
//! Pure functions from the combat coefficient table and the current
//! combo/quality state to the derived scalars the session caches.

use crate::clamp;
use crate::tuning::{CombatFormulaConfig, EconomyConfig};

#[derive(Debug, Clone)]
pub struct FormulaEngine {
    cfg: CombatFormulaConfig,
}

impl FormulaEngine {
    pub fn new(cfg: CombatFormulaConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CombatFormulaConfig {
        &self.cfg
    }

    /// Combo window in seconds for a level, shrinking with the level index
    pub fn combo_window(&self, level_index: u32) -> f32 {
        let steps = level_index as f32 - 1.0;
        let value = self.cfg.combo_base - self.cfg.combo_decay_per_level * steps;
        clamp(value, self.cfg.combo_min, self.cfg.combo_base)
    }

    /// Combo multiplier M, rising toward `1 + alpha`
    pub fn combo_multiplier(&self, combo: u32) -> f32 {
        if self.cfg.m_k <= 0.0 {
            // Degenerate k: the curve is a step at combo 0
            return if combo > 0 { 1.0 + self.cfg.m_alpha } else { 1.0 };
        }
        1.0 + self.cfg.m_alpha * (1.0 - (-(combo as f32) / self.cfg.m_k).exp())
    }

    /// Quality factor Q
    pub fn quality_factor(&self, combo_max: u32, combo_quality: f32) -> f32 {
        let value = 1.0
            + self.cfg.q_combo_max_coef * combo_max as f32
            + self.cfg.q_quality_coef * combo_quality;
        clamp(value, self.cfg.q_min, self.cfg.q_max)
    }

    /// Regen rate after combo/quality suppression
    pub fn regen_rate(&self, regen_base: f32, m: f32, combo_quality: f32) -> f32 {
        let divisor =
            1.0 + self.cfg.regen_delta * (m - 1.0) + self.cfg.regen_eta * combo_quality.max(0.0);
        if divisor <= f32::EPSILON {
            return regen_base.max(0.0);
        }
        (regen_base / divisor).max(0.0)
    }

    /// Combo after a mistake: decays multiplicatively, never below zero
    pub fn mistake_combo(&self, combo: u32) -> u32 {
        (combo as f32 * self.cfg.combo_mistake_mul).floor().max(0.0) as u32
    }

    /// Chance that a weak-point hit grants a super needle
    pub fn super_needle_probability(&self, economy: &EconomyConfig, m: f32, combo_quality: f32) -> f32 {
        let value = economy.super_needle_p_base
            * (1.0 + economy.p_gamma * (m - 1.0))
            * (1.0 + economy.p_quality_coef * combo_quality);
        clamp(value, economy.super_needle_p_min, economy.super_needle_p_cap)
    }
}
