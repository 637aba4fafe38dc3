//! Per-attempt session state
//!
//! Owns every counter the HUD shows and every rule that turns hits into
//! progress. Fields are private: the combat pipeline and the world mutate the
//! session only through the named operations below.

use serde::{Deserialize, Serialize};

use super::economy::EconomyEngine;
use super::events::{Drops, HitKind};
use super::formula::FormulaEngine;
use super::rng::RandomSource;
use crate::consts::HIT_STOP_TIME_SCALE;
use crate::error::SimError;
use crate::tuning::{ComboClock, ConfigBundle, LevelConfig};

/// Terminal state of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelOutcome {
    #[default]
    InProgress,
    Cleared,
    Failed,
}

/// Result of a weak-point hit as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeakPointOutcome {
    /// `WeakPoint` or `Timeout`
    pub kind: HitKind,
    pub super_granted: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    level: LevelConfig,
    formula: FormulaEngine,
    economy: EconomyEngine,
    rng: RandomSource,

    hp_current: f32,
    hp_max: f32,
    outcome: LevelOutcome,
    paused: bool,

    combo: u32,
    combo_max: u32,
    combo_quality: f32,
    combo_elapsed: f32,
    combo_window: f32,

    gauge: f32,
    super_needle_count: u32,
    use_super: bool,
    drops: Drops,

    needle_limit_enabled: bool,
    needles_remaining: u32,

    time_scale: f32,
    hit_stop_timer: f32,

    // Derived cache
    m: f32,
    q: f32,
    regen_rate: f32,
    p_super: f32,

    last_hit: HitKind,
    boss_phase_active: u32,
    boss_phase_total: u32,
}

impl GameSession {
    /// Build a session for `level_id`, falling back to the lowest configured level
    pub fn new(bundle: &ConfigBundle, level_id: u32, seed: u64) -> Result<Self, SimError> {
        let level = bundle.resolve_level(level_id).ok_or(SimError::NoLevels)?;
        if level.level_id != level_id {
            log::warn!(
                "Level {} not found, falling back to level {}",
                level_id,
                level.level_id
            );
        }
        if !level.hp.is_finite() || level.hp <= 0.0 {
            return Err(SimError::InvalidLevel {
                level_id: level.level_id,
                hp: level.hp,
            });
        }

        let formula = FormulaEngine::new(bundle.combat_formula.clone());
        let combo_window = formula.combo_window(level.level_id);

        let mut session = Self {
            level: level.clone(),
            formula,
            economy: EconomyEngine::new(bundle.economy.clone()),
            rng: RandomSource::new(seed),
            hp_current: level.hp,
            hp_max: level.hp,
            outcome: LevelOutcome::InProgress,
            paused: false,
            combo: 0,
            combo_max: 0,
            combo_quality: 0.0,
            combo_elapsed: 0.0,
            combo_window,
            gauge: 0.0,
            super_needle_count: 0,
            use_super: false,
            drops: Drops::default(),
            needle_limit_enabled: false,
            needles_remaining: 0,
            time_scale: 1.0,
            hit_stop_timer: 0.0,
            m: 1.0,
            q: 1.0,
            regen_rate: 0.0,
            p_super: 0.0,
            last_hit: HitKind::Miss,
            boss_phase_active: 0,
            boss_phase_total: 0,
        };
        session.configure_needle_limit(
            level.limit_needles_enabled,
            level.limit_needles.unwrap_or(0),
        );
        session.refresh_derived();

        log::info!(
            "Session start: level {} hp={} window={:.2}s seed={}",
            session.level.level_id,
            session.hp_max,
            session.combo_window,
            seed
        );
        Ok(session)
    }

    // --- Time ---

    /// Advance hit-stop and the combo timeout clock by a real frame delta
    pub fn advance_time(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        if self.hit_stop_timer > 0.0 {
            self.hit_stop_timer -= dt;
            if self.hit_stop_timer <= 0.0 {
                self.hit_stop_timer = 0.0;
                self.time_scale = 1.0;
            } else {
                self.time_scale = HIT_STOP_TIME_SCALE;
            }
        }

        if self.combo > 0 {
            self.combo_elapsed += match self.formula.config().combo_clock {
                ComboClock::GameTime => dt * self.time_scale,
                ComboClock::RealTime => dt,
            };
        }
    }

    /// Near-freeze the simulation for `duration` real seconds
    pub fn request_hit_stop(&mut self, duration: f32) {
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        self.hit_stop_timer = duration;
        self.time_scale = HIT_STOP_TIME_SCALE;
    }

    // --- Hits ---

    /// Combo progress, gauge growth and the super-needle roll for a real weak point
    pub fn on_weak_point_hit(&mut self) -> WeakPointOutcome {
        let timed_out = self.combo > 0 && self.combo_elapsed > self.combo_window;
        let kind = if timed_out {
            self.combo = 1;
            self.combo_quality -= 1.0;
            HitKind::Timeout
        } else {
            self.combo += 1;
            HitKind::WeakPoint
        };
        self.last_hit = kind;
        self.combo_max = self.combo_max.max(self.combo);
        self.combo_elapsed = 0.0;

        self.refresh_derived();

        self.gauge += self.economy.gauge_delta(self.m, self.combo_quality);

        // Either condition grants the charge on its own
        let roll = self.rng.roll();
        let super_granted = self.gauge >= 1.0 || roll <= self.p_super;
        if super_granted {
            self.super_needle_count += 1;
            self.gauge = 0.0;
            log::debug!(
                "Super needle granted (total {}), combo {}",
                self.super_needle_count,
                self.combo
            );
        }

        WeakPointOutcome {
            kind,
            super_granted,
        }
    }

    /// Roll coin, shard and card independently from the current Q
    pub fn apply_drops(&mut self) -> Drops {
        let chances = self.economy.drop_probabilities(self.q);
        let mut dropped = Drops::default();
        if self.rng.roll() < chances.coin {
            dropped.coins = 1;
        }
        if self.rng.roll() < chances.shard {
            dropped.shards = 1;
        }
        if self.rng.roll() < chances.card {
            dropped.cards = 1;
        }
        self.drops.coins += dropped.coins;
        self.drops.shards += dropped.shards;
        self.drops.cards += dropped.cards;
        dropped
    }

    pub fn on_shield_hit(&mut self) {
        self.apply_mistake(HitKind::Shield);
    }

    pub fn on_miss(&mut self) {
        self.apply_mistake(HitKind::Miss);
    }

    /// Decoy weak point
    pub fn on_blocked(&mut self) {
        self.apply_mistake(HitKind::Blocked);
    }

    /// Core hit instead of a weak point
    pub fn on_body_hit(&mut self) {
        self.apply_mistake(HitKind::Body);
    }

    fn apply_mistake(&mut self, kind: HitKind) {
        self.last_hit = kind;
        self.combo = self.formula.mistake_combo(self.combo);
        self.combo_quality -= 1.0;
        self.combo_elapsed = 0.0;
        self.refresh_derived();
    }

    /// Recompute M, Q, regen rate and super-needle probability
    pub fn refresh_derived(&mut self) {
        self.m = self.formula.combo_multiplier(self.combo);
        self.q = self.formula.quality_factor(self.combo_max, self.combo_quality);
        self.p_super =
            self.formula
                .super_needle_probability(self.economy.config(), self.m, self.combo_quality);
        self.regen_rate = match self.level.regen_spec() {
            Some(regen) => self.formula.regen_rate(regen.base, self.m, self.combo_quality),
            None => 0.0,
        };
    }

    // --- Needles ---

    pub fn configure_needle_limit(&mut self, enabled: bool, limit: u32) {
        self.needle_limit_enabled = enabled;
        self.needles_remaining = if enabled { limit } else { 0 };
    }

    pub fn can_fire(&self) -> bool {
        !self.needle_limit_enabled || self.needles_remaining > 0
    }

    pub fn consume_needle(&mut self) {
        if self.needle_limit_enabled {
            self.needles_remaining = self.needles_remaining.saturating_sub(1);
        }
    }

    pub fn toggle_super(&mut self) {
        self.use_super = !self.use_super;
    }

    pub fn set_use_super(&mut self, on: bool) {
        self.use_super = on;
    }

    /// Spend a super charge if the player asked for one and has it
    pub fn take_super_needle(&mut self) -> bool {
        if self.use_super && self.super_needle_count > 0 {
            self.super_needle_count -= 1;
            true
        } else {
            false
        }
    }

    // --- Health ---

    /// Reset the aggregate pool (multi-target levels sum their targets)
    pub fn set_total_hp(&mut self, hp_max: f32) {
        if !hp_max.is_finite() {
            return;
        }
        self.hp_max = hp_max.max(0.0);
        self.hp_current = self.hp_max;
    }

    pub fn apply_level_damage(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.hp_current = (self.hp_current - amount).max(0.0);
    }

    pub fn apply_level_heal(&mut self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            return;
        }
        self.hp_current = (self.hp_current + amount).min(self.hp_max);
    }

    // --- Outcome ---

    pub fn mark_cleared(&mut self) {
        if self.outcome == LevelOutcome::InProgress {
            self.outcome = LevelOutcome::Cleared;
            log::info!("Level {} cleared (max combo {})", self.level.level_id, self.combo_max);
        }
    }

    /// Fail the attempt, keeping part of the gauge for the next one
    pub fn apply_failure(&mut self) {
        if self.outcome != LevelOutcome::InProgress {
            return;
        }
        self.outcome = LevelOutcome::Failed;
        self.gauge = self.economy.carry_gauge_on_fail(self.gauge);
        log::info!(
            "Level {} failed, gauge carried: {:.3}",
            self.level.level_id,
            self.gauge
        );
    }

    /// Seed the gauge of a fresh attempt with what a failed one carried
    pub fn carry_gauge(&mut self, gauge: f32) {
        if gauge.is_finite() {
            self.gauge = gauge.max(0.0);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn set_boss_phase_progress(&mut self, active: u32, total: u32) {
        self.boss_phase_active = active;
        self.boss_phase_total = total;
    }

    // --- Accessors ---

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn level_id(&self) -> u32 {
        self.level.level_id
    }

    pub fn hp(&self) -> f32 {
        self.hp_current
    }

    pub fn hp_max(&self) -> f32 {
        self.hp_max
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn combo_max(&self) -> u32 {
        self.combo_max
    }

    pub fn combo_quality(&self) -> f32 {
        self.combo_quality
    }

    pub fn combo_elapsed(&self) -> f32 {
        self.combo_elapsed
    }

    pub fn combo_window(&self) -> f32 {
        self.combo_window
    }

    pub fn gauge(&self) -> f32 {
        self.gauge
    }

    pub fn super_needles(&self) -> u32 {
        self.super_needle_count
    }

    pub fn use_super(&self) -> bool {
        self.use_super
    }

    /// Running drop totals
    pub fn drops(&self) -> Drops {
        self.drops
    }

    pub fn needle_limit_enabled(&self) -> bool {
        self.needle_limit_enabled
    }

    pub fn needles_remaining(&self) -> u32 {
        self.needles_remaining
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome != LevelOutcome::InProgress
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn m(&self) -> f32 {
        self.m
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    pub fn p_super(&self) -> f32 {
        self.p_super
    }

    pub fn last_hit(&self) -> HitKind {
        self.last_hit
    }

    pub fn boss_phase_progress(&self) -> (u32, u32) {
        (self.boss_phase_active, self.boss_phase_total)
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
