//! Read-only view of the session for the HUD

use serde::{Deserialize, Serialize};

use super::events::HitKind;
use super::session::{GameSession, LevelOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub level_id: u32,
    pub hp: f32,
    pub hp_max: f32,
    pub combo: u32,
    pub combo_max: u32,
    pub combo_quality: f32,
    pub combo_window: f32,
    pub gauge: f32,
    pub m: f32,
    pub q: f32,
    pub p_super: f32,
    pub regen_rate: f32,
    pub super_needles: u32,
    pub use_super: bool,
    pub coins: u32,
    pub shards: u32,
    pub cards: u32,
    pub needle_limit_enabled: bool,
    pub needles_remaining: u32,
    pub outcome: LevelOutcome,
    pub last_hit: HitKind,
    pub boss_phase_active: u32,
    pub boss_phase_total: u32,
    pub time_scale: f32,
    pub paused: bool,
}

impl GameSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        let drops = self.drops();
        let (boss_phase_active, boss_phase_total) = self.boss_phase_progress();
        SessionSnapshot {
            level_id: self.level_id(),
            hp: self.hp(),
            hp_max: self.hp_max(),
            combo: self.combo(),
            combo_max: self.combo_max(),
            combo_quality: self.combo_quality(),
            combo_window: self.combo_window(),
            gauge: self.gauge(),
            m: self.m(),
            q: self.q(),
            p_super: self.p_super(),
            regen_rate: self.regen_rate(),
            super_needles: self.super_needles(),
            use_super: self.use_super(),
            coins: drops.coins,
            shards: drops.shards,
            cards: drops.cards,
            needle_limit_enabled: self.needle_limit_enabled(),
            needles_remaining: self.needles_remaining(),
            outcome: self.outcome(),
            last_hit: self.last_hit(),
            boss_phase_active,
            boss_phase_total,
            time_scale: self.time_scale(),
            paused: self.is_paused(),
        }
    }
}
