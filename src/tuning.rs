//! Data-driven game balance
//!
//! Immutable tuning tables consumed by the simulation. Field names follow the
//! JSON tables the content pipeline produces (`levelId`, `M_alpha`, ...), so an
//! embedder can hand a parsed [`ConfigBundle`] straight to the core. The core
//! itself never reads files.

use serde::{Deserialize, Serialize};

/// Enemy archetype identifiers (cosmetic for the core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetypeId {
    Standard,
    VariableSpin,
    OrbitalShield,
    EnergyShield,
    Regenerator,
    RearCore,
    Reflector,
    Decoy,
    Fusion,
    FinalBoss,
}

/// How a target's rotation speed evolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedMode {
    #[default]
    Fixed,
    /// Oscillates between `speed_min` and `speed_max`
    Variable,
}

/// Shield behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShieldKind {
    /// Orbits the target, indestructible
    Orbital,
    /// Stationary relative to the target, indestructible
    Energy,
    /// Orbits the target, removed on first hit
    Breakable,
}

impl ShieldKind {
    pub fn orbits(&self) -> bool {
        matches!(self, ShieldKind::Orbital | ShieldKind::Breakable)
    }

    pub fn breakable(&self) -> bool {
        *self == ShieldKind::Breakable
    }
}

/// Reflector movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectorMode {
    Fixed,
    /// Sweeps an ellipse in front of the target
    Move,
    /// Orbits the target
    Rotate,
}

/// One-shot boss phase, fired when the hp fraction drops to `hp_pct`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossPhaseConfig {
    pub hp_pct: f32,
    /// Rotation speed multiplier (1.0 leaves the current multiplier alone)
    #[serde(default = "one")]
    pub speed_mul: f32,
    /// Regen multiplier (1.0 leaves the current multiplier alone)
    #[serde(default = "one")]
    pub regen_mul: f32,
    #[serde(default)]
    pub add_shield: bool,
    #[serde(default)]
    pub weak_point_move: Option<bool>,
}

fn one() -> f32 {
    1.0
}

impl BossPhaseConfig {
    pub fn at(hp_pct: f32) -> Self {
        Self {
            hp_pct,
            speed_mul: 1.0,
            regen_mul: 1.0,
            add_shield: false,
            weak_point_move: None,
        }
    }

    fn speed(mut self, mul: f32) -> Self {
        self.speed_mul = mul;
        self
    }

    fn regen(mut self, mul: f32) -> Self {
        self.regen_mul = mul;
        self
    }

    fn shield(mut self) -> Self {
        self.add_shield = true;
        self
    }

    fn weak_point_motion(mut self, on: bool) -> Self {
        self.weak_point_move = Some(on);
        self
    }
}

/// Resolved shield parameters for a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldSpec {
    pub kind: ShieldKind,
    pub count: u32,
    pub speed: f32,
}

/// Resolved regen parameters for a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegenSpec {
    pub base: f32,
    pub delay: f32,
}

/// A single level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub level_id: u32,
    #[serde(rename = "enemyArchetype")]
    pub archetype: EnemyArchetypeId,
    pub variant_id: String,
    pub hp: f32,
    pub weak_point_count: u32,
    pub rotate_speed: f32,
    #[serde(default)]
    pub speed_mode: SpeedMode,
    #[serde(default)]
    pub speed_min: Option<f32>,
    #[serde(default)]
    pub speed_max: Option<f32>,
    #[serde(default)]
    pub weak_point_move: bool,
    #[serde(default)]
    pub shield_enabled: bool,
    #[serde(default)]
    pub shield_type: Option<ShieldKind>,
    #[serde(default)]
    pub shield_count: Option<u32>,
    #[serde(default)]
    pub shield_speed: Option<f32>,
    #[serde(default)]
    pub regen_enabled: bool,
    #[serde(default)]
    pub regen_base: Option<f32>,
    #[serde(default)]
    pub regen_delay: Option<f32>,
    #[serde(default)]
    pub reflect_enabled: bool,
    #[serde(default, rename = "reflectObjectType")]
    pub reflector_mode: Option<ReflectorMode>,
    #[serde(default, rename = "reflectObjectCount")]
    pub reflector_count: Option<u32>,
    #[serde(default)]
    pub reflect_max_bounces: Option<u32>,
    #[serde(default)]
    pub limit_needles_enabled: bool,
    #[serde(default)]
    pub limit_needles: Option<u32>,
    #[serde(default)]
    pub multi_target_enabled: bool,
    #[serde(default)]
    pub target_count: Option<u32>,
    #[serde(default)]
    pub boss_phases: Vec<BossPhaseConfig>,
}

impl LevelConfig {
    /// Plain fixed-speed level with no modifiers
    pub fn basic(
        level_id: u32,
        archetype: EnemyArchetypeId,
        variant_id: &str,
        hp: f32,
        weak_point_count: u32,
        rotate_speed: f32,
    ) -> Self {
        Self {
            level_id,
            archetype,
            variant_id: variant_id.to_string(),
            hp,
            weak_point_count,
            rotate_speed,
            speed_mode: SpeedMode::Fixed,
            speed_min: None,
            speed_max: None,
            weak_point_move: false,
            shield_enabled: false,
            shield_type: None,
            shield_count: None,
            shield_speed: None,
            regen_enabled: false,
            regen_base: None,
            regen_delay: None,
            reflect_enabled: false,
            reflector_mode: None,
            reflector_count: None,
            reflect_max_bounces: None,
            limit_needles_enabled: false,
            limit_needles: None,
            multi_target_enabled: false,
            target_count: None,
            boss_phases: Vec::new(),
        }
    }

    /// Number of targets spawned for this level
    pub fn spawn_count(&self) -> u32 {
        if self.multi_target_enabled {
            self.target_count.unwrap_or(1).max(1)
        } else {
            1
        }
    }

    /// Shield parameters if all of them are present, regardless of `shield_enabled`
    ///
    /// Boss phases may add shields to a level that starts without any, as long
    /// as the level carries the parameters.
    pub fn shield_spec(&self) -> Option<ShieldSpec> {
        let kind = self.shield_type?;
        let count = self.shield_count.filter(|&c| c > 0)?;
        let speed = self.shield_speed.filter(|&s| s != 0.0)?;
        Some(ShieldSpec { kind, count, speed })
    }

    /// Regen parameters, `None` when regen is off or the base rate is missing
    pub fn regen_spec(&self) -> Option<RegenSpec> {
        if !self.regen_enabled {
            return None;
        }
        let base = self.regen_base?;
        Some(RegenSpec {
            base,
            delay: self.regen_delay.unwrap_or(0.0),
        })
    }

    /// Bounces granted to each needle fired on this level
    pub fn needle_bounces(&self) -> u32 {
        if self.reflect_enabled {
            self.reflect_max_bounces.unwrap_or(0)
        } else {
            0
        }
    }

    /// Variable-speed bounds, when the level oscillates
    pub fn variable_speed(&self) -> Option<(f32, f32)> {
        match (self.speed_mode, self.speed_min, self.speed_max) {
            (SpeedMode::Variable, Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    fn with_shield(mut self, kind: ShieldKind) -> Self {
        self.shield_enabled = true;
        self.shield_type = Some(kind);
        self.shield_count = Some(if self.level_id > 8 { 2 } else { 1 });
        self.shield_speed = Some(1.0);
        self
    }

    fn with_regen(mut self) -> Self {
        self.regen_enabled = true;
        self.regen_base = Some(0.8);
        self.regen_delay = Some(1.5);
        self
    }

    fn with_reflectors(mut self) -> Self {
        self.reflect_enabled = true;
        self.reflector_mode = Some(ReflectorMode::Move);
        self.reflector_count = Some(2);
        self.reflect_max_bounces = Some(1);
        self
    }

    fn with_needle_limit(mut self, limit: u32) -> Self {
        self.limit_needles_enabled = true;
        self.limit_needles = Some(limit);
        self
    }

    fn with_boss_phases(mut self, phases: Vec<BossPhaseConfig>) -> Self {
        self.speed_mode = SpeedMode::Variable;
        self.speed_min = Some(self.rotate_speed * 0.8);
        self.speed_max = Some(self.rotate_speed * 1.5);
        self.boss_phases = phases;
        self
    }

    fn finish(mut self) -> Self {
        if self.level_id > 10 {
            self.weak_point_move = true;
        }
        self
    }
}

/// Clock used for the combo timeout while hit-stop is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComboClock {
    /// Combo timer advances by the hit-stop scaled delta
    GameTime,
    /// Combo timer advances by the raw frame delta, freeze frames included
    #[default]
    RealTime,
}

/// Combo, multiplier, quality and regen-suppression coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatFormulaConfig {
    pub combo_base: f32,
    pub combo_decay_per_level: f32,
    pub combo_min: f32,
    pub combo_mistake_mul: f32,
    #[serde(rename = "M_alpha")]
    pub m_alpha: f32,
    #[serde(rename = "M_k")]
    pub m_k: f32,
    #[serde(rename = "Q_comboMaxCoef")]
    pub q_combo_max_coef: f32,
    #[serde(rename = "Q_qualityCoef")]
    pub q_quality_coef: f32,
    #[serde(rename = "Q_min")]
    pub q_min: f32,
    #[serde(rename = "Q_max")]
    pub q_max: f32,
    #[serde(rename = "regen_delta")]
    pub regen_delta: f32,
    #[serde(rename = "regen_eta")]
    pub regen_eta: f32,
    #[serde(default)]
    pub combo_clock: ComboClock,
}

impl Default for CombatFormulaConfig {
    fn default() -> Self {
        Self {
            combo_base: 1.2,
            combo_decay_per_level: 0.02,
            combo_min: 0.6,
            combo_mistake_mul: 0.5,
            m_alpha: 1.0,
            m_k: 8.0,
            q_combo_max_coef: 0.02,
            q_quality_coef: 0.05,
            q_min: 0.5,
            q_max: 2.0,
            regen_delta: 0.5,
            regen_eta: 0.1,
            combo_clock: ComboClock::RealTime,
        }
    }
}

/// Drop, gauge and super-needle coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomyConfig {
    pub drop_coin_p0: f32,
    pub drop_coin_p_max: f32,
    pub drop_shard_p0: f32,
    pub drop_shard_p_max: f32,
    pub drop_card_p0: f32,
    pub drop_card_p_max: f32,
    pub super_needle_p_base: f32,
    pub super_needle_p_min: f32,
    pub super_needle_p_cap: f32,
    pub gauge_a: f32,
    pub gauge_b: f32,
    pub gauge_c: f32,
    pub gauge_carry_fail: f32,
    pub p_gamma: f32,
    pub p_quality_coef: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            drop_coin_p0: 0.3,
            drop_coin_p_max: 0.6,
            drop_shard_p0: 0.05,
            drop_shard_p_max: 0.15,
            drop_card_p0: 0.01,
            drop_card_p_max: 0.05,
            super_needle_p_base: 0.02,
            super_needle_p_min: 0.01,
            super_needle_p_cap: 0.12,
            gauge_a: 0.08,
            gauge_b: 0.05,
            gauge_c: 0.01,
            gauge_carry_fail: 0.5,
            p_gamma: 0.5,
            p_quality_coef: 0.02,
        }
    }
}

/// Presentation parameters for an archetype; only `base_scale` reaches the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyArchetypeConfig {
    pub archetype_id: EnemyArchetypeId,
    #[serde(default = "one")]
    pub base_scale: f32,
    #[serde(default)]
    pub hit_shake: f32,
    #[serde(default)]
    pub shell_opacity: f32,
    #[serde(default)]
    pub core_glow: f32,
    #[serde(default)]
    pub weak_point_style: String,
    #[serde(default)]
    pub death_style: String,
}

/// Visual variant; shield orbit and decoy ratio feed the target layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConfig {
    pub variant_id: String,
    pub archetype_id: EnemyArchetypeId,
    #[serde(default)]
    pub color_theme: String,
    #[serde(default)]
    pub noise_strength: f32,
    #[serde(default)]
    pub pulse_freq: f32,
    #[serde(default)]
    pub shield_orbit_radius: Option<f32>,
    #[serde(default)]
    pub grid_density: Option<f32>,
    #[serde(default)]
    pub decoy_ratio: Option<f32>,
}

/// Every table the core reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigBundle {
    pub levels: Vec<LevelConfig>,
    pub economy: EconomyConfig,
    pub combat_formula: CombatFormulaConfig,
    #[serde(default)]
    pub archetypes: Vec<EnemyArchetypeConfig>,
    #[serde(default)]
    pub variants: Vec<VariantConfig>,
}

impl Default for ConfigBundle {
    fn default() -> Self {
        Self {
            levels: campaign_levels(),
            economy: EconomyConfig::default(),
            combat_formula: CombatFormulaConfig::default(),
            archetypes: default_archetypes(),
            variants: default_variants(),
        }
    }
}

impl ConfigBundle {
    /// Exact level lookup
    pub fn level(&self, level_id: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.level_id == level_id)
    }

    /// Level lookup falling back to the lowest id in the table
    pub fn resolve_level(&self, level_id: u32) -> Option<&LevelConfig> {
        self.level(level_id)
            .or_else(|| self.levels.iter().min_by_key(|l| l.level_id))
    }

    pub fn first_level_id(&self) -> Option<u32> {
        self.levels.iter().map(|l| l.level_id).min()
    }

    /// Next level id in ascending order, `None` after the last level
    pub fn next_level_id(&self, level_id: u32) -> Option<u32> {
        if self.level(level_id).is_none() {
            return None;
        }
        self.levels
            .iter()
            .map(|l| l.level_id)
            .filter(|&id| id > level_id)
            .min()
    }

    pub fn variant(&self, variant_id: &str) -> Option<&VariantConfig> {
        self.variants.iter().find(|v| v.variant_id == variant_id)
    }

    pub fn archetype(&self, id: EnemyArchetypeId) -> Option<&EnemyArchetypeConfig> {
        self.archetypes.iter().find(|a| a.archetype_id == id)
    }
}

/// Built-in 30 level campaign: six tiers of five, the fifth of each a boss
pub fn campaign_levels() -> Vec<LevelConfig> {
    use EnemyArchetypeId as A;

    let mut levels = Vec::with_capacity(30);

    // 1-5: basic
    for i in 1..=5u32 {
        let f = i as f32;
        levels.push(LevelConfig::basic(i, A::Standard, "S1", 5.0 + f, 2 + i / 3, 0.6 + f * 0.1));
    }

    // 6-10: shields
    for i in 6..=10u32 {
        let k = (i - 6) as f32;
        let level = if i == 10 {
            LevelConfig::basic(i, A::OrbitalShield, "O2", 25.0, 4, 1.2)
                .with_shield(ShieldKind::Orbital)
                .with_boss_phases(vec![
                    BossPhaseConfig::at(0.6).shield().speed(1.2),
                    BossPhaseConfig::at(0.3).shield().speed(1.5),
                ])
        } else {
            let kind = if i < 9 { ShieldKind::Orbital } else { ShieldKind::Energy };
            LevelConfig::basic(i, A::OrbitalShield, "O1", 12.0 + k * 2.0, 3, 1.0 + k * 0.1)
                .with_shield(kind)
        };
        levels.push(level.finish());
    }

    // 11-15: regen
    for i in 11..=15u32 {
        let k = (i - 11) as f32;
        let level = if i == 15 {
            LevelConfig::basic(i, A::Regenerator, "R3", 35.0, 4, 1.5)
                .with_regen()
                .with_shield(ShieldKind::Orbital)
                .with_boss_phases(vec![
                    BossPhaseConfig::at(0.7),
                    BossPhaseConfig::at(0.4).shield().speed(1.1),
                    BossPhaseConfig::at(0.2).shield().speed(1.2).regen(1.2),
                ])
        } else {
            LevelConfig::basic(i, A::Regenerator, "R1", 18.0 + k * 2.0, 3, 1.2 + k * 0.1)
                .with_regen()
        };
        levels.push(level.finish());
    }

    // 16-20: reflectors
    for i in 16..=20u32 {
        let k = (i - 16) as f32;
        let level = if i == 20 {
            LevelConfig::basic(i, A::Reflector, "B1", 45.0, 4, 1.8)
                .with_reflectors()
                .with_boss_phases(vec![BossPhaseConfig::at(0.5).weak_point_motion(true).speed(1.5)])
        } else {
            LevelConfig::basic(i, A::Reflector, "B1", 25.0 + k * 2.0, 3, 1.4 + k * 0.1)
                .with_reflectors()
        };
        levels.push(level.finish());
    }

    // 21-25: composite
    for i in 21..=25u32 {
        let k = (i - 21) as f32;
        let level = if i == 25 {
            LevelConfig::basic(i, A::Fusion, "F1", 60.0, 5, 2.0)
                .with_shield(ShieldKind::Energy)
                .with_regen()
                .with_boss_phases(vec![
                    BossPhaseConfig::at(0.6).shield().speed(1.3),
                    BossPhaseConfig::at(0.3).regen(2.0).speed(1.5),
                ])
        } else {
            LevelConfig::basic(i, A::Fusion, "F1", 35.0 + k * 3.0, 4, 1.6 + k * 0.1)
                .with_shield(ShieldKind::Orbital)
                .with_regen()
        };
        levels.push(level.finish());
    }

    // 26-30: decoys and the final boss
    for i in 26..=30u32 {
        let k = (i - 26) as f32;
        let level = if i == 30 {
            LevelConfig::basic(i, A::FinalBoss, "X1", 100.0, 6, 2.5)
                .with_shield(ShieldKind::Breakable)
                .with_regen()
                .with_reflectors()
                .with_boss_phases(vec![
                    BossPhaseConfig::at(0.8).shield().speed(1.2),
                    BossPhaseConfig::at(0.5).weak_point_motion(true).speed(1.5),
                    BossPhaseConfig::at(0.2).regen(3.0).speed(2.0).shield(),
                ])
        } else {
            let limit = if i == 29 { 20 } else { 15 };
            LevelConfig::basic(i, A::Decoy, "D1", 50.0 + k * 4.0, 4, 1.8 + k * 0.1)
                .with_shield(ShieldKind::Energy)
                .with_needle_limit(limit)
        };
        levels.push(level.finish());
    }

    levels
}

fn default_archetypes() -> Vec<EnemyArchetypeConfig> {
    use EnemyArchetypeId as A;

    [
        (A::Standard, 1.0),
        (A::OrbitalShield, 1.0),
        (A::Regenerator, 1.05),
        (A::Reflector, 1.0),
        (A::Fusion, 1.1),
        (A::Decoy, 1.0),
        (A::FinalBoss, 1.2),
    ]
    .into_iter()
    .map(|(archetype_id, base_scale)| EnemyArchetypeConfig {
        archetype_id,
        base_scale,
        hit_shake: 2.0,
        shell_opacity: 1.0,
        core_glow: 0.6,
        weak_point_style: "crack".to_string(),
        death_style: "shatter".to_string(),
    })
    .collect()
}

fn default_variants() -> Vec<VariantConfig> {
    use EnemyArchetypeId as A;

    [
        ("S1", A::Standard, None, None),
        ("O1", A::OrbitalShield, Some(150.0), None),
        ("O2", A::OrbitalShield, Some(165.0), None),
        ("R1", A::Regenerator, None, None),
        ("R3", A::Regenerator, Some(160.0), None),
        ("B1", A::Reflector, None, None),
        ("F1", A::Fusion, Some(160.0), None),
        ("D1", A::Decoy, Some(150.0), Some(0.25)),
        ("X1", A::FinalBoss, Some(175.0), Some(1.0 / 6.0)),
    ]
    .into_iter()
    .map(|(id, archetype_id, shield_orbit_radius, decoy_ratio)| VariantConfig {
        variant_id: id.to_string(),
        archetype_id,
        color_theme: "neon".to_string(),
        noise_strength: 0.2,
        pulse_freq: 1.0,
        shield_orbit_radius,
        grid_density: None,
        decoy_ratio,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_shape() {
        let levels = campaign_levels();
        assert_eq!(levels.len(), 30);
        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.level_id, i as u32 + 1);
            assert!(level.hp > 0.0);
        }
        for id in [10, 15, 20, 25, 30] {
            let level = &levels[id - 1];
            assert!(!level.boss_phases.is_empty());
            assert_eq!(level.speed_mode, SpeedMode::Variable);
        }
        assert_eq!(levels[28].limit_needles, Some(20));
        assert_eq!(levels[25].limit_needles, Some(15));
        assert!(levels[10].weak_point_move);
        assert!(!levels[9].weak_point_move);
    }

    #[test]
    fn test_level_lookup_falls_back_to_lowest_id() {
        let mut bundle = ConfigBundle::default();
        bundle.levels.reverse();
        assert_eq!(bundle.resolve_level(999).map(|l| l.level_id), Some(1));
        assert_eq!(bundle.resolve_level(7).map(|l| l.level_id), Some(7));
        assert_eq!(bundle.first_level_id(), Some(1));
        assert_eq!(bundle.next_level_id(7), Some(8));
        assert_eq!(bundle.next_level_id(30), None);
        assert_eq!(bundle.next_level_id(999), None);
    }

    #[test]
    fn test_shield_spec_requires_all_params() {
        let mut level = LevelConfig::basic(1, EnemyArchetypeId::Standard, "S1", 5.0, 2, 0.6);
        assert!(level.shield_spec().is_none());
        level.shield_type = Some(ShieldKind::Orbital);
        level.shield_count = Some(2);
        assert!(level.shield_spec().is_none());
        level.shield_speed = Some(1.0);
        let spec = level.shield_spec().unwrap();
        assert_eq!(spec.count, 2);
    }

    #[test]
    fn test_regen_spec_missing_base_skips_regen() {
        let mut level = LevelConfig::basic(11, EnemyArchetypeId::Regenerator, "R1", 18.0, 3, 1.2);
        level.regen_enabled = true;
        assert!(level.regen_spec().is_none());
        level.regen_base = Some(0.8);
        assert_eq!(level.regen_spec().unwrap().delay, 0.0);
    }

    #[test]
    fn test_level_json_field_names() {
        let json = r#"{
            "levelId": 3,
            "enemyArchetype": "Standard",
            "variantId": "S1",
            "hp": 8,
            "weakPointCount": 3,
            "rotateSpeed": 0.9,
            "speedMode": "variable",
            "speedMin": 0.5,
            "speedMax": 1.2,
            "shieldEnabled": true,
            "shieldType": "breakable",
            "shieldCount": 2,
            "shieldSpeed": 1.0,
            "reflectEnabled": true,
            "reflectObjectType": "rotate",
            "reflectObjectCount": 1,
            "reflectMaxBounces": 2,
            "bossPhases": [{ "hpPct": 0.5, "addShield": true }]
        }"#;
        let level: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(level.level_id, 3);
        assert_eq!(level.variable_speed(), Some((0.5, 1.2)));
        assert_eq!(level.reflector_mode, Some(ReflectorMode::Rotate));
        assert_eq!(level.needle_bounces(), 2);
        assert_eq!(level.boss_phases[0].speed_mul, 1.0);
        assert!(level.boss_phases[0].add_shield);
        assert_eq!(level.shield_spec().unwrap().kind, ShieldKind::Breakable);
    }

    #[test]
    fn test_formula_json_field_names() {
        let json = r#"{
            "comboBase": 1.5, "comboDecayPerLevel": 0.05, "comboMin": 0.5,
            "comboMistakeMul": 0.5, "M_alpha": 1.0, "M_k": 5.0,
            "Q_comboMaxCoef": 0.01, "Q_qualityCoef": 0.1, "Q_min": 0.5, "Q_max": 3.0,
            "regen_delta": 0.4, "regen_eta": 0.2
        }"#;
        let cfg: CombatFormulaConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.m_k, 5.0);
        assert_eq!(cfg.combo_clock, ComboClock::RealTime);
    }
}
