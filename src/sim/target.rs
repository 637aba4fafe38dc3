//! Virus targets
//!
//! A virus is a rotating body carrying three arenas of circular colliders:
//! weak points, shields and reflectors. Sub-entities are addressed by index
//! into their arena and their world positions are refreshed after every step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use crate::consts::*;
use crate::tuning::{
    BossPhaseConfig, EnemyArchetypeConfig, LevelConfig, ReflectorMode, RegenSpec, ShieldKind,
    ShieldSpec, VariantConfig,
};
use crate::{clamp, normalize_angle, ping_pong, polar_to_cartesian};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakPoint {
    pub angle_offset: f32,
    pub orbit_radius: f32,
    pub radius: f32,
    /// Decoys look like weak points but block the needle
    pub decoy: bool,
    /// World position, refreshed each step
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shield {
    pub angle: f32,
    pub orbit_radius: f32,
    pub speed: f32,
    pub kind: ShieldKind,
    pub radius: f32,
    pub flash_timer: f32,
    pub pos: Vec2,
}

impl Shield {
    fn new(angle: f32, orbit_radius: f32, speed: f32, kind: ShieldKind) -> Self {
        Self {
            angle,
            orbit_radius,
            speed,
            kind,
            radius: SHIELD_RADIUS,
            flash_timer: 0.0,
            pos: Vec2::ZERO,
        }
    }

    fn step(&mut self, dt: f32) {
        if self.kind.orbits() {
            self.angle = normalize_angle(self.angle + self.speed * dt);
        }
        if self.flash_timer > 0.0 {
            self.flash_timer = (self.flash_timer - dt).max(0.0);
        }
    }

    fn local_offset(&self) -> Vec2 {
        polar_to_cartesian(self.orbit_radius, self.angle)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reflector {
    pub angle: f32,
    pub orbit_radius: f32,
    pub speed: f32,
    pub mode: ReflectorMode,
    pub radius: f32,
    pub pos: Vec2,
}

impl Reflector {
    fn step(&mut self, dt: f32) {
        if self.mode != ReflectorMode::Fixed {
            self.angle = normalize_angle(self.angle + self.speed * dt);
        }
    }

    fn local_offset(&self) -> Vec2 {
        match self.mode {
            ReflectorMode::Move => Vec2::new(
                self.angle.sin() * REFLECTOR_MOVE_AMPLITUDE,
                self.angle.cos() * REFLECTOR_MOVE_AMPLITUDE * 0.4,
            ),
            ReflectorMode::Fixed | ReflectorMode::Rotate => {
                polar_to_cartesian(self.orbit_radius, self.angle)
            }
        }
    }
}

/// Boss phase lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhaseState {
    #[default]
    Pending,
    Triggered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossPhase {
    pub config: BossPhaseConfig,
    pub state: PhaseState,
}

/// What a single step changed that the session must hear about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// HP actually restored by regen this step
    pub healed: f32,
    /// Indices of phases triggered this step, in trigger order
    pub phases: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Virus {
    pub pos: Vec2,
    pub hp: f32,
    pub hp_max: f32,
    pub body_radius: f32,
    /// Current rotation (radians)
    pub rotation: f32,
    pub rotate_speed: f32,
    pub variable_speed: Option<(f32, f32)>,
    pub speed_mul: f32,
    pub regen_mul: f32,
    pub weak_point_move: bool,
    pub time: f32,
    pub time_since_hit: f32,
    pub dead: bool,
    /// Sorted by descending threshold
    pub phases: Vec<BossPhase>,
    pub weak_points: Vec<WeakPoint>,
    pub shields: Vec<Shield>,
    pub reflectors: Vec<Reflector>,
    regen: Option<RegenSpec>,
    shield_spec: Option<ShieldSpec>,
    shield_orbit: f32,
}

impl Virus {
    /// Spawn a target for `level` centred on `pos`
    pub fn new(
        level: &LevelConfig,
        variant: Option<&VariantConfig>,
        archetype: Option<&EnemyArchetypeConfig>,
        pos: Vec2,
    ) -> Self {
        let mut phases: Vec<BossPhase> = level
            .boss_phases
            .iter()
            .map(|config| BossPhase {
                config: config.clone(),
                state: PhaseState::Pending,
            })
            .collect();
        phases.sort_by(|a, b| b.config.hp_pct.total_cmp(&a.config.hp_pct));

        let shield_orbit = variant
            .and_then(|v| v.shield_orbit_radius)
            .unwrap_or(SHIELD_ORBIT);
        let decoy_ratio = variant.and_then(|v| v.decoy_ratio).unwrap_or(0.0);
        let scale = archetype.map_or(1.0, |a| a.base_scale);

        let mut virus = Self {
            pos,
            hp: level.hp,
            hp_max: level.hp,
            body_radius: BODY_RADIUS * scale,
            rotation: 0.0,
            rotate_speed: level.rotate_speed,
            variable_speed: level.variable_speed(),
            speed_mul: 1.0,
            regen_mul: 1.0,
            weak_point_move: level.weak_point_move,
            time: 0.0,
            time_since_hit: 0.0,
            dead: false,
            phases,
            weak_points: spawn_weak_points(level.weak_point_count, decoy_ratio),
            shields: Vec::new(),
            reflectors: Vec::new(),
            regen: level.regen_spec(),
            shield_spec: level.shield_spec(),
            shield_orbit,
        };

        if level.shield_enabled {
            if let Some(spec) = virus.shield_spec {
                let orbit = virus.shield_orbit;
                virus.spawn_shields(spec.count, orbit);
            }
        }
        if level.reflect_enabled {
            if let (Some(mode), Some(count)) = (level.reflector_mode, level.reflector_count) {
                virus.reflectors = spawn_reflectors(count, mode);
            }
        }

        virus.update_positions();
        virus
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Current angular speed (rad/s)
    pub fn current_speed(&self) -> f32 {
        match self.variable_speed {
            Some((min, max)) => {
                let mid = (min + max) / 2.0;
                let amp = (max - min) / 2.0;
                (mid + amp * (self.time * VARIABLE_SPEED_FREQ).sin()) * self.speed_mul
            }
            None => self.rotate_speed * self.speed_mul,
        }
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.hp_max <= 0.0 { 0.0 } else { self.hp / self.hp_max }
    }

    /// Advance motion, regen and phases. `regen_rate` is the session's current rate.
    pub fn step(&mut self, dt: f32, regen_rate: f32) -> StepReport {
        if self.dead || dt <= 0.0 {
            return StepReport::default();
        }
        self.time += dt;
        self.time_since_hit += dt;
        self.rotation = normalize_angle(self.rotation + self.current_speed() * dt);

        for shield in &mut self.shields {
            shield.step(dt);
        }
        for reflector in &mut self.reflectors {
            reflector.step(dt);
        }
        self.update_positions();

        let healed = self.regenerate(dt, regen_rate);
        let phases = self.check_phases();
        StepReport { healed, phases }
    }

    fn regenerate(&mut self, dt: f32, regen_rate: f32) -> f32 {
        let Some(regen) = self.regen else {
            return 0.0;
        };
        if self.time_since_hit < regen.delay {
            return 0.0;
        }
        let before = self.hp;
        self.hp = clamp(self.hp + regen_rate * self.regen_mul * dt, 0.0, self.hp_max);
        (self.hp - before).max(0.0)
    }

    fn check_phases(&mut self) -> Vec<usize> {
        let fraction = self.hp_fraction();
        let mut triggered = Vec::new();
        for i in 0..self.phases.len() {
            let phase = &mut self.phases[i];
            if phase.state != PhaseState::Pending || fraction > phase.config.hp_pct {
                continue;
            }
            phase.state = PhaseState::Triggered;
            let config = phase.config.clone();

            if config.speed_mul != 1.0 {
                self.speed_mul = config.speed_mul;
            }
            if config.regen_mul != 1.0 {
                self.regen_mul = config.regen_mul;
            }
            if config.add_shield {
                self.spawn_shields(1, SHIELD_ORBIT);
            }
            if let Some(on) = config.weak_point_move {
                self.weak_point_move = on;
            }
            log::debug!(
                "Boss phase {} triggered at {:.0}% hp",
                i,
                fraction * 100.0
            );
            triggered.push(i);
        }
        if !triggered.is_empty() {
            self.update_positions();
        }
        triggered
    }

    /// Spawn shields from the level's shield parameters; no-op if any is missing
    fn spawn_shields(&mut self, count: u32, orbit: f32) {
        let Some(spec) = self.shield_spec else {
            return;
        };
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            self.shields
                .push(Shield::new(angle, orbit, spec.speed, spec.kind));
        }
    }

    /// Recompute world positions of every sub-entity
    pub fn update_positions(&mut self) {
        let rot = Vec2::from_angle(self.rotation);
        let half = WEAK_POINT_MOVE_AMPLITUDE / 2.0;
        for weak in &mut self.weak_points {
            let wobble = if self.weak_point_move {
                ping_pong(self.time + weak.angle_offset, WEAK_POINT_MOVE_AMPLITUDE) - half
            } else {
                0.0
            };
            let local = polar_to_cartesian(weak.orbit_radius + wobble, weak.angle_offset);
            weak.pos = self.pos + rot.rotate(local);
        }
        for shield in &mut self.shields {
            shield.pos = self.pos + rot.rotate(shield.local_offset());
        }
        for reflector in &mut self.reflectors {
            reflector.pos = self.pos + rot.rotate(reflector.local_offset());
        }
    }

    /// Remove `amount` hp; returns true if this killed the target
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.hp -= amount;
        self.time_since_hit = 0.0;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.dead = true;
            return true;
        }
        false
    }

    // --- Contact queries ---

    pub fn check_weak_point(&self, pos: Vec2, radius: f32) -> Option<usize> {
        self.weak_points
            .iter()
            .position(|w| circles_overlap(w.pos, w.radius, pos, radius))
    }

    pub fn check_body(&self, pos: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.body_radius, pos, radius)
    }

    pub fn check_shield(&self, pos: Vec2, radius: f32) -> Option<usize> {
        self.shields
            .iter()
            .position(|s| circles_overlap(s.pos, s.radius, pos, radius))
    }

    pub fn check_reflector(&self, pos: Vec2, radius: f32) -> Option<usize> {
        self.reflectors
            .iter()
            .position(|r| circles_overlap(r.pos, r.radius, pos, radius))
    }

    /// Flash the shield; breakable shields are removed. Returns true if removed.
    pub fn hit_shield(&mut self, index: usize) -> bool {
        let Some(shield) = self.shields.get_mut(index) else {
            return false;
        };
        shield.flash_timer = SHIELD_FLASH_SECS;
        if shield.kind.breakable() {
            self.shields.remove(index);
            return true;
        }
        false
    }

    /// Closest real weak point to `from`
    pub fn nearest_weak_point(&self, from: Vec2) -> Option<Vec2> {
        self.weak_points
            .iter()
            .filter(|w| !w.decoy)
            .map(|w| w.pos)
            .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
    }

    /// (triggered, total) boss phases
    pub fn phase_progress(&self) -> (u32, u32) {
        let active = self
            .phases
            .iter()
            .filter(|p| p.state == PhaseState::Triggered)
            .count();
        (active as u32, self.phases.len() as u32)
    }
}

fn spawn_weak_points(count: u32, decoy_ratio: f32) -> Vec<WeakPoint> {
    let decoys = (count as f32 * decoy_ratio).round().max(0.0) as u32;
    (0..count)
        .map(|i| WeakPoint {
            angle_offset: std::f32::consts::TAU * i as f32 / count as f32,
            orbit_radius: WEAK_POINT_ORBIT,
            radius: WEAK_POINT_RADIUS,
            decoy: i < decoys,
            pos: Vec2::ZERO,
        })
        .collect()
}

fn spawn_reflectors(count: u32, mode: ReflectorMode) -> Vec<Reflector> {
    let speed = if mode == ReflectorMode::Fixed { 0.0 } else { REFLECTOR_SPEED };
    (0..count)
        .map(|i| Reflector {
            angle: std::f32::consts::TAU * i as f32 / count as f32,
            orbit_radius: REFLECTOR_ORBIT,
            speed,
            mode,
            radius: REFLECTOR_RADIUS,
            pos: Vec2::ZERO,
        })
        .collect()
}
