//! Needle projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::reflect;
use crate::consts::*;

/// Needle tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeedleTier {
    #[default]
    Normal,
    /// Larger, faster, passes through shields
    Super,
}

impl NeedleTier {
    pub fn speed(&self) -> f32 {
        match self {
            NeedleTier::Normal => NEEDLE_SPEED,
            NeedleTier::Super => SUPER_NEEDLE_SPEED,
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            NeedleTier::Normal => NEEDLE_RADIUS,
            NeedleTier::Super => SUPER_NEEDLE_RADIUS,
        }
    }
}

/// Needle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeedleState {
    #[default]
    Alive,
    /// Left the playfield and the miss was counted; removed this tick
    ReportedMiss,
    Destroyed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Needle {
    pub id: u32,
    pub pos: Vec2,
    /// Unit travel direction
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub tier: NeedleTier,
    pub bounces_remaining: u32,
    pub state: NeedleState,
}

impl Needle {
    /// Launch from `pos` toward `dir` (normalized here)
    pub fn new(id: u32, pos: Vec2, dir: Vec2, tier: NeedleTier, bounces: u32) -> Self {
        Self {
            id,
            pos,
            dir: dir.normalize_or(Vec2::Y),
            speed: tier.speed(),
            radius: tier.radius(),
            tier,
            bounces_remaining: bounces,
            state: NeedleState::Alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == NeedleState::Alive
    }

    pub fn is_super(&self) -> bool {
        self.tier == NeedleTier::Super
    }

    pub fn velocity(&self) -> Vec2 {
        self.dir * self.speed
    }

    pub fn step(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        self.pos += self.dir * self.speed * dt;
    }

    /// Reflect the travel direction off a surface with unit normal `normal`
    pub fn bounce(&mut self, normal: Vec2) {
        self.dir = reflect(self.dir, normal).normalize_or(self.dir);
    }

    /// Record the miss; returns false if it was already reported
    pub fn mark_missed(&mut self) -> bool {
        if self.state != NeedleState::Alive {
            return false;
        }
        self.state = NeedleState::ReportedMiss;
        true
    }

    pub fn destroy(&mut self) {
        self.state = NeedleState::Destroyed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_along_direction() {
        let mut needle = Needle::new(1, Vec2::ZERO, Vec2::new(0.0, 2.0), NeedleTier::Normal, 0);
        assert!((needle.dir.length() - 1.0).abs() < 1e-6);
        needle.step(0.5);
        assert!((needle.pos.y - NEEDLE_SPEED * 0.5).abs() < 1e-3);
        assert!(needle.pos.x.abs() < 1e-6);
    }

    #[test]
    fn test_super_tier_stats() {
        let needle = Needle::new(1, Vec2::ZERO, Vec2::Y, NeedleTier::Super, 0);
        assert_eq!(needle.speed, SUPER_NEEDLE_SPEED);
        assert_eq!(needle.radius, SUPER_NEEDLE_RADIUS);
        assert!(needle.is_super());
    }

    #[test]
    fn test_bounce_reverses_normal_component() {
        let mut needle = Needle::new(1, Vec2::ZERO, Vec2::new(1.0, 1.0), NeedleTier::Normal, 1);
        needle.bounce(Vec2::new(0.0, -1.0));
        assert!(needle.dir.x > 0.0);
        assert!(needle.dir.y < 0.0);
        assert!((needle.dir.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_miss_reported_once() {
        let mut needle = Needle::new(1, Vec2::ZERO, Vec2::Y, NeedleTier::Normal, 0);
        assert!(needle.mark_missed());
        assert!(!needle.mark_missed());
        assert!(!needle.is_alive());
    }

    #[test]
    fn test_destroyed_needle_does_not_move() {
        let mut needle = Needle::new(1, Vec2::ZERO, Vec2::Y, NeedleTier::Normal, 0);
        needle.destroy();
        needle.step(1.0);
        assert_eq!(needle.pos, Vec2::ZERO);
    }
}
