//! Virus Strike - deterministic combat core for a weak-point arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (session, targets, needles, hit resolution)
//! - `tuning`: Data-driven game balance (level, formula and economy tables)
//! - `error`: Construction-time failures

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use tuning::ConfigBundle;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield size (portrait phone canvas)
    pub const PLAYFIELD_WIDTH: f32 = 720.0;
    pub const PLAYFIELD_HEIGHT: f32 = 1280.0;

    /// Needle defaults
    pub const NEEDLE_SPEED: f32 = 1200.0;
    pub const NEEDLE_RADIUS: f32 = 6.0;
    pub const SUPER_NEEDLE_SPEED: f32 = 1400.0;
    pub const SUPER_NEEDLE_RADIUS: f32 = 10.0;
    /// Aim points closer than this to the shooter are ignored
    pub const MIN_AIM_DISTANCE: f32 = 0.01;

    /// Shooter sits this far above the bottom edge (or 15% of the height, whichever is larger)
    pub const SHOOTER_BOTTOM_MARGIN: f32 = 120.0;
    pub const SHOOTER_BOTTOM_FRACTION: f32 = 0.15;

    /// Virus body
    pub const BODY_RADIUS: f32 = 100.0;
    /// Virus row height as a fraction of the playfield height
    pub const TARGET_ROW_FRACTION: f32 = 0.15;
    /// Fraction of the playfield width used to spread multi-target swarms
    pub const TARGET_SPREAD_FRACTION: f32 = 0.8;

    /// Weak points
    pub const WEAK_POINT_RADIUS: f32 = 16.0;
    pub const WEAK_POINT_ORBIT: f32 = 120.0;
    pub const WEAK_POINT_MOVE_AMPLITUDE: f32 = 22.0;

    /// Shields
    pub const SHIELD_RADIUS: f32 = 18.0;
    pub const SHIELD_ORBIT: f32 = 150.0;
    pub const SHIELD_FLASH_SECS: f32 = 0.12;

    /// Reflectors
    pub const REFLECTOR_RADIUS: f32 = 14.0;
    pub const REFLECTOR_ORBIT: f32 = 190.0;
    pub const REFLECTOR_SPEED: f32 = 1.6;
    pub const REFLECTOR_MOVE_AMPLITUDE: f32 = 80.0;

    /// Variable-speed rotation oscillates at this rate (rad/s of the sine argument)
    pub const VARIABLE_SPEED_FREQ: f32 = 0.6;

    /// Hit-stop
    pub const HIT_STOP_TIME_SCALE: f32 = 0.05;
    pub const HIT_STOP_BLOCKED: f32 = 0.05;
    pub const HIT_STOP_WEAK_POINT: f32 = 0.08;
    pub const HIT_STOP_KILL: f32 = 0.3;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp into [min, max]; inverted bounds resolve to `max` instead of panicking
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Triangle wave in [0, length]
#[inline]
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let span = length * 2.0;
    let m = t.rem_euclid(span);
    length - (m - length).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        // 3π lands on the ±π boundary; f32 rounding may leave either sign
        assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 0.001);
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 0.001);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 0.001);
        assert!((normalize_angle(0.5) - 0.5).abs() < 0.001);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_clamp_inverted_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        // min > max resolves to max rather than panicking like f32::clamp
        assert_eq!(clamp(0.5, 2.0, 1.0), 1.0);
    }

    #[test]
    fn test_ping_pong() {
        assert!((ping_pong(0.0, 22.0)).abs() < 0.001);
        assert!((ping_pong(22.0, 22.0) - 22.0).abs() < 0.001);
        assert!((ping_pong(33.0, 22.0) - 11.0).abs() < 0.001);
        assert!((ping_pong(44.0, 22.0)).abs() < 0.001);
        assert_eq!(ping_pong(5.0, 0.0), 0.0);
    }
}
