//! Events emitted by the simulation for effects, audio and HUD feedback.
//!
//! The world buffers these per tick; the embedder drains them. Nothing in the
//! simulation reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Outcome tag of a needle contact (also the session's last-hit tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitKind {
    /// Real weak point hit inside the combo window
    WeakPoint,
    /// Weak point hit after the combo window lapsed
    Timeout,
    /// Weak point hit that destroyed the target
    Kill,
    /// Decoy weak point
    Blocked,
    /// Needle struck the core instead of a weak point
    Body,
    Shield,
    /// Reflected off a reflector, needle survives
    Bounce,
    /// Reflector hit with no bounces left
    Absorbed,
    /// Needle left the playfield
    #[default]
    Miss,
}

impl HitKind {
    /// Whether the session took a mistake penalty for this outcome
    pub fn is_mistake(&self) -> bool {
        matches!(
            self,
            HitKind::Blocked | HitKind::Body | HitKind::Shield | HitKind::Miss
        )
    }
}

/// Drops granted by a single weak-point hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Drops {
    pub coins: u32,
    pub shards: u32,
    pub cards: u32,
}

impl Drops {
    pub fn is_empty(&self) -> bool {
        self.coins == 0 && self.shards == 0 && self.cards == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A needle resolved against something
    Hit {
        kind: HitKind,
        pos: Vec2,
        needle_id: u32,
        /// Target index, when the contact belonged to one
        target: Option<usize>,
        /// Session combo after the hit
        combo: u32,
    },
    Drops { pos: Vec2, drops: Drops },
    SuperNeedleGranted { total: u32 },
    NeedleFired { needle_id: u32, is_super: bool },
    PhaseTriggered { target: usize, phase: usize },
    LevelCleared { level_id: u32 },
    LevelFailed { level_id: u32, carried_gauge: f32 },
}
