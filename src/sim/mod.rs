//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (targets and needles in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod combat;
pub mod economy;
pub mod events;
pub mod formula;
pub mod needle;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod target;
pub mod tick;

pub use collision::{CollisionResult, circle_collision, circles_overlap, reflect};
pub use economy::{DropChances, EconomyEngine};
pub use events::{Drops, GameEvent, HitKind};
pub use formula::FormulaEngine;
pub use needle::{Needle, NeedleState, NeedleTier};
pub use rng::RandomSource;
pub use session::{GameSession, LevelOutcome, WeakPointOutcome};
pub use snapshot::SessionSnapshot;
pub use target::{BossPhase, PhaseState, Reflector, Shield, Virus, WeakPoint};
pub use tick::{Playfield, TickInput, World};
