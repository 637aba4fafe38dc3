//! Construction-time failures
//!
//! The simulation never fails mid-tick. The only rejected condition is being
//! asked to build a session without a usable level.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// The level table is empty, so there is nothing to fall back to
    #[error("no levels configured")]
    NoLevels,

    /// The resolved level cannot host a session
    #[error("level {level_id} has unusable hp {hp}")]
    InvalidLevel { level_id: u32, hp: f32 },
}
