//! Space Shooter - A vertical arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, spawning, game state)
//! - `game`: Host-facing orchestrator with error containment
//! - `ui`: Menu/render consumer interfaces
//! - `tuning`: Data-driven game balance
//! - `settings`: Variant feature flags and quality presets

pub mod error;
pub mod game;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::GameError;
pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per display frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Play area dimensions
    pub const PLAY_WIDTH: f32 = 480.0;
    pub const PLAY_HEIGHT: f32 = 640.0;

    /// Vertical band in which bullets stay alive
    pub const BULLET_MIN_Y: f32 = -30.0;
    pub const BULLET_MAX_Y: f32 = 700.0;
    /// Enemies past this line have escaped
    pub const ENEMY_ESCAPE_Y: f32 = 700.0;
    /// Enemies enter from just above the top edge
    pub const ENEMY_SPAWN_Y: f32 = -30.0;

    /// Score awarded per enemy destroyed
    pub const KILL_REWARD: u64 = 10;
    /// Ticks of play per level
    pub const TICKS_PER_LEVEL: u64 = 900;

    /// Collision forgiveness for hits against the player
    pub const PLAYER_HIT_FUDGE: f32 = 2.0;
    /// No forgiveness for player bullets against enemies
    pub const ENEMY_HIT_FUDGE: f32 = 0.0;
}

/// Clamp `val` to `[min, max]`.
///
/// Unlike `f32::clamp` this never panics when `min > max`; `min` wins, which
/// matters for very narrow play areas.
#[inline]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(val))
}

/// Convert a wall-clock delay to whole ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * consts::TICKS_PER_SECOND as u64).div_ceil(1000)
}
