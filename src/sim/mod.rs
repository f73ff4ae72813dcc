//! Simulation module
//!
//! All gameplay logic lives here:
//! - One tick per display frame, no wall-clock timers
//! - Delayed transitions are stored as tick deadlines in the state
//! - Entity order only affects draw layering, never outcomes
//! - No rendering or platform dependencies

pub mod collision;
pub mod palette;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, collides};
pub use palette::{BurstSource, Color};
pub use rng::SimRng;
pub use spawn::{advance_level, base_spawn_delay, step_spawner};
pub use state::{
    Ability, AbilityKind, Body, Bullet, Enemy, EnemyKind, GameEvent, GamePhase, GameState,
    Particle, PendingGameOver, Player, Shield, Skin, Weave,
};
pub use tick::{TickInput, tick};
