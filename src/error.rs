//! Error taxonomy
//!
//! Nothing here is retried. Errors are either absorbed (missing UI puts the
//! game into a feature-disabled mode) or surfaced as a visible annotation
//! while the frame loop keeps running.

use std::fmt;

use crate::sim::GamePhase;

/// Which invariant a state check tripped on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invariant {
    EntityRadius,
    DeadEntityRetained,
    BulletOutOfBounds,
    PlayerPresence,
    ParticleLife,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntityRadius => write!(f, "ENTITY_RADIUS"),
            Self::DeadEntityRetained => write!(f, "DEAD_ENTITY_RETAINED"),
            Self::BulletOutOfBounds => write!(f, "BULLET_OUT_OF_BOUNDS"),
            Self::PlayerPresence => write!(f, "PLAYER_PRESENCE"),
            Self::ParticleLife => write!(f, "PARTICLE_LIFE"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    /// A required UI collaborator was absent at init
    UiMissing { element: String },
    /// A command arrived in a phase that does not accept it
    InvalidTransition { from: GamePhase, command: &'static str },
    /// A tick panicked; the loop keeps going
    TickFailed { tick: u64, message: String },
    /// Post-tick state check failed
    InvariantViolation { tick: u64, rule: Invariant },
    /// Tuning values that would break the simulation
    InvalidTuning { field: &'static str, reason: String },
    /// Tuning/settings could not be read or parsed
    Config { path: String, message: String },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UiMissing { element } => write!(f, "UI elements missing: {element}"),
            Self::InvalidTransition { from, command } => {
                write!(f, "cannot {command} while in {from:?}")
            }
            Self::TickFailed { tick, message } => {
                write!(f, "game error at tick {tick}: {message}")
            }
            Self::InvariantViolation { tick, rule } => {
                write!(f, "invariant violated at tick {tick}: {rule}")
            }
            Self::InvalidTuning { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
            Self::Config { path, message } => write!(f, "failed to load {path}: {message}"),
        }
    }
}

impl std::error::Error for GameError {}
