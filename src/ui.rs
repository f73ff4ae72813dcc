//! Menu and render consumers
//!
//! The simulation never draws anything. A renderer gets a read-only
//! [`FrameView`] each frame; menus implement [`UiHost`] to hear about phase
//! changes and send start/restart commands back through [`crate::Game`].

use serde::Serialize;

use crate::consts::TICKS_PER_SECOND;
use crate::sim::{AbilityKind, Bullet, Enemy, GamePhase, GameState, Particle, Player};

/// Menu/overlay collaborator
pub trait UiHost {
    /// Names of required UI elements that could not be found.
    ///
    /// A non-empty list puts the game into feature-disabled mode: the
    /// simulation still runs but this host is never called again.
    fn missing_elements(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// The game moved to `phase`; `final_score` is set on game over
    fn phase_changed(&mut self, phase: GamePhase, final_score: Option<u64>);

    /// A non-fatal error should be shown to the player
    fn show_error(&mut self, _message: &str) {}
}

/// HUD line for one ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityStatus {
    pub kind: AbilityKind,
    pub ready: bool,
    /// Whole seconds of cooldown left (rounded up)
    pub seconds_left: u32,
}

/// Everything a renderer needs for one frame, borrowed read-only
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub time_ticks: u64,
    pub player: Option<&'a Player>,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub particles: &'a [Particle],
    pub final_score: Option<u64>,
    /// Visible error annotation, if any
    pub error: Option<String>,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a GameState, error: Option<String>) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            level: state.level,
            time_ticks: state.time_ticks,
            player: state.player.as_ref(),
            bullets: &state.bullets,
            enemies: &state.enemies,
            particles: &state.particles,
            final_score: state.final_score,
            error,
        }
    }

    /// Cooldown readout for the ability HUD
    pub fn ability_status(&self) -> Vec<AbilityStatus> {
        let Some(player) = self.player else {
            return Vec::new();
        };
        player
            .abilities
            .iter()
            .map(|a| AbilityStatus {
                kind: a.kind,
                ready: a.ready(),
                seconds_left: a.timer.div_ceil(TICKS_PER_SECOND),
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
