//! Host-facing game driver
//!
//! Owns the simulation, latches input between frames, forwards phase changes
//! to the menu host and keeps the loop alive when a tick goes wrong.

use std::panic::{self, AssertUnwindSafe};

use crate::error::GameError;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::{FrameView, UiHost};

/// Game instance holding all state
pub struct Game {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    /// Latched input, consumed once per frame
    input: TickInput,
    ui: Option<Box<dyn UiHost>>,
    /// Set at construction when the UI host is absent or incomplete
    ui_error: Option<GameError>,
    /// Most recent tick failure, shown until the next run starts
    last_error: Option<GameError>,
    /// Events not yet handed to the caller
    outbox: Vec<GameEvent>,
}

impl Game {
    pub fn new(tuning: Tuning, settings: Settings, ui: Option<Box<dyn UiHost>>) -> Self {
        Self::with_state(GameState::new(), tuning, settings, ui)
    }

    pub fn with_state(
        state: GameState,
        tuning: Tuning,
        settings: Settings,
        ui: Option<Box<dyn UiHost>>,
    ) -> Self {
        let (ui, ui_error) = match ui {
            None => (
                None,
                Some(GameError::UiMissing {
                    element: "ui host".to_string(),
                }),
            ),
            Some(host) => {
                let missing = host.missing_elements();
                if missing.is_empty() {
                    (Some(host), None)
                } else {
                    (
                        None,
                        Some(GameError::UiMissing {
                            element: missing.join(", "),
                        }),
                    )
                }
            }
        };
        if let Some(err) = &ui_error {
            log::warn!("{err}; running without menus");
        }

        Self {
            state,
            tuning,
            settings,
            input: TickInput::default(),
            ui,
            ui_error,
            last_error: None,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // === Input ===

    pub fn set_left(&mut self, held: bool) {
        self.input.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.input.right = held;
    }

    pub fn set_shoot(&mut self, held: bool) {
        self.input.shoot = held;
    }

    /// Queue an ability trigger for the next frame
    pub fn trigger_ability(&mut self, index: usize) {
        self.input.abilities.push(index);
    }

    pub fn set_idle_mode(&mut self, on: bool) {
        self.input.idle_mode = on;
    }

    // === Commands ===

    /// Start a run from the menu or the game-over screen
    pub fn start_game(&mut self) -> Result<(), GameError> {
        let result = self.state.start_run(&self.tuning, &self.settings);
        self.after_command(result)
    }

    /// Start a fresh run from the game-over screen
    pub fn restart_game(&mut self) -> Result<(), GameError> {
        let result = self.state.restart(&self.tuning, &self.settings);
        self.after_command(result)
    }

    fn after_command(&mut self, result: Result<(), GameError>) -> Result<(), GameError> {
        match &result {
            Ok(()) => {
                self.last_error = None;
                self.dispatch_events();
            }
            Err(err) => log::warn!("{err}"),
        }
        result
    }

    // === Frame loop ===

    /// Run one frame and return the events it produced.
    ///
    /// Never panics: a failing tick is logged, surfaced through
    /// [`Game::error_indicator`], and the next frame runs as usual.
    pub fn frame(&mut self) -> Vec<GameEvent> {
        self.frame_with(tick)
    }

    fn frame_with(
        &mut self,
        step: impl FnOnce(&mut GameState, &TickInput, &Tuning, &Settings),
    ) -> Vec<GameEvent> {
        let input = self.input.clone();
        // Clear one-shot inputs after processing
        self.input.abilities.clear();
        self.input.start = false;
        self.input.restart = false;

        let outcome = contain(&mut self.state, |state| {
            step(state, &input, &self.tuning, &self.settings)
        });
        match outcome {
            Ok(()) => {
                if let Err(err) = self.state.check_invariants() {
                    self.record_error(err);
                }
            }
            Err(err) => self.record_error(err),
        }

        self.dispatch_events();
        std::mem::take(&mut self.outbox)
    }

    /// Run `f` against the state at the tick boundary, containing panics
    pub fn run_guarded(&mut self, f: impl FnOnce(&mut GameState)) -> Result<(), GameError> {
        let result = contain(&mut self.state, f);
        if let Err(err) = &result {
            self.record_error(err.clone());
        }
        result
    }

    fn record_error(&mut self, err: GameError) {
        log::error!("{err}");
        if let Some(ui) = self.ui.as_mut() {
            ui.show_error(&err.to_string());
        }
        self.last_error = Some(err);
    }

    fn dispatch_events(&mut self) {
        let events = self.state.drain_events();
        if let Some(ui) = self.ui.as_mut() {
            for event in &events {
                if let GameEvent::PhaseChanged { to, .. } = event {
                    let final_score = match to {
                        GamePhase::GameOver => self.state.final_score,
                        _ => None,
                    };
                    ui.phase_changed(*to, final_score);
                }
            }
        }
        self.outbox.extend(events);
    }

    // === Read side ===

    /// Text for the on-screen error annotation, if any
    pub fn error_indicator(&self) -> Option<String> {
        self.last_error
            .as_ref()
            .or(self.ui_error.as_ref())
            .map(|e| e.to_string())
    }

    pub fn ui_error(&self) -> Option<&GameError> {
        self.ui_error.as_ref()
    }

    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }

    /// Read-only snapshot for the renderer
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new(&self.state, self.error_indicator())
    }
}

/// Catch a panic raised by `f` and turn it into a `TickFailed` error
fn contain(state: &mut GameState, f: impl FnOnce(&mut GameState)) -> Result<(), GameError> {
    let tick_no = state.time_ticks;
    panic::catch_unwind(AssertUnwindSafe(|| f(state))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        GameError::TickFailed {
            tick: tick_no,
            message,
        }
    })
}
