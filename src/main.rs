//! Space Shooter headless runner
//!
//! Drives the simulation with the demo autopilot and reports how the run
//! went. Rendering and input capture are left to embedding hosts.
//!
//! Usage:
//!   cargo run --release -- --frames 3600
//!   RUST_LOG=debug cargo run -- --classic --seed 7 --json
//!   cargo run -- --settings settings.json --quality high

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use space_shooter::sim::{GameEvent, GamePhase, GameState};
    use space_shooter::ui::UiHost;
    use space_shooter::{Game, GameError, QualityPreset, Settings, Tuning};

    #[derive(Parser)]
    #[command(name = "space-shooter")]
    #[command(about = "Run the shooter simulation headless with the demo autopilot")]
    struct Args {
        /// Number of frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u64,

        /// Fixed RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file overriding game balance
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// JSON file with variant flags and quality
        #[arg(long, conflicts_with = "classic")]
        settings: Option<PathBuf>,

        /// Play the ability-free variant
        #[arg(long)]
        classic: bool,

        /// Particle quality: low, medium or high
        #[arg(long)]
        quality: Option<QualityPreset>,

        /// Print the final frame as JSON
        #[arg(long)]
        json: bool,
    }

    /// Menu host that only logs
    struct LogUi;

    impl UiHost for LogUi {
        fn phase_changed(&mut self, phase: GamePhase, final_score: Option<u64>) {
            match (phase, final_score) {
                (GamePhase::GameOver, Some(score)) => log::info!("GAME OVER - score {score}"),
                _ => log::info!("Now in {:?}", phase),
            }
        }

        fn show_error(&mut self, message: &str) {
            log::error!("Game error: {message}");
        }
    }

    pub fn run() -> Result<(), GameError> {
        env_logger::init();
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let mut settings = match (&args.settings, args.classic) {
            (Some(path), _) => Settings::load(path)?,
            (None, true) => Settings::classic(),
            (None, false) => Settings::default(),
        };
        if let Some(quality) = args.quality {
            settings.quality = quality;
        }

        let state = match args.seed {
            Some(seed) => GameState::with_seed(seed),
            None => GameState::new(),
        };
        log::info!(
            "Space Shooter (native) starting: {} frames, {} variant, {} quality",
            args.frames,
            if settings.abilities { "ability" } else { "classic" },
            settings.quality
        );

        let mut game = Game::with_state(state, tuning, settings, Some(Box::new(LogUi)));
        game.start_game()?;
        // Autopilot only steers; the runner presses restart itself
        game.set_idle_mode(true);

        let mut runs = 1u32;
        let mut kills = 0u64;
        let mut best = 0u64;
        for _ in 0..args.frames {
            let mut game_over = false;
            for event in game.frame() {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PhaseChanged {
                        to: GamePhase::GameOver,
                        ..
                    } => {
                        best = best.max(game.state().final_score.unwrap_or(0));
                        game_over = true;
                    }
                    _ => {}
                }
            }
            if game_over {
                game.restart_game()?;
                runs += 1;
            }
        }
        best = best.max(game.state().score);

        if args.json {
            let view = game.view();
            match view.to_json() {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to serialize frame: {e}"),
            }
        } else {
            println!("=== RUN SUMMARY ===");
            println!("  Frames:     {}", args.frames);
            println!("  Runs:       {runs}");
            println!("  Kills:      {kills}");
            println!("  Best score: {best}");
            println!("  Level:      {}", game.state().level);
            if let Some(err) = game.error_indicator() {
                println!("  Error:      {err}");
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), space_shooter::GameError> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedding hosts drive `space_shooter::Game` directly
}
