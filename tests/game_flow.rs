use glam::Vec2;
use proptest::prelude::*;

use space_shooter::consts::{BULLET_MAX_Y, BULLET_MIN_Y};
use space_shooter::sim::{
    Bullet, Enemy, EnemyKind, GameEvent, GamePhase, GameState, SimRng, TickInput, collides, tick,
};
use space_shooter::{Game, Settings, Tuning};

fn playing(seed: u64, settings: &Settings) -> (GameState, Tuning) {
    let tuning = Tuning::default();
    let mut state = GameState::with_seed(seed);
    state.start_run(&tuning, settings).expect("start from menu");
    (state, tuning)
}

fn input_from_bits(bits: u8) -> TickInput {
    let mut abilities = Vec::new();
    if bits & 0b1000 != 0 {
        abilities.push(0);
    }
    if bits & 0b1_0000 != 0 {
        abilities.push(1);
    }
    TickInput {
        left: bits & 0b1 != 0,
        right: bits & 0b10 != 0,
        shoot: bits & 0b100 != 0,
        abilities,
        ..Default::default()
    }
}

// === Scenarios ===

#[test]
fn scenario_bullet_on_enemy() {
    let settings = Settings::classic();
    let (mut state, tuning) = playing(1, &settings);
    state.spawn_timer = 10_000;

    let mut enemy = Enemy::spawn(EnemyKind::Gunship, 100.0, &tuning, &mut SimRng::seeded(2));
    enemy.pos = Vec2::new(100.0, 100.0);
    enemy.radius = 15.0;
    enemy.speed = 0.0;
    enemy.fire_timer = 1_000;
    let bullet = Bullet::new(Vec2::new(100.0, 100.0), -7.0, 5.0, true);
    assert!(collides(&bullet, &enemy, 0.0));

    state.enemies.push(enemy);
    state.bullets.push(bullet);
    tick(&mut state, &TickInput::default(), &tuning, &settings);

    assert_eq!(state.score, 10);
    assert!(state.enemies.is_empty());
    assert!(state.bullets.is_empty());
    assert_eq!(state.particles.len(), tuning.burst_particles as usize);
}

#[test]
fn scenario_fatal_hit_then_game_over() {
    let settings = Settings::classic();
    let (mut state, tuning) = playing(3, &settings);
    state.spawn_timer = 10_000;
    state.score = 250;

    let player_pos = state.player.as_ref().expect("player").pos;
    state
        .bullets
        .push(Bullet::new(player_pos - Vec2::new(0.0, 3.0), 3.0, 5.0, false));
    tick(&mut state, &TickInput::default(), &tuning, &settings);
    assert!(state.pending_game_over.is_some());
    assert!(
        state
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerHit { .. }))
    );

    let mut ticks = 0;
    while state.phase == GamePhase::Playing {
        tick(&mut state, &TickInput::default(), &tuning, &settings);
        ticks += 1;
        assert!(ticks <= 18, "game over never fired");
    }
    assert_eq!(ticks, 18);
    assert_eq!(state.final_score, Some(250));
}

#[test]
fn scenario_start_from_game_over_resets() {
    let settings = Settings::default();
    let (mut state, tuning) = playing(4, &settings);
    state.score = 500;
    state.level = 6;
    state.schedule_game_over(0);
    tick(&mut state, &TickInput::default(), &tuning, &settings);
    assert_eq!(state.phase, GamePhase::GameOver);

    state.start_run(&tuning, &settings).expect("start from game over");
    assert_eq!(state.score, 0);
    assert_eq!(state.level, 1);
    assert_eq!(state.time_ticks, 0);
    assert!(state.bullets.is_empty());
    assert!(state.enemies.is_empty());
    assert!(state.particles.is_empty());
    assert!(state.player.is_some());
}

#[test]
fn spawn_cadence_tightens_with_level() {
    let settings = Settings::classic();
    let (mut state, tuning) = playing(5, &settings);
    state.level = 1;
    let mut spawned_low = 0;
    for _ in 0..600 {
        if space_shooter::sim::step_spawner(&mut state, &tuning).is_some() {
            spawned_low += 1;
        }
    }
    state.level = 20;
    let mut spawned_high = 0;
    for _ in 0..600 {
        if space_shooter::sim::step_spawner(&mut state, &tuning).is_some() {
            spawned_high += 1;
        }
    }
    assert!(spawned_high > spawned_low);
}

#[test]
fn host_runs_demo_without_errors() {
    let mut game = Game::with_state(
        GameState::with_seed(2024),
        Tuning::default(),
        Settings::default(),
        None,
    );
    game.set_idle_mode(true);

    // Autopilot alone never leaves the menu
    game.frame();
    assert_eq!(game.state().phase, GamePhase::Menu);

    game.start_game().expect("start from menu");
    for _ in 0..3000 {
        let game_over = game.frame().contains(&GameEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::GameOver,
        });
        assert!(game.last_error().is_none());
        if game_over {
            game.restart_game().expect("restart from game over");
        }
    }
    assert_eq!(game.state().phase, GamePhase::Playing);
}

// === Properties ===

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn score_and_level_never_decrease(
        seed in any::<u64>(),
        inputs in prop::collection::vec(0u8..32, 1..400),
        classic in any::<bool>(),
    ) {
        let settings = if classic { Settings::classic() } else { Settings::default() };
        let (mut state, tuning) = playing(seed, &settings);
        let mut last_score = state.score;
        let mut last_level = state.level;

        for bits in inputs {
            if state.phase != GamePhase::Playing {
                break;
            }
            let kills_before = state.score;
            tick(&mut state, &input_from_bits(bits), &tuning, &settings);

            prop_assert!(state.score >= last_score);
            prop_assert!(state.level >= last_level);
            prop_assert_eq!((state.score - kills_before) % 10, 0);
            last_score = state.score;
            last_level = state.level;

            for bullet in &state.bullets {
                prop_assert!(bullet.alive);
                prop_assert!(bullet.pos.y >= BULLET_MIN_Y && bullet.pos.y <= BULLET_MAX_Y);
            }
            prop_assert!(state.check_invariants().is_ok());
        }
    }

    #[test]
    fn level_tracks_elapsed_ticks(seed in any::<u64>(), frames in 1u64..2000) {
        let settings = Settings::classic();
        let (mut state, tuning) = playing(seed, &settings);
        for _ in 0..frames {
            // Make the player untouchable so the run lasts
            if let Some(player) = state.player.as_mut() {
                player.shield.active = true;
                player.shield.ticks = 2;
            }
            tick(&mut state, &TickInput::default(), &tuning, &settings);
        }
        prop_assert_eq!(state.phase, GamePhase::Playing);
        prop_assert_eq!(state.level as u64, 1 + state.time_ticks / 900);
    }
}
