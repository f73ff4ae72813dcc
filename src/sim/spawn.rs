//! Enemy spawn cadence and level progression

use super::state::{Enemy, EnemyKind, GameEvent, GameState};
use crate::consts::TICKS_PER_LEVEL;
use crate::tuning::Tuning;

/// Ticks between spawns at `level`, before jitter
pub fn base_spawn_delay(level: u32, tuning: &Tuning) -> i32 {
    let base = tuning.spawn_delay_base as i64;
    let delay = base - level as i64 * tuning.spawn_delay_per_level as i64;
    delay.min(base).max(tuning.spawn_delay_floor as i64) as i32
}

/// Count down the spawn timer, creating an enemy when it runs out.
///
/// The timer is checked before it is decremented, so a reset value that
/// jitters below zero spawns again on the very next tick. Returns the new
/// reset value when an enemy was spawned.
pub fn step_spawner(state: &mut GameState, tuning: &Tuning) -> Option<i32> {
    let due = state.spawn_timer <= 0;
    state.spawn_timer -= 1;
    if !due {
        return None;
    }

    let enemy = spawn_enemy(state, tuning);
    log::debug!(
        "Spawned {:?} at x={:.0} (level {})",
        enemy.kind,
        enemy.pos.x,
        state.level
    );
    state.enemies.push(enemy);

    let reset = base_spawn_delay(state.level, tuning)
        + state
            .rng
            .range_inclusive(-tuning.spawn_jitter, tuning.spawn_jitter);
    state.spawn_timer = reset;
    Some(reset)
}

/// A random enemy kind at a random x along the top edge
pub fn spawn_enemy(state: &mut GameState, tuning: &Tuning) -> Enemy {
    let kind = EnemyKind::ALL[state.rng.index(EnemyKind::ALL.len())];
    let margin = tuning.enemy_spawn_margin;
    let x = state.rng.range(margin, (tuning.width - margin).max(margin));
    Enemy::spawn(kind, x, tuning, &mut state.rng)
}

/// Bump the level every `TICKS_PER_LEVEL` ticks of play
pub fn advance_level(state: &mut GameState) {
    if state.time_ticks > 0 && state.time_ticks.is_multiple_of(TICKS_PER_LEVEL) {
        state.level += 1;
        log::debug!("Level up: {}", state.level);
        state.events.push(GameEvent::LevelUp { level: state.level });
    }
}
