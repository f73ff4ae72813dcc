//! Per-frame simulation tick
//!
//! Core game loop: apply input, advance entities, spawn, resolve hits, purge
//! the dead and advance score/level.

use glam::Vec2;

use super::collision::collides;
use super::palette::BurstSource;
use super::spawn;
use super::state::{AbilityKind, Bullet, GameEvent, GamePhase, GameState, Weave};
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
    /// Ability trigger events by index (0 = Burst Shot, 1 = Shield)
    pub abilities: Vec<usize>,
    /// Start action (menu / game over)
    pub start: bool,
    /// Restart action (game over)
    pub restart: bool,
    /// Demo autopilot steers while playing; it never starts or restarts a run
    pub idle_mode: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, settings: &Settings) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                let _ = state.start_run(tuning, settings);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.start || input.restart {
                let _ = state.restart(tuning, settings);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let synthesized;
    let input = if input.idle_mode {
        synthesized = autopilot(state, tuning);
        &synthesized
    } else {
        input
    };

    state.time_ticks += 1;

    spawn::step_spawner(state, tuning);
    spawn::advance_level(state);

    update_player(state, input, tuning);
    update_bullets(state);
    update_enemies(state, tuning, settings);
    update_particles(state, tuning);

    resolve_collisions(state, tuning, settings);
    state.purge_dead();

    state.poll_game_over();
}

fn update_player(state: &mut GameState, input: &TickInput, tuning: &Tuning) {
    let Some(player) = state.player.as_mut() else {
        return;
    };

    player.update(input.left, input.right, tuning.player_x_bounds());

    let muzzle = Vec2::new(player.pos.x, player.pos.y - tuning.shot_offset_y);
    let mut shots = Vec::new();

    for &index in &input.abilities {
        let Some(ability) = player.try_ability(index, tuning.shield_duration) else {
            continue;
        };
        if ability == AbilityKind::BurstShot {
            for &angle in &tuning.burst_spread {
                let offset = angle.sin() * tuning.burst_offset_scale;
                shots.push(Bullet::new(
                    muzzle + Vec2::new(offset, 0.0),
                    -tuning.shot_speed * angle.cos(),
                    tuning.bullet_radius,
                    true,
                ));
            }
        }
        log::debug!("Ability used: {:?}", ability);
        state.events.push(GameEvent::AbilityUsed { ability });
    }

    if input.shoot && player.try_shoot(tuning.shot_cooldown) {
        shots.push(Bullet::new(
            muzzle,
            -tuning.shot_speed,
            tuning.bullet_radius,
            true,
        ));
    }

    state.bullets.extend(shots);
}

fn update_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.update();
    }
    state.bullets.retain(|b| b.alive);
}

fn update_enemies(state: &mut GameState, tuning: &Tuning, settings: &Settings) {
    let weave = settings.weaving_enemies.then(|| Weave {
        rate: tuning.weave_rate,
        amplitude: tuning.weave_amplitude,
        min_x: tuning.enemy_radius,
        max_x: tuning.width - tuning.enemy_radius,
    });

    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        if enemy.update(weave) {
            state.events.push(GameEvent::EnemyEscaped { kind: enemy.kind });
            continue;
        }

        let eligible = !settings.selective_fire || enemy.kind.can_fire();
        if eligible && enemy.ready_to_fire() {
            let vy = state
                .rng
                .range(tuning.enemy_bullet_speed_min, tuning.enemy_bullet_speed_max);
            shots.push(Bullet::new(
                enemy.pos + Vec2::new(0.0, tuning.enemy_muzzle_offset),
                vy,
                tuning.bullet_radius,
                false,
            ));
            enemy.reset_fire(&mut state.rng, tuning);
        }
    }
    state.enemies.retain(|e| e.alive);
    // Shots fired from below the live band are born dead and dropped here
    state.bullets.extend(shots.into_iter().filter(|b| b.alive));
}

fn update_particles(state: &mut GameState, tuning: &Tuning) {
    for particle in &mut state.particles {
        particle.update(tuning.particle_damping);
    }
    state.particles.retain(|p| p.alive());
}

/// Bursts and sparks requested while the entity lists are borrowed
#[derive(Clone, Copy)]
enum Effect {
    Burst { pos: Vec2, source: BurstSource, gravity: f32 },
    Sparks { pos: Vec2 },
}

fn resolve_collisions(state: &mut GameState, tuning: &Tuning, settings: &Settings) {
    let mut effects: Vec<Effect> = Vec::new();
    let mut kills = 0u64;
    let mut fatal_hit = false;

    // Player bullets vs enemies: one enemy per bullet
    for bullet in state.bullets.iter_mut().filter(|b| b.alive && b.is_player) {
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if collides(&*bullet, &*enemy, ENEMY_HIT_FUDGE) {
                bullet.alive = false;
                enemy.alive = false;
                kills += 1;
                effects.push(Effect::Burst {
                    pos: enemy.pos,
                    source: BurstSource::Enemy(enemy.kind),
                    gravity: 0.0,
                });
                state.events.push(GameEvent::EnemyDestroyed {
                    kind: enemy.kind,
                    pos: enemy.pos,
                });
                break;
            }
        }
    }

    if let Some(player) = state.player.as_ref() {
        let shielded = player.is_invulnerable();
        let death_burst = Effect::Burst {
            pos: player.pos,
            source: BurstSource::Player(player.skin),
            gravity: tuning.death_gravity,
        };

        // Enemy bullets vs player
        for bullet in state.bullets.iter_mut().filter(|b| b.alive && !b.is_player) {
            if !collides(&*bullet, player, PLAYER_HIT_FUDGE) {
                continue;
            }
            bullet.alive = false;
            if shielded {
                effects.push(Effect::Sparks { pos: player.pos });
                state.events.push(GameEvent::ShieldAbsorbed { pos: player.pos });
            } else {
                effects.push(death_burst);
                state.events.push(GameEvent::PlayerHit { pos: player.pos });
                fatal_hit = true;
            }
        }

        // Enemies vs player (direct contact)
        for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
            if !collides(&*enemy, player, PLAYER_HIT_FUDGE) {
                continue;
            }
            enemy.alive = false;
            if shielded {
                kills += 1;
                effects.push(Effect::Burst {
                    pos: enemy.pos,
                    source: BurstSource::Enemy(enemy.kind),
                    gravity: 0.0,
                });
                effects.push(Effect::Sparks { pos: player.pos });
                state.events.push(GameEvent::EnemyDestroyed {
                    kind: enemy.kind,
                    pos: enemy.pos,
                });
                state.events.push(GameEvent::ShieldAbsorbed { pos: player.pos });
            } else {
                effects.push(death_burst);
                state.events.push(GameEvent::PlayerHit { pos: player.pos });
                fatal_hit = true;
            }
        }
    }

    state.add_score(kills * KILL_REWARD);

    let max_particles = settings.max_particles();
    for effect in effects {
        match effect {
            Effect::Burst {
                pos,
                source,
                gravity,
            } => state.emit_burst(pos, source, tuning, max_particles, gravity),
            Effect::Sparks { pos } => state.emit_shield_sparks(pos, tuning, max_particles),
        }
    }

    if fatal_hit {
        state.schedule_game_over(tuning.game_over_delay_ticks());
    }
}

/// Demo-mode input: chase the lowest enemy, dodge incoming fire, and use
/// abilities when they are ready.
fn autopilot(state: &GameState, tuning: &Tuning) -> TickInput {
    let mut input = TickInput {
        shoot: true,
        idle_mode: true,
        ..Default::default()
    };
    let Some(player) = state.player.as_ref() else {
        return input;
    };

    // Most urgent enemy fire: closest bullet heading at us
    let threat = state
        .bullets
        .iter()
        .filter(|b| !b.is_player && b.pos.y < player.pos.y)
        .filter(|b| (b.pos.x - player.pos.x).abs() < player.radius + b.radius + 6.0)
        .min_by(|a, b| {
            (player.pos.y - a.pos.y)
                .partial_cmp(&(player.pos.y - b.pos.y))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(bullet) = threat {
        let close = player.pos.y - bullet.pos.y < 90.0;
        let shield_ready = player
            .ability(AbilityKind::Shield)
            .is_some_and(|a| a.ready());
        if close && shield_ready {
            input.abilities.extend(player.ability_index(AbilityKind::Shield));
        }
        // Sidestep away from the bullet, toward the roomier side when centred
        let (lo, hi) = tuning.player_x_bounds();
        let roomier_left = player.pos.x - lo > hi - player.pos.x;
        if bullet.pos.x > player.pos.x || (bullet.pos.x == player.pos.x && roomier_left) {
            input.left = true;
        } else {
            input.right = true;
        }
        return input;
    }

    // Chase the enemy closest to the bottom
    let target = state.enemies.iter().max_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(enemy) = target {
        let dx = enemy.pos.x - player.pos.x;
        if dx < -player.speed {
            input.left = true;
        } else if dx > player.speed {
            input.right = true;
        }
    }

    let burst_ready = player
        .ability(AbilityKind::BurstShot)
        .is_some_and(|a| a.ready());
    if burst_ready && state.enemies.len() >= 3 {
        input.abilities.extend(player.ability_index(AbilityKind::BurstShot));
    }

    input
}
