//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; renderers and
//! menus only ever read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::palette::{BurstSource, Color};
use super::rng::SimRng;
use crate::consts::*;
use crate::error::{GameError, Invariant};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart
    GameOver,
}

/// Player appearance, picked at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Skin {
    Sunny,
    Stretchy,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Drone,
    Weaver,
    Gunship,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Drone, EnemyKind::Weaver, EnemyKind::Gunship];

    /// Whether this kind returns fire under selective fire
    pub fn can_fire(self) -> bool {
        match self {
            EnemyKind::Drone => false,
            EnemyKind::Weaver | EnemyKind::Gunship => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Fan of player bullets
    BurstShot,
    /// Temporary invulnerability
    Shield,
}

/// A player ability with its own cooldown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub kind: AbilityKind,
    /// Ticks to wait after each use
    pub cooldown: u32,
    /// Ticks until ready (0 = ready)
    pub timer: u32,
}

impl Ability {
    pub fn new(kind: AbilityKind, cooldown: u32) -> Self {
        Self {
            kind,
            cooldown,
            timer: 0,
        }
    }

    pub fn ready(&self) -> bool {
        self.timer == 0
    }
}

/// Invulnerability granted by the Shield ability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    pub active: bool,
    pub ticks: u32,
}

/// Common shape for anything that takes part in hit-testing
pub trait Body {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Horizontal speed (px/tick)
    pub speed: f32,
    /// Ticks until the next regular shot
    pub cooldown: u32,
    pub skin: Skin,
    /// Empty when the variant has no abilities
    pub abilities: Vec<Ability>,
    pub shield: Shield,
}

impl Player {
    /// Spawn at the bottom centre of the play area
    pub fn spawn(tuning: &Tuning, settings: &Settings, rng: &mut SimRng) -> Self {
        let abilities = if settings.abilities {
            vec![
                Ability::new(AbilityKind::BurstShot, tuning.burst_cooldown),
                Ability::new(AbilityKind::Shield, tuning.shield_cooldown),
            ]
        } else {
            Vec::new()
        };
        Self {
            pos: Vec2::new(tuning.width / 2.0, tuning.height - tuning.player_bottom_offset),
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            cooldown: 0,
            skin: if rng.coin() { Skin::Sunny } else { Skin::Stretchy },
            abilities,
            shield: Shield::default(),
        }
    }

    /// Apply movement and count down every timer
    pub fn update(&mut self, left: bool, right: bool, x_bounds: (f32, f32)) {
        if left {
            self.pos.x -= self.speed;
        }
        if right {
            self.pos.x += self.speed;
        }
        self.pos.x = crate::clamp(self.pos.x, x_bounds.0, x_bounds.1);

        self.cooldown = self.cooldown.saturating_sub(1);
        for ability in &mut self.abilities {
            ability.timer = ability.timer.saturating_sub(1);
        }
        if self.shield.active {
            self.shield.ticks = self.shield.ticks.saturating_sub(1);
            if self.shield.ticks == 0 {
                self.shield.active = false;
            }
        }
    }

    /// Fire if the gun is cooled down; resets the cooldown on success
    pub fn try_shoot(&mut self, reload: u32) -> bool {
        if self.cooldown == 0 {
            self.cooldown = reload;
            true
        } else {
            false
        }
    }

    /// Trigger ability `index` if it exists and is ready.
    ///
    /// The shield takes effect here; burst bullets are spawned by the caller.
    pub fn try_ability(&mut self, index: usize, shield_duration: u32) -> Option<AbilityKind> {
        let ability = self.abilities.get_mut(index)?;
        if !ability.ready() {
            return None;
        }
        ability.timer = ability.cooldown;
        let kind = ability.kind;
        if kind == AbilityKind::Shield {
            self.shield = Shield {
                active: true,
                ticks: shield_duration,
            };
        }
        Some(kind)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.shield.active
    }

    pub fn ability(&self, kind: AbilityKind) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.kind == kind)
    }

    /// Index of `kind` in the ability list, as used by trigger input
    pub fn ability_index(&self, kind: AbilityKind) -> Option<usize> {
        self.abilities.iter().position(|a| a.kind == kind)
    }
}

impl Body for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A projectile moving straight up or down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Negative = upward (player), positive = downward (enemy)
    pub vy: f32,
    pub radius: f32,
    pub is_player: bool,
    pub alive: bool,
}

impl Bullet {
    /// Bullets created outside the live band start dead
    pub fn new(pos: Vec2, vy: f32, radius: f32, is_player: bool) -> Self {
        Self {
            pos,
            vy,
            radius,
            is_player,
            alive: Self::in_bounds(pos.y),
        }
    }

    pub fn in_bounds(y: f32) -> bool {
        (BULLET_MIN_Y..=BULLET_MAX_Y).contains(&y)
    }

    pub fn update(&mut self) {
        self.pos.y += self.vy;
        if !Self::in_bounds(self.pos.y) {
            self.alive = false;
        }
    }
}

impl Body for Bullet {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Sideways drift parameters for weaving enemies
#[derive(Debug, Clone, Copy)]
pub struct Weave {
    pub rate: f32,
    pub amplitude: f32,
    pub min_x: f32,
    pub max_x: f32,
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    /// Descent speed (px/tick)
    pub speed: f32,
    /// Base reload time, fixed per instance
    pub fire_cooldown: i32,
    /// Ticks until the next shot; fires at <= 0
    pub fire_timer: i32,
    /// Oscillator phase for weaving
    pub weave_phase: f32,
    pub alive: bool,
}

impl Enemy {
    pub fn spawn(kind: EnemyKind, x: f32, tuning: &Tuning, rng: &mut SimRng) -> Self {
        let fire_cooldown = tuning.enemy_fire_base + rng.range_i32(0, tuning.enemy_fire_jitter);
        Self {
            pos: Vec2::new(x, ENEMY_SPAWN_Y),
            radius: tuning.enemy_radius,
            kind,
            speed: tuning.enemy_speed_min + rng.range(0.0, tuning.enemy_speed_jitter),
            fire_cooldown,
            fire_timer: fire_cooldown,
            weave_phase: rng.angle(),
            alive: true,
        }
    }

    /// Descend (and weave, if enabled). Returns true if the enemy escaped.
    pub fn update(&mut self, weave: Option<Weave>) -> bool {
        self.pos.y += self.speed;
        if let Some(w) = weave {
            self.weave_phase += w.rate;
            self.pos.x = crate::clamp(
                self.pos.x + self.weave_phase.sin() * w.amplitude,
                w.min_x,
                w.max_x,
            );
        }
        self.fire_timer -= 1;
        if self.pos.y > ENEMY_ESCAPE_Y {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn ready_to_fire(&self) -> bool {
        self.fire_timer <= 0
    }

    pub fn reset_fire(&mut self, rng: &mut SimRng, tuning: &Tuning) {
        self.fire_timer = self.fire_cooldown
            + rng.range_i32(tuning.enemy_reload_min, tuning.enemy_reload_max);
    }
}

impl Body for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub radius: f32,
    /// Ticks left
    pub life: u32,
    pub max_life: u32,
    /// Added to vel.y each tick
    pub gravity: f32,
}

impl Particle {
    pub fn update(&mut self, damping: f32) {
        self.pos += self.vel;
        self.vel *= damping;
        self.vel.y += self.gravity;
        self.life = self.life.saturating_sub(1);
    }

    pub fn alive(&self) -> bool {
        self.life > 0
    }

    /// Fade factor for rendering, 1.0 at birth down to 0.0
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }
}

/// A game-over transition waiting for the death animation to play out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingGameOver {
    pub fire_at_tick: u64,
    /// Score at the moment of the fatal hit
    pub final_score: u64,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    EnemyDestroyed { kind: EnemyKind, pos: Vec2 },
    EnemyEscaped { kind: EnemyKind },
    PlayerHit { pos: Vec2 },
    ShieldAbsorbed { pos: Vec2 },
    AbilityUsed { ability: AbilityKind },
    LevelUp { level: u32 },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Never decreases within a run
    pub score: u64,
    /// Starts at 1, never decreases within a run
    pub level: u32,
    /// Ticks of play in the current run
    pub time_ticks: u64,
    /// Ticks until the next enemy spawn
    pub spawn_timer: i32,
    /// Present only while playing
    pub player: Option<Player>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub pending_game_over: Option<PendingGameOver>,
    /// Score shown on the game-over screen
    pub final_score: Option<u64>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub rng: SimRng,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_rng(SimRng::from_entropy())
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed seed, for tests and demos
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SimRng::seeded(seed))
    }

    pub fn with_rng(rng: SimRng) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            time_ticks: 0,
            spawn_timer: 0,
            player: None,
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            pending_game_over: None,
            final_score: None,
            events: Vec::new(),
            rng,
        }
    }

    /// Begin a run from the menu or the game-over screen
    pub fn start_run(&mut self, tuning: &Tuning, settings: &Settings) -> Result<(), GameError> {
        if self.phase == GamePhase::Playing {
            return Err(GameError::InvalidTransition {
                from: self.phase,
                command: "start",
            });
        }
        self.reset_world(tuning, settings);
        self.set_phase(GamePhase::Playing);
        Ok(())
    }

    /// Begin a fresh run after game over
    pub fn restart(&mut self, tuning: &Tuning, settings: &Settings) -> Result<(), GameError> {
        if self.phase != GamePhase::GameOver {
            return Err(GameError::InvalidTransition {
                from: self.phase,
                command: "restart",
            });
        }
        self.start_run(tuning, settings)
    }

    fn reset_world(&mut self, tuning: &Tuning, settings: &Settings) {
        self.score = 0;
        self.level = 1;
        self.time_ticks = 0;
        self.spawn_timer = 0;
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.pending_game_over = None;
        self.final_score = None;
        self.player = Some(Player::spawn(tuning, settings, &mut self.rng));
    }

    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {:?} -> {:?} (score {})", from, to, self.score);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Queue the game-over transition after a fatal hit.
    ///
    /// The first fatal hit wins; later hits neither reschedule nor cancel it.
    pub fn schedule_game_over(&mut self, delay_ticks: u64) {
        if self.pending_game_over.is_some() {
            return;
        }
        let pending = PendingGameOver {
            fire_at_tick: self.time_ticks + delay_ticks,
            final_score: self.score,
        };
        log::debug!(
            "Game over scheduled for tick {} (score {})",
            pending.fire_at_tick,
            pending.final_score
        );
        self.pending_game_over = Some(pending);
    }

    /// Fire the pending game over if its time has come
    pub fn poll_game_over(&mut self) {
        let Some(pending) = self.pending_game_over else {
            return;
        };
        if self.time_ticks < pending.fire_at_tick {
            return;
        }
        self.pending_game_over = None;
        self.final_score = Some(pending.final_score);
        self.player = None;
        self.set_phase(GamePhase::GameOver);
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Append a burst of particles, respecting the cap
    pub fn emit_burst(
        &mut self,
        pos: Vec2,
        source: BurstSource,
        tuning: &Tuning,
        max_particles: usize,
        gravity: f32,
    ) {
        let colors = source.colors();
        for _ in 0..tuning.burst_particles {
            if self.particles.len() >= max_particles {
                break;
            }
            let angle = self.rng.angle();
            let speed = self.rng.range(tuning.burst_speed.0, tuning.burst_speed.1);
            let color = colors[self.rng.index(colors.len())];
            let radius = self.rng.range(tuning.burst_radius.0, tuning.burst_radius.1);
            let life = self.random_life(tuning.burst_life);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                radius,
                life,
                max_life: life,
                gravity,
            });
        }
    }

    /// Small deflection sparks when the shield soaks a hit
    pub fn emit_shield_sparks(&mut self, pos: Vec2, tuning: &Tuning, max_particles: usize) {
        let color = BurstSource::Shield.colors()[0];
        for _ in 0..tuning.shield_sparks {
            if self.particles.len() >= max_particles {
                break;
            }
            let angle = self.rng.angle();
            let speed = self.rng.range(tuning.spark_speed.0, tuning.spark_speed.1);
            let radius = self.rng.range(tuning.spark_radius.0, tuning.spark_radius.1);
            let life = self.random_life(tuning.spark_life);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                radius,
                life,
                max_life: life,
                gravity: 0.0,
            });
        }
    }

    fn random_life(&mut self, (lo, hi): (u32, u32)) -> u32 {
        let lo = lo.max(1);
        let hi = hi.max(lo);
        self.rng.range_i32(lo as i32, hi as i32).max(1) as u32
    }

    /// Drop everything marked dead
    pub fn purge_dead(&mut self) {
        self.bullets.retain(|b| b.alive);
        self.enemies.retain(|e| e.alive);
        self.particles.retain(|p| p.alive());
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Verify the between-tick invariants
    pub fn check_invariants(&self) -> Result<(), GameError> {
        let violation = |rule| GameError::InvariantViolation {
            tick: self.time_ticks,
            rule,
        };

        match (self.phase, &self.player) {
            (GamePhase::Playing, None) => return Err(violation(Invariant::PlayerPresence)),
            (GamePhase::Playing, Some(p)) if !(p.radius > 0.0) => {
                return Err(violation(Invariant::EntityRadius));
            }
            _ => {}
        }

        for bullet in &self.bullets {
            if !bullet.alive {
                return Err(violation(Invariant::DeadEntityRetained));
            }
            if !(bullet.radius > 0.0) {
                return Err(violation(Invariant::EntityRadius));
            }
            if !Bullet::in_bounds(bullet.pos.y) {
                return Err(violation(Invariant::BulletOutOfBounds));
            }
        }
        for enemy in &self.enemies {
            if !enemy.alive {
                return Err(violation(Invariant::DeadEntityRetained));
            }
            if !(enemy.radius > 0.0) {
                return Err(violation(Invariant::EntityRadius));
            }
        }
        for particle in &self.particles {
            if !particle.alive() {
                return Err(violation(Invariant::ParticleLife));
            }
            if !(particle.radius > 0.0) {
                return Err(violation(Invariant::EntityRadius));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> (GameState, Tuning, Settings) {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = GameState::with_seed(42);
        state.start_run(&tuning, &settings).expect("start from menu");
        (state, tuning, settings)
    }

    #[test]
    fn test_new_state_is_menu() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.player.is_none());
        assert_eq!(state.level, 1);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_start_run_spawns_player() {
        let (state, tuning, _) = playing_state();
        assert_eq!(state.phase, GamePhase::Playing);
        let player = state.player.as_ref().expect("player");
        assert_eq!(player.pos, Vec2::new(tuning.width / 2.0, tuning.height - 66.0));
        assert_eq!(player.abilities.len(), 2);
    }

    #[test]
    fn test_start_rejected_while_playing() {
        let (mut state, tuning, settings) = playing_state();
        state.score = 40;
        let err = state.start_run(&tuning, &settings).unwrap_err();
        assert!(matches!(err, GameError::InvalidTransition { from: GamePhase::Playing, .. }));
        assert_eq!(state.score, 40);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let tuning = Tuning::default();
        let settings = Settings::default();
        let mut state = GameState::with_seed(3);
        assert!(state.restart(&tuning, &settings).is_err());
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_classic_player_has_no_abilities() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seeded(5);
        let mut player = Player::spawn(&tuning, &Settings::classic(), &mut rng);
        assert!(player.abilities.is_empty());
        assert_eq!(player.try_ability(0, 120), None);
    }

    #[test]
    fn test_player_clamped_to_bounds() {
        let (mut state, tuning, _) = playing_state();
        let bounds = tuning.player_x_bounds();
        let player = state.player.as_mut().expect("player");
        for _ in 0..200 {
            player.update(true, false, bounds);
        }
        assert_eq!(player.pos.x, 32.0);
        for _ in 0..200 {
            player.update(false, true, bounds);
        }
        assert_eq!(player.pos.x, tuning.width - 32.0);
    }

    #[test]
    fn test_shoot_cooldown() {
        let (mut state, tuning, _) = playing_state();
        let bounds = tuning.player_x_bounds();
        let player = state.player.as_mut().expect("player");
        assert!(player.try_shoot(18));
        assert!(!player.try_shoot(18));
        for _ in 0..17 {
            player.update(false, false, bounds);
            assert!(!player.try_shoot(18));
        }
        player.update(false, false, bounds);
        assert!(player.try_shoot(18));
    }

    #[test]
    fn test_shield_ability_lifecycle() {
        let (mut state, tuning, _) = playing_state();
        let bounds = tuning.player_x_bounds();
        let player = state.player.as_mut().expect("player");
        let idx = player.ability_index(AbilityKind::Shield).expect("shield");

        assert_eq!(player.try_ability(idx, 120), Some(AbilityKind::Shield));
        assert!(player.is_invulnerable());
        // Cooldown gates a second trigger
        assert_eq!(player.try_ability(idx, 120), None);

        for _ in 0..119 {
            player.update(false, false, bounds);
        }
        assert!(player.is_invulnerable());
        player.update(false, false, bounds);
        assert!(!player.is_invulnerable());

        let remaining = player.ability(AbilityKind::Shield).expect("shield").timer;
        assert_eq!(remaining, 600 - 120);
    }

    #[test]
    fn test_unknown_ability_index_ignored() {
        let (mut state, _, _) = playing_state();
        let player = state.player.as_mut().expect("player");
        assert_eq!(player.try_ability(7, 120), None);
    }

    #[test]
    fn test_bullet_leaves_bounds() {
        let mut bullet = Bullet::new(Vec2::new(10.0, -25.0), -7.0, 5.0, true);
        assert!(bullet.alive);
        bullet.update();
        assert!(!bullet.alive);

        let born_outside = Bullet::new(Vec2::new(10.0, 720.0), 4.0, 5.0, false);
        assert!(!born_outside.alive);
    }

    #[test]
    fn test_enemy_escape_and_fire_timer() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seeded(9);
        let mut enemy = Enemy::spawn(EnemyKind::Gunship, 100.0, &tuning, &mut rng);
        assert!((60..140).contains(&enemy.fire_cooldown));
        assert_eq!(enemy.fire_timer, enemy.fire_cooldown);
        assert!(enemy.speed >= 1.8 && enemy.speed < 2.7);

        enemy.pos.y = 699.0;
        enemy.speed = 2.0;
        assert!(enemy.update(None));
        assert!(!enemy.alive);

        enemy.fire_timer = 0;
        assert!(enemy.ready_to_fire());
        enemy.reset_fire(&mut rng, &tuning);
        assert!(enemy.fire_timer >= enemy.fire_cooldown - 12);
        assert!(enemy.fire_timer < enemy.fire_cooldown + 28);
    }

    #[test]
    fn test_weave_stays_in_lane() {
        let tuning = Tuning::default();
        let mut rng = SimRng::seeded(11);
        let mut enemy = Enemy::spawn(EnemyKind::Weaver, 30.0, &tuning, &mut rng);
        let weave = Weave {
            rate: 0.05,
            amplitude: 1.2,
            min_x: 28.0,
            max_x: tuning.width - 28.0,
        };
        let start_x = enemy.pos.x;
        let mut moved = false;
        for _ in 0..200 {
            enemy.update(Some(weave));
            assert!(enemy.pos.x >= 28.0 && enemy.pos.x <= tuning.width - 28.0);
            moved |= (enemy.pos.x - start_x).abs() > 1.0;
        }
        assert!(moved);
    }

    #[test]
    fn test_particle_fades_out() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(2.0, 0.0),
            color: 0xffffff,
            radius: 3.0,
            life: 4,
            max_life: 4,
            gravity: 0.5,
        };
        let mut last_alpha = p.alpha();
        assert_eq!(last_alpha, 1.0);
        while p.alive() {
            p.update(0.985);
            assert!(p.alpha() < last_alpha);
            last_alpha = p.alpha();
        }
        assert_eq!(p.alpha(), 0.0);
        assert!(p.vel.y > 0.0);
    }

    #[test]
    fn test_burst_respects_cap() {
        let (mut state, tuning, _) = playing_state();
        state.emit_burst(Vec2::ZERO, BurstSource::Enemy(EnemyKind::Drone), &tuning, 10, 0.0);
        assert_eq!(state.particles.len(), 10);
        state.particles.clear();
        state.emit_burst(Vec2::ZERO, BurstSource::Enemy(EnemyKind::Drone), &tuning, 500, 0.0);
        assert_eq!(state.particles.len(), 18);
        for p in &state.particles {
            assert!(BurstSource::Enemy(EnemyKind::Drone).colors().contains(&p.color));
            assert!((22..36).contains(&p.life));
        }
    }

    #[test]
    fn test_game_over_scheduled_once() {
        let (mut state, _, _) = playing_state();
        state.time_ticks = 100;
        state.score = 30;
        state.schedule_game_over(18);
        state.score = 50;
        state.time_ticks = 105;
        state.schedule_game_over(18);
        assert_eq!(
            state.pending_game_over,
            Some(PendingGameOver {
                fire_at_tick: 118,
                final_score: 30
            })
        );

        state.time_ticks = 117;
        state.poll_game_over();
        assert_eq!(state.phase, GamePhase::Playing);
        state.time_ticks = 118;
        state.poll_game_over();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_score, Some(30));
        assert!(state.player.is_none());
    }

    #[test]
    fn test_purge_is_idempotent() {
        let (mut state, tuning, _) = playing_state();
        state.bullets.push(Bullet::new(Vec2::new(50.0, 50.0), -7.0, 5.0, true));
        state.bullets.push(Bullet::new(Vec2::new(60.0, 50.0), -7.0, 5.0, true));
        state.bullets[1].alive = false;
        state.emit_burst(Vec2::ZERO, BurstSource::Shield, &tuning, 100, 0.0);
        state.purge_dead();
        let bullets = state.bullets.len();
        let particles = state.particles.len();
        state.purge_dead();
        assert_eq!(state.bullets.len(), bullets);
        assert_eq!(state.particles.len(), particles);
        assert_eq!(bullets, 1);
    }

    #[test]
    fn test_invariant_flags_dead_bullet() {
        let (mut state, _, _) = playing_state();
        state.bullets.push(Bullet::new(Vec2::new(50.0, 50.0), -7.0, 5.0, true));
        state.bullets[0].alive = false;
        let err = state.check_invariants().unwrap_err();
        assert!(matches!(
            err,
            GameError::InvariantViolation {
                rule: Invariant::DeadEntityRetained,
                ..
            }
        ));
    }
}
