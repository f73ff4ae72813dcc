//! Data-driven game balance
//!
//! Every number the simulation uses to pace the game lives here so a JSON
//! file can override it without a rebuild. Missing fields fall back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::sim::Bullet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play area ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub player_radius: f32,
    /// Horizontal speed (px/tick)
    pub player_speed: f32,
    /// Gap kept between the player and the side walls
    pub player_edge_margin: f32,
    /// Distance of the player's centre above the bottom edge
    pub player_bottom_offset: f32,
    /// Ticks between regular shots
    pub shot_cooldown: u32,
    pub shot_speed: f32,
    /// Muzzle offset above the player's centre
    pub shot_offset_y: f32,
    pub bullet_radius: f32,

    // === Abilities ===
    pub burst_cooldown: u32,
    /// Spread angles (radians from vertical) of the burst shot
    pub burst_spread: Vec<f32>,
    /// Horizontal muzzle offset per unit of sin(angle)
    pub burst_offset_scale: f32,
    pub shield_cooldown: u32,
    pub shield_duration: u32,

    // === Enemies ===
    pub enemy_radius: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_jitter: f32,
    /// Enemies spawn at least this far from the side walls
    pub enemy_spawn_margin: f32,
    pub enemy_fire_base: i32,
    pub enemy_fire_jitter: i32,
    /// Reload jitter range `[min, max)` added to the base cooldown
    pub enemy_reload_min: i32,
    pub enemy_reload_max: i32,
    pub enemy_muzzle_offset: f32,
    pub enemy_bullet_speed_min: f32,
    pub enemy_bullet_speed_max: f32,
    /// Phase advance per tick for weaving enemies
    pub weave_rate: f32,
    /// Peak horizontal drift per tick for weaving enemies
    pub weave_amplitude: f32,

    // === Spawn cadence ===
    pub spawn_delay_base: i32,
    pub spawn_delay_per_level: i32,
    pub spawn_delay_floor: i32,
    pub spawn_jitter: i32,

    // === Particles ===
    pub burst_particles: u32,
    pub burst_speed: (f32, f32),
    pub burst_radius: (f32, f32),
    pub burst_life: (u32, u32),
    pub shield_sparks: u32,
    pub spark_speed: (f32, f32),
    pub spark_radius: (f32, f32),
    pub spark_life: (u32, u32),
    /// Multiplicative velocity damping per tick
    pub particle_damping: f32,
    /// Downward drift added to player death debris each tick
    pub death_gravity: f32,

    // === Flow ===
    /// Delay between a fatal hit and the game-over screen
    pub game_over_delay_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width: PLAY_WIDTH,
            height: PLAY_HEIGHT,

            player_radius: 28.0,
            player_speed: 5.2,
            player_edge_margin: 4.0,
            player_bottom_offset: 66.0,
            shot_cooldown: 18,
            shot_speed: 7.0,
            shot_offset_y: 34.0,
            bullet_radius: 5.0,

            burst_cooldown: 300,
            burst_spread: vec![-0.30, -0.15, 0.0, 0.15, 0.30],
            burst_offset_scale: 10.0,
            shield_cooldown: 600,
            shield_duration: 120,

            enemy_radius: 28.0,
            enemy_speed_min: 1.8,
            enemy_speed_jitter: 0.9,
            enemy_spawn_margin: 38.0,
            enemy_fire_base: 60,
            enemy_fire_jitter: 80,
            enemy_reload_min: -12,
            enemy_reload_max: 28,
            enemy_muzzle_offset: 28.0,
            enemy_bullet_speed_min: 3.0,
            enemy_bullet_speed_max: 5.0,
            weave_rate: 0.05,
            weave_amplitude: 1.2,

            spawn_delay_base: 60,
            spawn_delay_per_level: 3,
            spawn_delay_floor: 18,
            spawn_jitter: 10,

            burst_particles: 18,
            burst_speed: (2.0, 6.0),
            burst_radius: (3.0, 7.0),
            burst_life: (22, 36),
            shield_sparks: 6,
            spark_speed: (1.0, 3.0),
            spark_radius: (2.0, 4.0),
            spark_life: (10, 18),
            particle_damping: 0.985,
            death_gravity: 0.06,

            game_over_delay_ms: 300,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, then validate it
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let tuning: Self = serde_json::from_str(json).map_err(|e| GameError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let tuning: Self = serde_json::from_str(&json).map_err(|e| GameError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("player_radius", self.player_radius),
            ("bullet_radius", self.bullet_radius),
            ("enemy_radius", self.enemy_radius),
            ("burst_radius.0", self.burst_radius.0),
            ("spark_radius.0", self.spark_radius.0),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(GameError::InvalidTuning {
                    field,
                    reason: format!("must be > 0, got {value}"),
                });
            }
        }

        self.validate_play_area()?;

        if self.spawn_delay_floor > self.spawn_delay_base {
            return Err(GameError::InvalidTuning {
                field: "spawn_delay_floor",
                reason: format!(
                    "floor {} exceeds base {}",
                    self.spawn_delay_floor, self.spawn_delay_base
                ),
            });
        }
        if self.spawn_jitter < 0 {
            return Err(GameError::InvalidTuning {
                field: "spawn_jitter",
                reason: "must be >= 0".to_string(),
            });
        }
        if self.enemy_reload_min >= self.enemy_reload_max {
            return Err(GameError::InvalidTuning {
                field: "enemy_reload_min",
                reason: "reload range is empty".to_string(),
            });
        }
        if self.enemy_bullet_speed_min > self.enemy_bullet_speed_max {
            return Err(GameError::InvalidTuning {
                field: "enemy_bullet_speed_min",
                reason: "exceeds enemy_bullet_speed_max".to_string(),
            });
        }
        if self.burst_life.0 == 0 || self.spark_life.0 == 0 {
            return Err(GameError::InvalidTuning {
                field: "burst_life",
                reason: "particles need at least one tick of life".to_string(),
            });
        }
        Ok(())
    }

    /// The bullet band and escape line are fixed, so the player and its
    /// muzzle must sit inside them and the lanes must fit the width.
    fn validate_play_area(&self) -> Result<(), GameError> {
        let player_y = self.height - self.player_bottom_offset;
        let muzzle_y = player_y - self.shot_offset_y;
        if !Bullet::in_bounds(muzzle_y) {
            return Err(GameError::InvalidTuning {
                field: "height",
                reason: format!(
                    "player muzzle at y={muzzle_y} is outside [{BULLET_MIN_Y}, {BULLET_MAX_Y}]"
                ),
            });
        }
        if !Bullet::in_bounds(player_y) || player_y > ENEMY_ESCAPE_Y {
            return Err(GameError::InvalidTuning {
                field: "height",
                reason: format!(
                    "player at y={player_y} is below the bullet band or the enemy escape line"
                ),
            });
        }

        let (lo, hi) = self.player_x_bounds();
        if lo > hi {
            return Err(GameError::InvalidTuning {
                field: "width",
                reason: format!("{} is too narrow for the player", self.width),
            });
        }
        if 2.0 * self.enemy_spawn_margin > self.width {
            return Err(GameError::InvalidTuning {
                field: "width",
                reason: format!("{} is too narrow for the enemy spawn lane", self.width),
            });
        }
        Ok(())
    }

    /// Ticks between a fatal hit and the game-over transition
    pub fn game_over_delay_ticks(&self) -> u64 {
        crate::ms_to_ticks(self.game_over_delay_ms)
    }

    /// Horizontal range the player's centre may occupy
    pub fn player_x_bounds(&self) -> (f32, f32) {
        let inset = self.player_radius + self.player_edge_margin;
        (inset, self.width - inset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
        assert_eq!(Tuning::default().game_over_delay_ticks(), 18);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 8.0, "shot_cooldown": 10 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.player_speed, 8.0);
        assert_eq!(tuning.shot_cooldown, 10);
        assert_eq!(tuning.enemy_radius, 28.0);
        assert_eq!(tuning.burst_spread.len(), 5);
    }

    #[test]
    fn test_rejects_zero_radius() {
        let err = Tuning::from_json(r#"{ "enemy_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidTuning {
                field: "enemy_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_spawn_floor() {
        let err = Tuning::from_json(r#"{ "spawn_delay_floor": 90 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { .. }));
    }

    #[test]
    fn test_rejects_height_outside_bullet_band() {
        // Player at y=834, every shot would be born below the band
        let err = Tuning::from_json(r#"{ "height": 900.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { field: "height", .. }));

        // Muzzle above the band
        let err = Tuning::from_json(r#"{ "height": 60.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { field: "height", .. }));

        // Tallest playable field still shoots
        let tuning = Tuning::from_json(r#"{ "height": 766.0 }"#).expect("player at 700");
        let muzzle_y = tuning.height - tuning.player_bottom_offset - tuning.shot_offset_y;
        assert!(Bullet::new(glam::Vec2::new(0.0, muzzle_y), -7.0, 5.0, true).alive);
    }

    #[test]
    fn test_rejects_width_too_narrow() {
        let err = Tuning::from_json(r#"{ "width": 60.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { field: "width", .. }));
        let err = Tuning::from_json(r#"{ "width": 70.0 }"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidTuning { field: "width", .. }));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GameError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GameError::Config { .. }));
    }

    #[test]
    fn test_player_bounds() {
        let tuning = Tuning::default();
        let (lo, hi) = tuning.player_x_bounds();
        assert_eq!(lo, 32.0);
        assert_eq!(hi, PLAY_WIDTH - 32.0);
    }
}
