//! Game variant flags and effect quality
//!
//! The classic and ability-bearing games share one core; these flags pick
//! which optional behaviours the simulation runs with.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Particle budget tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality '{other}' (expected low, medium or high)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle quality preset
    pub quality: QualityPreset,

    // === Variant ===
    /// Player spawns with Burst Shot and Shield
    pub abilities: bool,
    /// Enemies weave side to side as they descend
    pub weaving_enemies: bool,
    /// Only some enemy kinds return fire
    pub selective_fire: bool,

    // === Effects ===
    /// Particle bursts on hits and kills
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            abilities: true,
            weaving_enemies: true,
            selective_fire: true,
            particles: true,
        }
    }
}

impl Settings {
    /// The plain variant: no abilities, straight descent, every enemy fires
    pub fn classic() -> Self {
        Self {
            abilities: false,
            weaving_enemies: false,
            selective_fire: false,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.max_particles()
        } else {
            0
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let config_err = |message: String| GameError::Config {
            path: path.display().to_string(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let settings: Self = serde_json::from_str(&json).map_err(|e| config_err(e.to_string()))?;
        log::info!(
            "Loaded settings from {} (quality {}, abilities {})",
            path.display(),
            settings.quality,
            settings.abilities
        );
        Ok(settings)
    }
}
