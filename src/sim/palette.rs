//! Burst colour tables
//!
//! Particle colours are the only place the simulation cares which enemy kind
//! or player skin it is dealing with, so they are kept as plain lookups.

use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, Skin};

/// Packed `0xRRGGBB`
pub type Color = u32;

/// What a particle burst is coloured after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstSource {
    Enemy(EnemyKind),
    Player(Skin),
    Shield,
}

const DRONE: &[Color] = &[0x1976d2, 0xffffff, 0xffd600];
const WEAVER: &[Color] = &[0xfbc02d, 0xfffde7, 0xfff176];
const GUNSHIP: &[Color] = &[0x8e24aa, 0xfffde7, 0xe1bee7];
const SUNNY: &[Color] = &[0xffffff, 0x0288d1, 0xffe082];
const STRETCHY: &[Color] = &[0xffb300, 0xfffde7, 0xffeb3b];
const SHIELD: &[Color] = &[0x00e5ff];

impl BurstSource {
    /// Colours a burst picks from (never empty)
    pub fn colors(self) -> &'static [Color] {
        match self {
            BurstSource::Enemy(EnemyKind::Drone) => DRONE,
            BurstSource::Enemy(EnemyKind::Weaver) => WEAVER,
            BurstSource::Enemy(EnemyKind::Gunship) => GUNSHIP,
            BurstSource::Player(Skin::Sunny) => SUNNY,
            BurstSource::Player(Skin::Stretchy) => STRETCHY,
            BurstSource::Shield => SHIELD,
        }
    }
}
