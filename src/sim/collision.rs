//! Circle-circle hit testing
//!
//! This is the hottest loop in the game (every player bullet against every
//! enemy, every tick), so it compares squared distances and never takes a
//! square root.

use glam::Vec2;

use super::state::Body;

/// Overlap test between two circles.
///
/// `fudge` shrinks the combined radius; a positive value makes near misses
/// against the player count as misses.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32, fudge: f32) -> bool {
    let reach = ra + rb - fudge;
    if reach <= 0.0 {
        return false;
    }
    a.distance_squared(b) < reach * reach
}

/// Overlap test between two bodies
#[inline]
pub fn collides(a: &impl Body, b: &impl Body, fudge: f32) -> bool {
    circles_overlap(a.center(), a.radius(), b.center(), b.radius(), fudge)
}
