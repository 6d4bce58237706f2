//! Sleigh vertical physics
//!
//! Explicit Euler with velocity updated before position, in pixels per tick.

use super::state::Sleigh;
use crate::settings::Settings;

/// Advance the sleigh by one tick. Frozen while exploding; gravity is
/// scaled up while crashed so the sleigh drops faster.
pub fn integrate(sleigh: &mut Sleigh, settings: &Settings) {
    if sleigh.is_exploding() {
        return;
    }

    let gravity = if sleigh.is_crashed() {
        settings.gravity * settings.crashed_gravity_scale
    } else {
        settings.gravity
    };

    sleigh.velocity += gravity;
    sleigh.previous_y = sleigh.y;
    sleigh.y += sleigh.velocity;
}

/// Flap upward. Ignored once crashed.
pub fn flap(sleigh: &mut Sleigh, settings: &Settings) -> bool {
    if sleigh.is_crashed() {
        return false;
    }
    sleigh.velocity = settings.flap_impulse;
    true
}
