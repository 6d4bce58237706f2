//! Obstacle pools: movement, recycling and flap animation
//!
//! Both pools are fixed arrays of slots. A slot that leaves the screen is
//! parked with a randomized respawn deadline; when the deadline passes it
//! tries to re-enter at the right edge, and defers again if that spot is
//! too close to another live slot of the same pool.

use rand::Rng;

use super::state::{FlyingObstacle, GameState, ObstacleKind, Tree, roll_kind};
use crate::consts::*;

/// Move live obstacles left, retire the ones that left the screen and try
/// to respawn parked slots whose deadline has passed. Nothing moves while
/// the sleigh is exploding.
pub fn advance(state: &mut GameState, now_ms: u64) {
    if state.sleigh.is_exploding() {
        return;
    }
    let speed = state.obstacle_speed();
    advance_trees(state, speed, now_ms);
    advance_flyers(state, speed, now_ms);
}

fn advance_trees(state: &mut GameState, speed: i32, now_ms: u64) {
    let margin = state.settings.tree_margin;

    for i in 0..TREE_COUNT {
        if state.trees[i].active {
            state.trees[i].pos.move_by(-speed, 0);

            if state.trees[i].pos.x() < -TREE_WIDTH {
                let deadline = state.next_spawn_deadline(now_ms);
                let tree = &mut state.trees[i];
                tree.active = false;
                tree.scored = false;
                tree.spawn_at_ms = deadline;
            }
        } else if now_ms >= state.trees[i].spawn_at_ms {
            state.trees[i]
                .pos
                .teleport(SCREEN_WIDTH, PLAYFIELD_HEIGHT - TREE_HEIGHT);

            if tree_overlaps(&state.trees, i, SCREEN_WIDTH, margin) {
                let deadline = state.next_spawn_deadline(now_ms);
                state.trees[i].spawn_at_ms = deadline;
                log::debug!("Tree {} respawn deferred", i);
            } else {
                state.trees[i].active = true;
                state.trees[i].scored = false;
            }
        }
    }
}

fn advance_flyers(state: &mut GameState, speed: i32, now_ms: u64) {
    let (margin_x, margin_y) = (state.settings.flyer_margin_x, state.settings.flyer_margin_y);

    for i in 0..FLYER_COUNT {
        let flyer = state.flyers[i];
        if flyer.falling {
            continue;
        }

        if flyer.active {
            state.flyers[i].pos.move_by(-speed, 0);

            if state.flyers[i].pos.x() < -DUCK_WIDTH {
                let deadline = state.next_spawn_deadline(now_ms);
                let flyer = &mut state.flyers[i];
                flyer.active = false;
                flyer.scored = false;
                flyer.spawn_at_ms = deadline;
            }
        } else if now_ms >= flyer.spawn_at_ms {
            let y = state.rng.random_range(FLYER_MIN_Y..FLYER_MAX_Y);
            let kind = roll_kind(&mut state.rng, &state.settings);
            let y = if kind == ObstacleKind::Foe { FOE_Y } else { y };

            let slot = &mut state.flyers[i];
            slot.pos.teleport(SCREEN_WIDTH, y);
            slot.kind = kind;
            slot.falling = false;
            slot.fall_velocity = 0.0;

            if flyer_overlaps(&state.flyers, i, SCREEN_WIDTH, y, margin_x, margin_y) {
                let deadline = state.next_spawn_deadline(now_ms);
                state.flyers[i].spawn_at_ms = deadline;
                log::debug!("Flyer {} respawn deferred", i);
            } else {
                state.flyers[i].active = true;
                state.flyers[i].scored = false;
            }
        }
    }
}

/// Whether a tree placed at `x` would sit within `margin` of another live tree
pub fn tree_overlaps(trees: &[Tree], index: usize, x: i32, margin: i32) -> bool {
    trees
        .iter()
        .enumerate()
        .filter(|&(i, t)| i != index && t.active)
        .any(|(_, t)| (x - t.pos.x()).abs() < margin)
}

/// Whether a flyer placed at `(x, y)` would crowd another live flyer.
/// Falling foes are ignored.
pub fn flyer_overlaps(
    flyers: &[FlyingObstacle],
    index: usize,
    x: i32,
    y: i32,
    margin_x: i32,
    margin_y: i32,
) -> bool {
    flyers
        .iter()
        .enumerate()
        .filter(|&(i, f)| i != index && f.is_live())
        .any(|(_, f)| (x - f.pos.x()).abs() < margin_x && (y - f.pos.y()).abs() < margin_y)
}

/// Per-slot flap animation and the drop of defeated foes
pub fn animate(state: &mut GameState, now_ms: u64) {
    let interval = state.settings.flap_interval_ms;
    let gravity = state.settings.gravity;

    for i in 0..FLYER_COUNT {
        let flyer = &mut state.flyers[i];

        if flyer.falling {
            flyer.fall_velocity += gravity;
            flyer.pos.move_by(0, flyer.fall_velocity as i32);

            if flyer.pos.y() >= PLAYFIELD_HEIGHT {
                flyer.falling = false;
                flyer.active = false;
                let deadline = state.next_spawn_deadline(now_ms);
                state.flyers[i].spawn_at_ms = deadline;
            }
        } else if flyer.active
            && flyer.kind.is_animated()
            && now_ms.saturating_sub(flyer.last_flap_ms) >= interval
        {
            flyer.flap_frame = !flyer.flap_frame;
            flyer.last_flap_ms = now_ms;
        }
    }
}
