//! Points for obstacles the sleigh has flown past

use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Award a point for each live obstacle whose trailing edge has crossed
/// behind the sleigh. Each pool slot scores at most once per spawn; gifts
/// are marked but earn nothing, and nothing scores while crashed.
pub fn score_passed(state: &mut GameState) {
    if state.sleigh.is_crashed() {
        return;
    }
    let points = state.settings.pass_points;
    let mut earned = 0;

    for tree in state.trees.iter_mut() {
        if tree.active && !tree.scored && tree.pos.x() + TREE_WIDTH < SLEIGH_X {
            tree.scored = true;
            earned += points;
            state.events.push(GameEvent::ObstaclePassed);
        }
    }

    for flyer in state.flyers.iter_mut() {
        if flyer.is_live() && !flyer.scored && flyer.pos.x() + DUCK_WIDTH < SLEIGH_X {
            flyer.scored = true;
            if flyer.kind.scores_on_pass() {
                earned += points;
                state.events.push(GameEvent::ObstaclePassed);
            }
        }
    }

    state.add_score(earned);
}
