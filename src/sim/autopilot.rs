//! Demo autopilot that plays the game by pressing the primary button
//!
//! Picks a target height from the nearest obstacle ahead and flaps whenever
//! the sleigh sinks below it. Used for the attract/headless run, never by
//! the simulation itself.

use super::state::{GamePhase, GameState, ObstacleKind};
use crate::consts::*;
use crate::platform::ButtonLevels;

/// How far ahead of the sleigh obstacles are considered
const LOOKAHEAD: i32 = 90;
/// Cruise height with nothing in sight
const CRUISE_Y: i32 = 60;
/// Wait on the game-over screen before restarting
const RESTART_DELAY_MS: u64 = 1_500;

/// Button-pressing bot. Releases between presses so the edge latch sees
/// every flap.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button levels to feed the game this tick
    pub fn levels(&mut self, state: &GameState, now_ms: u64) -> ButtonLevels {
        if self.held {
            self.held = false;
            return ButtonLevels::default();
        }

        let press = match state.phase {
            GamePhase::Menu => true,
            GamePhase::GameOver => {
                now_ms.saturating_sub(state.phase_changed_ms) >= RESTART_DELAY_MS
            }
            GamePhase::Playing => {
                let sleigh = &state.sleigh;
                !sleigh.is_crashed()
                    && sleigh.velocity >= 0.0
                    && sleigh.top() > target_height(state)
            }
        };

        self.held = press;
        ButtonLevels {
            primary: press,
            secondary: false,
        }
    }
}

/// Height the sleigh should hold given the nearest obstacle ahead
pub fn target_height(state: &GameState) -> i32 {
    let tree_top = PLAYFIELD_HEIGHT - TREE_HEIGHT;
    let ahead = |x: i32, width: i32| x + width >= SLEIGH_X && x <= SLEIGH_X + LOOKAHEAD;

    let near_tree = state
        .trees
        .iter()
        .any(|t| t.active && ahead(t.pos.x(), TREE_WIDTH));

    let nearest_flyer = state
        .flyers
        .iter()
        .filter(|f| f.is_live() && ahead(f.pos.x(), f.kind.width()))
        .min_by_key(|f| f.pos.x());

    let mut target = match nearest_flyer {
        Some(f) => match f.kind {
            ObstacleKind::Gift => f.pos.y(),
            // Come down on top of a foe
            ObstacleKind::Foe => f.pos.y() - SLEIGH_HEIGHT,
            ObstacleKind::Duck => {
                let below = f.pos.y() + DUCK_HEIGHT + 6;
                if below + SLEIGH_HITBOX < tree_top || !near_tree {
                    below
                } else {
                    f.pos.y() - SLEIGH_HEIGHT - 6
                }
            }
        },
        None => CRUISE_Y,
    };

    if near_tree {
        target = target.min(tree_top - SLEIGH_HITBOX - 10);
    }
    target.max(CEILING_Y as i32 + 6)
}
