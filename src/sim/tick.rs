//! Fixed-cadence simulation tick
//!
//! Input first, then (only while playing) physics, obstacle pools,
//! animation, collisions and pass scoring, in that order.

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, obstacles, physics, scoring};
use crate::settings::Ruleset;
use crate::sim::state::SleighStatus;

/// Logical button presses for a single tick (edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Start, flap, restart
    pub primary: bool,
    /// Cycles the mode on the menu; otherwise acts like primary
    pub secondary: bool,
}

impl TickInput {
    pub fn primary() -> Self {
        Self {
            primary: true,
            secondary: false,
        }
    }

    pub fn secondary() -> Self {
        Self {
            primary: false,
            secondary: true,
        }
    }

    /// Any press at all
    pub fn any(&self) -> bool {
        self.primary || self.secondary
    }
}

/// Advance the game state by one tick at time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    state.events.clear();

    handle_input(state, input, now_ms);

    if state.phase != GamePhase::Playing {
        return;
    }

    physics::integrate(&mut state.sleigh, &state.settings);
    obstacles::advance(state, now_ms);
    obstacles::animate(state, now_ms);
    collision::check_collisions(state, now_ms);

    if state.phase == GamePhase::Playing {
        scoring::score_passed(state);
    }
}

fn handle_input(state: &mut GameState, input: &TickInput, now_ms: u64) {
    match state.phase {
        GamePhase::Menu => {
            if input.secondary && state.settings.ruleset == Ruleset::Festive {
                state.mode = state.mode.next();
                log::info!("Mode: {}", state.mode.as_str());
                state.events.push(GameEvent::ModeChanged(state.mode));
            }
            if input.primary {
                state.set_phase(GamePhase::Playing, now_ms);
                state.events.push(GameEvent::RunStarted);
            }
        }

        GamePhase::Playing => {
            if !input.any() {
                return;
            }
            if physics::flap(&mut state.sleigh, &state.settings) {
                state.events.push(GameEvent::Flap);
            } else if second_chance_ready(state, now_ms) {
                state.sleigh.status = SleighStatus::Flying;
                state.sleigh.velocity = state.settings.flap_impulse / 2.0;
                state.events.push(GameEvent::SecondChance);
            }
        }

        GamePhase::GameOver => {
            if input.any() {
                state.reset(now_ms);
                log::info!("Phase GameOver -> Menu");
                state.events.push(GameEvent::Reset);
            }
        }
    }
}

/// Cheat mode lets a crashed (not yet exploding) sleigh recover with a flap
/// once the crash is older than the second-chance window
fn second_chance_ready(state: &GameState, now_ms: u64) -> bool {
    if state.mode != super::GameMode::Cheat || state.settings.ruleset != Ruleset::Festive {
        return false;
    }
    match state.sleigh.status {
        SleighStatus::Crashed { since_ms } => {
            now_ms > since_ms.saturating_add(state.settings.second_chance_ms)
        }
        _ => false,
    }
}
