//! Collision detection and response
//!
//! Checked once per tick in a fixed order: playfield bounds, trees, then
//! flying obstacles. A lethal outcome ends the check for this tick; rewards
//! (gifts, stomped foes) let the sweep continue.

use super::state::{CrashCause, GameEvent, GamePhase, GameState, ObstacleKind, SleighStatus};
use crate::consts::*;
use crate::settings::Ruleset;
use crate::spans_overlap;

/// Whether the sweep goes on to the next obstacle group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// Nothing happened that stops the sweep
    Continue,
    /// The tick's collision handling is over
    Stop,
}

/// Run every collision test for this tick
pub fn check_collisions(state: &mut GameState, now_ms: u64) {
    if check_bounds(state, now_ms) == Outcome::Stop {
        return;
    }
    // Obstacles are frozen and irrelevant once the sleigh is exploding
    if state.sleigh.is_exploding() {
        return;
    }
    if check_trees(state, now_ms) == Outcome::Stop {
        return;
    }
    check_flyers(state, now_ms);
}

/// Sleigh horizontal hitbox span, `[x_min, x_max)`
#[inline]
fn sleigh_span() -> (i32, i32) {
    (SLEIGH_X + 2, SLEIGH_X + SLEIGH_HITBOX)
}

/// Resting height of the sleigh on the ground
#[inline]
pub fn ground_y() -> f32 {
    (PLAYFIELD_HEIGHT - SLEIGH_HITBOX) as f32
}

fn end_run(state: &mut GameState, now_ms: u64) -> Outcome {
    state.events.push(GameEvent::GameOver { score: state.score });
    state.set_phase(GamePhase::GameOver, now_ms);
    Outcome::Stop
}

fn crash(state: &mut GameState, cause: CrashCause, now_ms: u64) {
    log::debug!("Crashed into {:?}", cause);
    state.sleigh.crash(now_ms);
    state.events.push(GameEvent::Crashed(cause));
}

fn check_bounds(state: &mut GameState, now_ms: u64) -> Outcome {
    let floor = ground_y();

    if state.settings.ruleset == Ruleset::Classic {
        if state.sleigh.y < CEILING_Y || state.sleigh.y >= floor {
            return end_run(state, now_ms);
        }
        return Outcome::Continue;
    }

    let sleigh = &mut state.sleigh;

    if sleigh.y < CEILING_Y {
        sleigh.y = CEILING_Y;
        sleigh.velocity = -sleigh.velocity / state.settings.ceiling_bounce_divisor;
        if state.settings.ceiling_is_lethal && !sleigh.is_crashed() {
            crash(state, CrashCause::Ceiling, now_ms);
            return Outcome::Stop;
        }
    }

    let sleigh = &mut state.sleigh;
    if !sleigh.is_crashed() && sleigh.y >= floor {
        sleigh.y = floor;
        sleigh.velocity = -sleigh.velocity;
        crash(state, CrashCause::Ground, now_ms);
        return Outcome::Stop;
    }

    let sleigh = &mut state.sleigh;
    if sleigh.is_crashed() && !sleigh.is_exploding() && sleigh.y >= floor {
        sleigh.y = floor;
        sleigh.velocity = 0.0;
        sleigh.status = SleighStatus::Exploding { since_ms: now_ms };
        state.events.push(GameEvent::Exploded);
        return Outcome::Stop;
    }

    if let SleighStatus::Exploding { since_ms } = state.sleigh.status {
        if now_ms.saturating_sub(since_ms) >= state.settings.explosion_ms {
            return end_run(state, now_ms);
        }
    }

    Outcome::Continue
}

fn check_trees(state: &mut GameState, now_ms: u64) -> Outcome {
    let (hit_min, hit_max) = sleigh_span();
    let tree_top = (PLAYFIELD_HEIGHT - TREE_HEIGHT) as f32;

    let hit = state.trees.iter().any(|t| {
        t.active
            && spans_overlap(t.pos.x(), t.pos.x() + TREE_WIDTH, hit_min, hit_max)
            && state.sleigh.y + SLEIGH_HITBOX as f32 > tree_top
    });
    if !hit {
        return Outcome::Continue;
    }

    if state.settings.ruleset == Ruleset::Classic {
        return end_run(state, now_ms);
    }

    crash(state, CrashCause::Tree, now_ms);
    let sleigh = &mut state.sleigh;
    sleigh.y = tree_top - SLEIGH_HITBOX as f32;
    sleigh.velocity = -sleigh.velocity / state.settings.tree_bounce_divisor;
    Outcome::Stop
}

fn check_flyers(state: &mut GameState, now_ms: u64) {
    let (hit_min, hit_max) = sleigh_span();
    let classic = state.settings.ruleset == Ruleset::Classic;

    for i in 0..FLYER_COUNT {
        let flyer = state.flyers[i];
        if !flyer.is_live()
            || !spans_overlap(flyer.pos.x(), flyer.pos.x() + DUCK_HITBOX, hit_min, hit_max)
        {
            continue;
        }
        let (top, bottom) = (flyer.pos.y() as f32, (flyer.pos.y() + DUCK_HEIGHT) as f32);
        let sleigh_y = state.sleigh.y;
        if !(sleigh_y < bottom && sleigh_y + SLEIGH_HEIGHT as f32 > top) {
            continue;
        }

        match flyer.kind {
            ObstacleKind::Duck => {
                if classic {
                    end_run(state, now_ms);
                    return;
                }
                crash(state, CrashCause::Duck, now_ms);
                // Knock the sleigh downward
                if state.sleigh.velocity < 0.0 {
                    state.sleigh.velocity = -state.sleigh.velocity;
                }
                return;
            }
            ObstacleKind::Foe => {
                if state.sleigh.velocity > 0.0 {
                    let foe = &mut state.flyers[i];
                    foe.falling = true;
                    foe.fall_velocity = state.settings.foe_fall_speed;
                    state.add_score(state.settings.foe_stomp_points);
                    state.sleigh.velocity = state.settings.foe_stomp_bounce;
                    state.events.push(GameEvent::FoeDefeated);
                } else if !state.sleigh.is_crashed() {
                    state.add_score(-state.settings.foe_penalty_points);
                    state.events.push(GameEvent::FoePenalty);
                    if classic {
                        end_run(state, now_ms);
                        return;
                    }
                    crash(state, CrashCause::Foe, now_ms);
                    state.sleigh.velocity = state.settings.foe_penalty_bounce;
                    return;
                }
            }
            ObstacleKind::Gift => {
                state.add_score(state.settings.gift_points);
                let deadline = state.next_spawn_deadline(now_ms);
                let gift = &mut state.flyers[i];
                gift.active = false;
                gift.spawn_at_ms = deadline;
                state.events.push(GameEvent::GiftCollected);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use crate::settings::Settings;

    /// A playing state with every obstacle parked out of the way
    fn clear_state(settings: Settings) -> GameState {
        let mut state = GameState::new(settings, 11, 0);
        state.phase = GamePhase::Playing;
        for tree in state.trees.iter_mut() {
            tree.active = false;
            tree.spawn_at_ms = u64::MAX;
        }
        for flyer in state.flyers.iter_mut() {
            flyer.active = false;
            flyer.spawn_at_ms = u64::MAX;
        }
        state
    }

    fn place_flyer(state: &mut GameState, kind: ObstacleKind, y: i32) {
        let flyer = &mut state.flyers[0];
        flyer.active = true;
        flyer.kind = kind;
        flyer.pos = Position::new(SLEIGH_X, y);
    }

    #[test]
    fn test_gift_collected() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 40.0;
        place_flyer(&mut state, ObstacleKind::Gift, 40);

        check_collisions(&mut state, 5_000);

        assert_eq!(state.score, 10);
        assert!(!state.flyers[0].active);
        assert!((5_800..=7_500).contains(&state.flyers[0].spawn_at_ms));
        assert!(!state.sleigh.is_crashed());
        assert_eq!(state.sleigh.velocity, 0.0);
        assert_eq!(state.events, vec![GameEvent::GiftCollected]);
    }

    #[test]
    fn test_foe_stomped_from_above() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 50.0;
        state.sleigh.velocity = 1.5;
        place_flyer(&mut state, ObstacleKind::Foe, FOE_Y);

        check_collisions(&mut state, 100);

        let foe = state.flyers[0];
        assert!(foe.falling);
        assert_eq!(foe.fall_velocity, 2.0);
        assert_eq!(state.score, 20);
        assert_eq!(state.sleigh.velocity, -3.0);
        assert!(!state.sleigh.is_crashed());
    }

    #[test]
    fn test_foe_penalty_when_rising() {
        let mut state = clear_state(Settings::default());
        state.score = 4;
        state.sleigh.y = 60.0;
        state.sleigh.velocity = -2.0;
        place_flyer(&mut state, ObstacleKind::Foe, FOE_Y);

        check_collisions(&mut state, 100);

        assert_eq!(state.score, 0);
        assert_eq!(state.sleigh.status, SleighStatus::Crashed { since_ms: 100 });
        assert_eq!(state.sleigh.velocity, -6.0);
        assert!(!state.flyers[0].falling);
    }

    #[test]
    fn test_foe_penalty_in_classic_ends_run() {
        let mut state = clear_state(Settings::from_ruleset(Ruleset::Classic));
        state.score = 30;
        state.sleigh.y = 60.0;
        state.sleigh.velocity = 0.0;
        place_flyer(&mut state, ObstacleKind::Foe, FOE_Y);

        check_collisions(&mut state, 100);

        assert_eq!(state.score, 20);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_duck_crash_knocks_down() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 20.0;
        state.sleigh.velocity = -3.0;
        place_flyer(&mut state, ObstacleKind::Duck, 20);

        check_collisions(&mut state, 70);

        assert!(state.sleigh.is_crashed());
        assert_eq!(state.sleigh.velocity, 3.0);
        assert_eq!(state.events, vec![GameEvent::Crashed(CrashCause::Duck)]);
    }

    #[test]
    fn test_duck_in_classic_is_game_over() {
        let mut state = clear_state(Settings::from_ruleset(Ruleset::Classic));
        state.sleigh.y = 20.0;
        place_flyer(&mut state, ObstacleKind::Duck, 20);
        check_collisions(&mut state, 70);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_flyer_outside_hitbox_is_missed() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 20.0;
        place_flyer(&mut state, ObstacleKind::Duck, 20);
        state.flyers[0].pos = Position::new(SLEIGH_X + SLEIGH_HITBOX, 20);
        check_collisions(&mut state, 70);
        assert!(!state.sleigh.is_crashed());

        state.flyers[0].pos = Position::new(SLEIGH_X, 20 + SLEIGH_HEIGHT + DUCK_HEIGHT);
        check_collisions(&mut state, 70);
        assert!(!state.sleigh.is_crashed());
    }

    #[test]
    fn test_tree_hit_bounces_onto_treetop() {
        let mut state = clear_state(Settings::default());
        state.trees[0].active = true;
        state.trees[0].pos = Position::new(SLEIGH_X, PLAYFIELD_HEIGHT - TREE_HEIGHT);
        state.sleigh.y = 90.0;
        state.sleigh.velocity = 4.0;

        check_collisions(&mut state, 10);

        assert!(state.sleigh.is_crashed());
        assert_eq!(
            state.sleigh.y,
            (PLAYFIELD_HEIGHT - TREE_HEIGHT - SLEIGH_HITBOX) as f32
        );
        assert_eq!(state.sleigh.velocity, -2.0);
    }

    #[test]
    fn test_ground_crash_then_explosion_then_game_over() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 130.0;
        state.sleigh.velocity = 5.0;

        check_collisions(&mut state, 1_000);
        assert_eq!(state.sleigh.status, SleighStatus::Crashed { since_ms: 1_000 });
        assert_eq!(state.sleigh.y, ground_y());
        assert_eq!(state.sleigh.velocity, -5.0);

        state.sleigh.y = ground_y() + 1.0;
        check_collisions(&mut state, 1_500);
        assert_eq!(state.sleigh.status, SleighStatus::Exploding { since_ms: 1_500 });
        assert_eq!(state.sleigh.velocity, 0.0);

        check_collisions(&mut state, 2_499);
        assert_eq!(state.phase, GamePhase::Playing);
        check_collisions(&mut state, 2_500);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_ceiling_bounce_is_damped() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = -1.0;
        state.sleigh.velocity = -6.0;
        check_collisions(&mut state, 0);
        assert_eq!(state.sleigh.y, CEILING_Y);
        assert!((state.sleigh.velocity - 2.0).abs() < 1e-6);
        assert!(state.sleigh.is_crashed());
    }

    #[test]
    fn test_soft_ceiling_does_not_crash() {
        let settings = Settings {
            ceiling_is_lethal: false,
            ..Settings::default()
        };
        let mut state = clear_state(settings);
        state.sleigh.y = 0.0;
        state.sleigh.velocity = -3.0;
        check_collisions(&mut state, 0);
        assert!(!state.sleigh.is_crashed());
        assert!((state.sleigh.velocity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_classic_bounds_end_run() {
        let mut state = clear_state(Settings::from_ruleset(Ruleset::Classic));
        state.sleigh.y = ground_y();
        check_collisions(&mut state, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn test_classic_ceiling_ends_run() {
        let mut state = clear_state(Settings::from_ruleset(Ruleset::Classic));
        state.sleigh.y = CEILING_Y - 1.0;
        state.sleigh.velocity = -4.0;
        check_collisions(&mut state, 40);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.phase_changed_ms, 40);
        // No bounce and no crash state in the classic rules
        assert_eq!(state.sleigh.velocity, -4.0);
        assert!(!state.sleigh.is_crashed());
    }

    #[test]
    fn test_tree_in_classic_is_game_over() {
        let mut state = clear_state(Settings::from_ruleset(Ruleset::Classic));
        state.trees[0].active = true;
        state.trees[0].pos = Position::new(SLEIGH_X, PLAYFIELD_HEIGHT - TREE_HEIGHT);
        state.sleigh.y = 90.0;
        state.sleigh.velocity = 4.0;

        check_collisions(&mut state, 10);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::GameOver { score: 0 }]);
        assert!(!state.sleigh.is_crashed());
        assert_eq!(state.sleigh.y, 90.0);
    }

    #[test]
    fn test_lethal_hit_stops_sweep() {
        let mut state = clear_state(Settings::default());
        state.sleigh.y = 20.0;
        state.sleigh.velocity = 1.0;
        place_flyer(&mut state, ObstacleKind::Duck, 20);
        let gift = &mut state.flyers[1];
        gift.active = true;
        gift.kind = ObstacleKind::Gift;
        gift.pos = Position::new(SLEIGH_X, 20);

        check_collisions(&mut state, 0);
        assert_eq!(state.score, 0);
        assert!(state.flyers[1].active);
    }
}
