//! Game driver: one call per fixed tick
//!
//! Samples the buttons through the press latch, steps the simulation, folds
//! finished runs into the high scores, animates snow on the game-over
//! screen, then renders.

use embedded_graphics::{pixelcolor::Rgb565, prelude::DrawTarget};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::HighScores;
use crate::assets::Sprites;
use crate::persistence::KeyValueStore;
use crate::platform::{ButtonLatch, ButtonLevels, Buttons, Clock};
use crate::renderer::{Renderer, Scene};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GamePhase, GameState, Snow};

/// A running game bound to its sprites and score store
pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    pub high_scores: HighScores,
    pub snow: Snow,
    latch: ButtonLatch,
    renderer: Renderer,
    sprites: Sprites,
    store: S,
    /// Snow only; kept apart so cosmetics never perturb the simulation stream
    cosmetic_rng: Pcg32,
    last_phase: GamePhase,
}

impl<S: KeyValueStore> Game<S> {
    /// Load high scores and set up the world on the menu
    pub fn init(settings: Settings, sprites: Sprites, store: S, seed: u64, now_ms: u64) -> Self {
        log::info!(
            "Flappy Sleigh starting: seed {}, {} rules",
            seed,
            settings.ruleset.as_str()
        );
        let high_scores = HighScores::load(&store);
        let state = GameState::new(settings, seed, now_ms);
        Self {
            last_phase: state.phase,
            state,
            high_scores,
            snow: Snow::default(),
            latch: ButtonLatch::default(),
            renderer: Renderer::new(),
            sprites,
            store,
            cosmetic_rng: Pcg32::seed_from_u64(seed.rotate_left(32)),
        }
    }

    /// Run one tick at `now_ms` with the current button levels
    pub fn tick<D>(&mut self, levels: ButtonLevels, now_ms: u64, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let input = self.latch.sample(levels);
        sim::tick(&mut self.state, &input, now_ms);
        self.log_events();

        if self.state.phase == GamePhase::GameOver {
            if self.last_phase != GamePhase::GameOver {
                let leftovers = self.renderer.footprints();
                self.snow.start(&mut self.cosmetic_rng, &leftovers);
            }
            if let Some(outcome) = self
                .high_scores
                .commit_game_over(&mut self.state, &mut self.store)
            {
                let note = match (outcome.new_record, outcome.new_session_best) {
                    (true, _) => " (new record)",
                    (false, true) => " (session best)",
                    _ => "",
                };
                log::info!(
                    "Run over in {} mode: score {}, best {}, record {}{}",
                    self.state.mode.as_str(),
                    self.state.score,
                    self.high_scores.session_best(self.state.mode),
                    self.high_scores.record(self.state.mode),
                    note
                );
            }
            self.snow.update(&mut self.cosmetic_rng);
        }
        self.last_phase = self.state.phase;

        let scene = Scene {
            state: &self.state,
            high_scores: &self.high_scores,
            snow: &self.snow,
            sprites: &self.sprites,
            now_ms,
        };
        self.renderer.render(display, &scene)
    }

    /// Run one tick on the platform's clock and buttons
    pub fn run_tick<C, B, D>(
        &mut self,
        clock: &mut C,
        buttons: &mut B,
        display: &mut D,
    ) -> Result<(), D::Error>
    where
        C: Clock,
        B: Buttons,
        D: DrawTarget<Color = Rgb565>,
    {
        let now_ms = clock.now_ms();
        let levels = buttons.sample();
        self.tick(levels, now_ms, display)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    fn log_events(&self) {
        for event in &self.state.events {
            match event {
                GameEvent::Flap | GameEvent::ObstaclePassed => log::trace!("{:?}", event),
                GameEvent::Crashed(cause) => log::info!("Crashed into {:?}", cause),
                GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
                _ => log::debug!("{:?}", event),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::persistence::MemoryStore;
    use crate::platform::WrappingClock;
    use crate::renderer::Framebuffer;
    use std::cell::Cell;

    const PRESS: ButtonLevels = ButtonLevels {
        primary: true,
        secondary: false,
    };

    fn new_game(store: MemoryStore) -> Game<MemoryStore> {
        Game::init(Settings::default(), Sprites::procedural(), store, 11, 0)
    }

    #[test]
    fn test_held_button_starts_once() {
        let mut game = new_game(MemoryStore::new());
        let mut fb = Framebuffer::new();
        let Ok(()) = game.tick(PRESS, 0, &mut fb);
        assert_eq!(game.state.phase, GamePhase::Playing);
        let Ok(()) = game.tick(PRESS, 30, &mut fb);
        // Still held: no flap
        assert!(!game.state.events.contains(&GameEvent::Flap));
    }

    #[test]
    fn test_idle_run_commits_once_and_snows() {
        let mut game = new_game(MemoryStore::new().with_value("highscore0", 500));
        let mut fb = Framebuffer::new();
        let mut now = 0;
        let Ok(()) = game.tick(PRESS, now, &mut fb);
        while game.state.phase != GamePhase::GameOver {
            now += TICK_MS;
            let Ok(()) = game.tick(ButtonLevels::default(), now, &mut fb);
            assert!(now < 60_000);
        }
        assert!(game.state.high_score_committed);
        assert_eq!(game.snow.flakes.len(), crate::consts::MAX_SNOWFLAKES);

        for _ in 0..50 {
            now += TICK_MS;
            let Ok(()) = game.tick(ButtonLevels::default(), now, &mut fb);
        }
        // Below the stored record: nothing written
        assert_eq!(game.store().writes, 0);
        assert_eq!(game.high_scores.record(game.state.mode), 500);
    }

    #[test]
    fn test_run_tick_across_counter_wrap() {
        let counter = Cell::new(u32::MAX - 200);
        let mut clock = WrappingClock::new(|| counter.get());
        // Active low: a low pin is a held button
        let primary_pin = Cell::new(false);
        let mut buttons = || ButtonLevels::from_active_low(primary_pin.get(), true);
        let mut game = new_game(MemoryStore::new());
        let mut fb = Framebuffer::new();

        let Ok(()) = game.run_tick(&mut clock, &mut buttons, &mut fb);
        assert_eq!(game.state.phase, GamePhase::Playing);

        primary_pin.set(true);
        for _ in 0..2_000 {
            if game.state.phase == GamePhase::GameOver {
                break;
            }
            counter.set(counter.get().wrapping_add(TICK_MS as u32));
            let Ok(()) = game.run_tick(&mut clock, &mut buttons, &mut fb);
        }
        // The explosion timer kept running through the wrap
        assert_eq!(game.state.phase, GamePhase::GameOver);
        assert!(game.state.phase_changed_ms > u32::MAX as u64);
    }
}
