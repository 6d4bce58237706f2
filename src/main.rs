//! Headless runner: plays the game with the autopilot on an in-memory
//! display, in simulated time. The autopilot drives active-low button pins
//! and time comes from a simulated 32-bit millisecond counter.
//!
//! Usage: `flappy-sleigh [ticks]`
//!
//! Environment:
//! - `FLAPPY_SLEIGH_SETTINGS`: JSON settings file
//! - `FLAPPY_SLEIGH_RULES`: `classic` or `festive`, overriding the settings file
//! - `FLAPPY_SLEIGH_ASSETS`: directory with raw sprite frames
//! - `FLAPPY_SLEIGH_STORE`: high score file (default `flappysleigh.json`)
//! - `FLAPPY_SLEIGH_SEED`: run seed (default: time based)

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on wasm; there is no display to drive
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::Cell;
    use std::env;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use flappy_sleigh::assets::{DirAssetSource, Sprites};
    use flappy_sleigh::consts::TICK_MS;
    use flappy_sleigh::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use flappy_sleigh::platform::{ButtonLevels, Clock, SystemClock, WrappingClock};
    use flappy_sleigh::renderer::Framebuffer;
    use flappy_sleigh::sim::{Autopilot, GameEvent};
    use flappy_sleigh::{Game, Ruleset, Settings};

    /// About three minutes of play
    const DEFAULT_TICKS: u64 = 6_000;
    const DEFAULT_STORE: &str = "flappysleigh.json";

    pub fn run() -> anyhow::Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let ticks = match env::args().nth(1) {
            Some(arg) => arg
                .parse::<u64>()
                .with_context(|| format!("invalid tick count {:?}", arg))?,
            None => DEFAULT_TICKS,
        };

        let mut settings = env::var_os("FLAPPY_SLEIGH_SETTINGS")
            .map(|path| Settings::load(Path::new(&path)))
            .unwrap_or_default();
        if let Ok(name) = env::var("FLAPPY_SLEIGH_RULES") {
            settings.ruleset = Ruleset::from_str(&name)
                .with_context(|| format!("unknown rule set {:?}", name))?;
        }

        let sprites = match env::var_os("FLAPPY_SLEIGH_ASSETS") {
            Some(dir) => Sprites::load(&DirAssetSource::new(dir)),
            None => Sprites::procedural(),
        };

        let store_path = env::var_os("FLAPPY_SLEIGH_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&store_path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("High scores will not persist: {:#}", e);
                Box::new(MemoryStore::new())
            }
        };

        let seed = match env::var("FLAPPY_SLEIGH_SEED") {
            Ok(s) => s
                .parse::<u64>()
                .with_context(|| format!("invalid seed {:?}", s))?,
            Err(_) => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0),
        };

        let counter = Cell::new(0u32);
        let mut clock = WrappingClock::new(|| counter.get());
        // Pin levels as the board would read them: high when released
        let pins = Cell::new((true, true));
        let mut buttons = || {
            let (primary, secondary) = pins.get();
            ButtonLevels::from_active_low(primary, secondary)
        };

        let mut wall = SystemClock::new();
        let mut game = Game::init(settings, sprites, store, seed, clock.now_ms());
        let mut display = Framebuffer::new();
        let mut pilot = Autopilot::new();
        let mut scores = Vec::new();

        for i in 0..ticks {
            let levels = pilot.levels(&game.state, i * TICK_MS);
            pins.set((!levels.primary, !levels.secondary));
            let Ok(()) = game.run_tick(&mut clock, &mut buttons, &mut display);
            counter.set(counter.get().wrapping_add(TICK_MS as u32));
            for event in &game.state.events {
                if let GameEvent::GameOver { score } = event {
                    scores.push(*score);
                }
            }
        }

        let mode = game.state.mode;
        log::info!(
            "{} ticks ({} s simulated in {} ms), {} runs, scores {:?}",
            ticks,
            ticks * TICK_MS / 1000,
            wall.now_ms(),
            scores.len(),
            scores
        );
        log::info!(
            "{} mode: session best {}, all-time record {}; {} pixels drawn",
            mode.as_str(),
            game.high_scores.session_best(mode),
            game.high_scores.record(mode),
            display.pixels_written
        );
        Ok(())
    }
}
