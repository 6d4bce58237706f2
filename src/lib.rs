//! Flappy Sleigh - a one-button arcade game for a 240x135 color display
//!
//! Core modules:
//! - `sim`: Game-state update (physics, obstacle pools, collisions, phases)
//! - `renderer`: Dirty-rectangle drawing onto any RGB565 draw target
//! - `assets`: Sprite frames from raw bitmap files, with procedural fallbacks
//! - `platform`: Clock and button seams
//! - `persistence`: Key-value storage for all-time high scores
//! - `settings`: Data-driven game balance

pub mod app;
pub mod assets;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::Game;
pub use highscores::HighScores;
pub use settings::{Ruleset, Settings};

use glam::IVec2;

/// Playfield geometry and sprite dimensions
pub mod consts {
    /// Logical screen size (landscape)
    pub const SCREEN_WIDTH: i32 = 240;
    pub const SCREEN_HEIGHT: i32 = 135;
    /// Ground strip at the bottom of the screen
    pub const GROUND_HEIGHT: i32 = 10;
    pub const PLAYFIELD_HEIGHT: i32 = SCREEN_HEIGHT - GROUND_HEIGHT;

    /// Fixed tick cadence
    pub const TICK_MS: u64 = 30;

    /// Sleigh sprite and hitbox; the sleigh never moves horizontally
    pub const SLEIGH_WIDTH: i32 = 20;
    pub const SLEIGH_HEIGHT: i32 = 14;
    pub const SLEIGH_HITBOX: i32 = 8;
    pub const SLEIGH_X: i32 = 40;
    pub const SLEIGH_START_Y: f32 = 30.0;
    /// Highest the sleigh may fly before hitting the ceiling
    pub const CEILING_Y: f32 = 2.0;

    /// Trees stand on the ground line
    pub const TREE_WIDTH: i32 = 20;
    pub const TREE_HEIGHT: i32 = SCREEN_HEIGHT / 4; // 33 pixels
    pub const TREE_COUNT: usize = 5;

    /// Ducks and foes share a sprite size; gifts are narrower
    pub const DUCK_WIDTH: i32 = 20;
    pub const DUCK_HEIGHT: i32 = 14;
    pub const DUCK_HITBOX: i32 = 10;
    pub const FLYER_COUNT: usize = 5;
    pub const GIFT_WIDTH: i32 = 13;
    pub const GIFT_HEIGHT: i32 = 14;

    /// Spacing of the pre-seeded obstacles at game start
    pub const OBSTACLE_SPAWN_DISTANCE: i32 = 80;
    pub const OBSTACLE_SPAWN_OFFSET: i32 = 40;
    /// Pool slots active at game start
    pub const INITIAL_ACTIVE: usize = 3;

    /// Flying obstacle height band on respawn, `[min, max)`
    pub const FLYER_MIN_Y: i32 = 5;
    pub const FLYER_MAX_Y: i32 = 40;
    /// Foes always appear at mid-playfield
    pub const FOE_Y: i32 = PLAYFIELD_HEIGHT / 2 - DUCK_HEIGHT / 2;

    /// Cosmetic snow on the game-over screen
    pub const MAX_SNOWFLAKES: usize = 50;
}

/// Position of an entity this tick and last tick (for erase-before-redraw)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub current: IVec2,
    pub previous: IVec2,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        let p = IVec2::new(x, y);
        Self {
            current: p,
            previous: p,
        }
    }

    /// Place the entity without leaving a trail to erase
    pub fn teleport(&mut self, x: i32, y: i32) {
        *self = Self::new(x, y);
    }

    /// Remember the current position, then move by the given delta
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.previous = self.current;
        self.current += IVec2::new(dx, dy);
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.current.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.current.y
    }
}

/// Axis-aligned overlap on one axis: `[a_min, a_max)` against `[b_min, b_max)`
#[inline]
pub fn spans_overlap(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> bool {
    a_min < b_max && a_max > b_min
}
