//! Game simulation module
//!
//! All gameplay logic lives here and never touches a display:
//! - Millisecond timestamps are passed in, never read from a clock
//! - Seeded RNG only
//! - Fixed pool slots, iterated in index order

pub mod autopilot;
pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod scoring;
pub mod snow;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::check_collisions;
pub use snow::Snow;
pub use state::{
    CrashCause, FlyingObstacle, GameEvent, GameMode, GamePhase, GameState, ObstacleKind, Sleigh,
    SleighStatus, Tree,
};
pub use tick::{TickInput, tick};
