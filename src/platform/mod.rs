//! Platform abstraction layer
//!
//! Thin seams over the hardware so the game can run against real pins and
//! timers or against test doubles:
//! - Time: monotonic milliseconds
//! - Input: raw button levels and the press latch

pub mod input;
pub mod time;

pub use input::{ButtonLatch, ButtonLevels, Buttons};
pub use time::{Clock, SystemClock, WrappingClock};
