//! Game balance settings
//!
//! Every tuning constant lives here so the bounce factors and mode speeds can
//! be adjusted without touching the simulation. `Settings::default()` is the
//! shipped balance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Which rule set the simulation follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ruleset {
    /// Ducks only; touching anything ends the run on the spot
    Classic,
    /// Ducks, foes and gifts; collisions crash the sleigh, which then falls
    /// and explodes before the run ends
    #[default]
    Festive,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Classic => "Classic",
            Ruleset::Festive => "Festive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "simple" => Some(Ruleset::Classic),
            "festive" | "extended" => Some(Ruleset::Festive),
            _ => None,
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ruleset: Ruleset,

    // === Sleigh physics (pixels per tick) ===
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub flap_impulse: f32,
    /// Gravity multiplier while crashed
    pub crashed_gravity_scale: f32,

    // === Bounces ===
    /// Reflected velocity is divided by this on a ceiling hit
    pub ceiling_bounce_divisor: f32,
    /// Whether touching the ceiling crashes the sleigh (Festive only)
    pub ceiling_is_lethal: bool,
    /// Reflected velocity is divided by this on a tree hit
    pub tree_bounce_divisor: f32,
    /// Sleigh velocity after stomping a foe
    pub foe_stomp_bounce: f32,
    /// Sleigh velocity after flying up into a foe
    pub foe_penalty_bounce: f32,
    /// Initial fall speed of a defeated foe
    pub foe_fall_speed: f32,

    // === Scoring ===
    pub pass_points: i32,
    pub gift_points: i32,
    pub foe_stomp_points: i32,
    pub foe_penalty_points: i32,

    // === Obstacle speed per mode (pixels per tick) ===
    pub normal_speed: i32,
    pub speed_mode_speed: i32,
    /// Cheat mode speed is `speed_mode_speed + score / cheat_speed_divisor`
    pub cheat_speed_divisor: i32,

    // === Timings (ms) ===
    pub spawn_delay_min_ms: u64,
    pub spawn_delay_max_ms: u64,
    pub flap_interval_ms: u64,
    pub explosion_ms: u64,
    /// Cheat mode: a flap this long after crashing rescues the sleigh
    pub second_chance_ms: u64,

    // === Spawn spacing (pixels) ===
    pub tree_margin: i32,
    pub flyer_margin_x: i32,
    pub flyer_margin_y: i32,

    // === Flying obstacle mix (percent, remainder are foes) ===
    pub duck_percent: u32,
    pub gift_percent: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Festive,

            gravity: 0.3,
            flap_impulse: -4.0,
            crashed_gravity_scale: 2.0,

            ceiling_bounce_divisor: 3.0,
            ceiling_is_lethal: true,
            tree_bounce_divisor: 2.0,
            foe_stomp_bounce: -3.0,
            foe_penalty_bounce: -6.0,
            foe_fall_speed: 2.0,

            pass_points: 1,
            gift_points: 10,
            foe_stomp_points: 20,
            foe_penalty_points: 10,

            normal_speed: 2,
            speed_mode_speed: 8,
            cheat_speed_divisor: 20,

            spawn_delay_min_ms: 800,
            spawn_delay_max_ms: 2500,
            flap_interval_ms: 500,
            explosion_ms: 1000,
            second_chance_ms: 300,

            tree_margin: 20,
            flyer_margin_x: 30,
            flyer_margin_y: 20,

            duck_percent: 80,
            gift_percent: 16,
        }
    }
}

impl Settings {
    /// Create settings for a rule set (applies its defaults)
    pub fn from_ruleset(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            ..Self::default()
        }
    }

    /// Leftward obstacle speed for the current mode and score
    pub fn obstacle_speed(&self, mode: GameMode, score: i32) -> i32 {
        match mode {
            GameMode::Normal => self.normal_speed,
            GameMode::Speed => self.speed_mode_speed,
            GameMode::Cheat => {
                self.speed_mode_speed + score.max(0) / self.cheat_speed_divisor.max(1)
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obstacle_speed_per_mode() {
        let s = Settings::default();
        assert_eq!(s.obstacle_speed(GameMode::Normal, 100), 2);
        assert_eq!(s.obstacle_speed(GameMode::Speed, 100), 8);
        assert_eq!(s.obstacle_speed(GameMode::Cheat, 0), 8);
        assert_eq!(s.obstacle_speed(GameMode::Cheat, 19), 8);
        assert_eq!(s.obstacle_speed(GameMode::Cheat, 40), 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s: Settings = serde_json::from_str(r#"{"ruleset":"Classic","gravity":0.5}"#)
            .expect("valid settings");
        assert_eq!(s.ruleset, Ruleset::Classic);
        assert!((s.gravity - 0.5).abs() < f32::EPSILON);
        assert_eq!(s.spawn_delay_max_ms, 2500);
    }

    #[test]
    fn test_ruleset_from_str() {
        assert_eq!(Ruleset::from_str("SIMPLE"), Some(Ruleset::Classic));
        assert_eq!(Ruleset::from_str("festive"), Some(Ruleset::Festive));
        assert_eq!(Ruleset::from_str("nope"), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let s = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(s.ruleset, Ruleset::Festive);
    }
}
