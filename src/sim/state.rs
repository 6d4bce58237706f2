//! Game state and core simulation types
//!
//! The whole world lives in one owned `GameState`; subsystems borrow the
//! slices they need.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Position;
use crate::consts::*;
use crate::settings::{Ruleset, Settings};

/// Top-level screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for a press
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, showing results
    GameOver,
}

/// Difficulty mode picked on the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Normal,
    Speed,
    /// Speed grows with score, and a crash can be undone once the
    /// second-chance window has passed
    Cheat,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Normal, GameMode::Speed, GameMode::Cheat];

    /// Slot used for per-mode high scores
    pub fn index(&self) -> usize {
        match self {
            GameMode::Normal => 0,
            GameMode::Speed => 1,
            GameMode::Cheat => 2,
        }
    }

    /// Menu cycling order: normal -> speed -> cheat -> normal
    pub fn next(&self) -> Self {
        match self {
            GameMode::Normal => GameMode::Speed,
            GameMode::Speed => GameMode::Cheat,
            GameMode::Cheat => GameMode::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "Normal",
            GameMode::Speed => "Speed",
            GameMode::Cheat => "Cheat",
        }
    }
}

/// What a flying pool slot currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleKind {
    /// Lethal on contact
    #[default]
    Duck,
    /// Stomp from above for points; flying up into it is a penalty crash
    Foe,
    /// Harmless pickup worth points
    Gift,
}

impl ObstacleKind {
    /// Sprite width used for erase and placement
    pub fn width(&self) -> i32 {
        match self {
            ObstacleKind::Gift => GIFT_WIDTH,
            _ => DUCK_WIDTH,
        }
    }

    /// Whether passing this kind earns a point
    pub fn scores_on_pass(&self) -> bool {
        !matches!(self, ObstacleKind::Gift)
    }

    /// Whether this kind flaps between two frames
    pub fn is_animated(&self) -> bool {
        !matches!(self, ObstacleKind::Gift)
    }
}

/// Sleigh condition within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleighStatus {
    Flying,
    /// Hit something; falling under extra gravity
    Crashed { since_ms: u64 },
    /// Crashed sleigh reached the ground; physics frozen until game over
    Exploding { since_ms: u64 },
}

/// The player. Horizontal position is fixed at `SLEIGH_X`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sleigh {
    pub y: f32,
    pub previous_y: f32,
    pub velocity: f32,
    pub status: SleighStatus,
}

impl Default for Sleigh {
    fn default() -> Self {
        Self {
            y: SLEIGH_START_Y,
            previous_y: SLEIGH_START_Y,
            velocity: 0.0,
            status: SleighStatus::Flying,
        }
    }
}

impl Sleigh {
    /// Crashed or exploding
    pub fn is_crashed(&self) -> bool {
        !matches!(self.status, SleighStatus::Flying)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.status, SleighStatus::Exploding { .. })
    }

    /// Enter the crashed sub-state, restarting the crash clock
    pub fn crash(&mut self, now_ms: u64) {
        self.status = SleighStatus::Crashed { since_ms: now_ms };
    }

    /// Top of the sleigh in whole pixels
    pub fn top(&self) -> i32 {
        self.y as i32
    }
}

/// Ground obstacle pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tree {
    pub pos: Position,
    pub active: bool,
    pub scored: bool,
    /// Earliest time an inactive slot may respawn
    pub spawn_at_ms: u64,
}

/// Airborne obstacle pool slot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlyingObstacle {
    pub pos: Position,
    pub active: bool,
    pub scored: bool,
    pub spawn_at_ms: u64,
    pub kind: ObstacleKind,
    /// Which of the two animation frames is shown
    pub flap_frame: bool,
    pub last_flap_ms: u64,
    /// A defeated foe dropping to the ground
    pub falling: bool,
    pub fall_velocity: f32,
}

impl FlyingObstacle {
    /// Active and not a falling foe
    pub fn is_live(&self) -> bool {
        self.active && !self.falling
    }

    /// On screen in any form (live or falling)
    pub fn is_visible(&self) -> bool {
        self.active || self.falling
    }
}

/// What caused a crash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Ceiling,
    Ground,
    Tree,
    Duck,
    Foe,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ModeChanged(GameMode),
    RunStarted,
    Flap,
    SecondChance,
    Crashed(CrashCause),
    Exploded,
    GameOver { score: i32 },
    Reset,
    ObstaclePassed,
    GiftCollected,
    FoeDefeated,
    FoePenalty,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Survives reinitialization; only the menu changes it
    pub mode: GameMode,
    /// Time of the last phase transition
    pub phase_changed_ms: u64,
    pub sleigh: Sleigh,
    /// Current run score, never negative
    pub score: i32,
    pub trees: [Tree; TREE_COUNT],
    pub flyers: [FlyingObstacle; FLYER_COUNT],
    /// Set once the game-over high score commit has run
    pub high_score_committed: bool,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state on the menu
    pub fn new(settings: Settings, seed: u64, now_ms: u64) -> Self {
        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            mode: GameMode::Normal,
            phase_changed_ms: now_ms,
            sleigh: Sleigh::default(),
            score: 0,
            trees: [Tree::default(); TREE_COUNT],
            flyers: [FlyingObstacle::default(); FLYER_COUNT],
            high_score_committed: false,
            events: Vec::new(),
        };
        state.reset(now_ms);
        state
    }

    /// Full reinitialization: sleigh, score, flags and both pools. The mode
    /// and RNG stream carry over.
    pub fn reset(&mut self, now_ms: u64) {
        self.phase = GamePhase::Menu;
        self.phase_changed_ms = now_ms;
        self.sleigh = Sleigh::default();
        self.score = 0;
        self.high_score_committed = false;

        for (i, tree) in self.trees.iter_mut().enumerate() {
            *tree = Tree {
                pos: Position::new(
                    SCREEN_WIDTH + i as i32 * OBSTACLE_SPAWN_DISTANCE,
                    PLAYFIELD_HEIGHT - TREE_HEIGHT,
                ),
                active: i < INITIAL_ACTIVE,
                scored: false,
                spawn_at_ms: 0,
            };
        }

        for i in 0..FLYER_COUNT {
            let y = self.rng.random_range(FLYER_MIN_Y..FLYER_MAX_Y);
            let kind = roll_kind(&mut self.rng, &self.settings);
            let y = if kind == ObstacleKind::Foe { FOE_Y } else { y };
            self.flyers[i] = FlyingObstacle {
                pos: Position::new(
                    SCREEN_WIDTH + i as i32 * OBSTACLE_SPAWN_DISTANCE + OBSTACLE_SPAWN_OFFSET,
                    y,
                ),
                active: i < INITIAL_ACTIVE,
                kind,
                ..FlyingObstacle::default()
            };
        }
    }

    /// Move to another phase, stamping the transition time
    pub fn set_phase(&mut self, phase: GamePhase, now_ms: u64) {
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_changed_ms = now_ms;
    }

    /// Add (or with a negative delta, remove) points; the score floors at 0
    pub fn add_score(&mut self, delta: i32) {
        self.score = (self.score + delta).max(0);
    }

    /// Current leftward obstacle speed
    pub fn obstacle_speed(&self) -> i32 {
        self.settings.obstacle_speed(self.mode, self.score)
    }

    /// Deadline for the next respawn attempt of a pool slot
    pub fn next_spawn_deadline(&mut self, now_ms: u64) -> u64 {
        spawn_deadline(&mut self.rng, &self.settings, now_ms)
    }
}

/// Pick a flying obstacle kind: 80% duck, 16% gift, 4% foe by default.
/// Classic rules only ever produce ducks.
pub fn roll_kind(rng: &mut Pcg32, settings: &Settings) -> ObstacleKind {
    if settings.ruleset == Ruleset::Classic {
        return ObstacleKind::Duck;
    }
    let roll = rng.random_range(0..100u32);
    if roll < settings.duck_percent {
        ObstacleKind::Duck
    } else if roll < settings.duck_percent + settings.gift_percent {
        ObstacleKind::Gift
    } else {
        ObstacleKind::Foe
    }
}

/// `now` plus a delay drawn from `[spawn_delay_min_ms, spawn_delay_max_ms)`
pub fn spawn_deadline(rng: &mut Pcg32, settings: &Settings, now_ms: u64) -> u64 {
    let (min, max) = (settings.spawn_delay_min_ms, settings.spawn_delay_max_ms);
    let delay = if max > min {
        rng.random_range(min..max)
    } else {
        min
    };
    now_ms.saturating_add(delay)
}
