//! High score tracking
//!
//! One session best and one all-time best per game mode. All-time values are
//! persisted under `highscore{mode}` and written only when beaten.


use crate::persistence::KeyValueStore;
use crate::sim::{GameMode, GamePhase, GameState};

/// Number of per-mode slots
pub const MODE_SLOTS: usize = GameMode::ALL.len();

/// What a commit changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    pub new_session_best: bool,
    pub new_record: bool,
}

/// Per-mode high scores
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    pub session: [i32; MODE_SLOTS],
    pub all_time: [i32; MODE_SLOTS],
}

impl HighScores {
    /// Store key for a mode's all-time record
    pub fn storage_key(mode: GameMode) -> String {
        format!("highscore{}", mode.index())
    }

    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every all-time record; missing keys count as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        let mut scores = Self::new();
        for mode in GameMode::ALL {
            scores.all_time[mode.index()] = store.get_int(&Self::storage_key(mode), 0);
        }
        log::info!("Loaded all-time records {:?}", scores.all_time);
        scores
    }

    pub fn session_best(&self, mode: GameMode) -> i32 {
        self.session[mode.index()]
    }

    pub fn record(&self, mode: GameMode) -> i32 {
        self.all_time[mode.index()]
    }

    /// Fold a finished run into the table. A new all-time record is written
    /// to the store; a failed write keeps the in-memory record.
    pub fn commit(
        &mut self,
        mode: GameMode,
        score: i32,
        store: &mut impl KeyValueStore,
    ) -> CommitOutcome {
        let slot = mode.index();
        let mut outcome = CommitOutcome::default();

        if score > self.session[slot] {
            self.session[slot] = score;
            outcome.new_session_best = true;
        }

        if score > self.all_time[slot] {
            self.all_time[slot] = score;
            outcome.new_record = true;
            log::info!("New {} record: {}", mode.as_str(), score);
            if let Err(e) = store.put_int(&Self::storage_key(mode), score) {
                log::warn!("Could not persist high score: {:#}", e);
            }
        }

        outcome
    }

    /// Commit the run in `state` exactly once per game-over episode
    pub fn commit_game_over(
        &mut self,
        state: &mut GameState,
        store: &mut impl KeyValueStore,
    ) -> Option<CommitOutcome> {
        if state.phase != GamePhase::GameOver || state.high_score_committed {
            return None;
        }
        state.high_score_committed = true;
        Some(self.commit(state.mode, state.score, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::settings::Settings;

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get_int(&self, _key: &str, default: i32) -> i32 {
            default
        }

        fn put_int(&mut self, _key: &str, _value: i32) -> anyhow::Result<()> {
            anyhow::bail!("read-only")
        }
    }

    #[test]
    fn test_load_reads_every_mode() {
        let store = MemoryStore::new()
            .with_value("highscore0", 12)
            .with_value("highscore2", 99);
        let scores = HighScores::load(&store);
        assert_eq!(scores.all_time, [12, 0, 99]);
        assert_eq!(scores.session, [0, 0, 0]);
    }

    #[test]
    fn test_commit_writes_only_new_records() {
        let mut store = MemoryStore::new().with_value("highscore1", 50);
        let mut scores = HighScores::load(&store);

        let outcome = scores.commit(GameMode::Speed, 30, &mut store);
        assert_eq!(
            outcome,
            CommitOutcome {
                new_session_best: true,
                new_record: false
            }
        );
        assert_eq!(store.writes, 0);

        let outcome = scores.commit(GameMode::Speed, 51, &mut store);
        assert!(outcome.new_record);
        assert_eq!(store.writes, 1);
        assert_eq!(store.get_int("highscore1", 0), 51);
        assert_eq!(scores.session_best(GameMode::Speed), 51);
        assert_eq!(scores.record(GameMode::Normal), 0);
    }

    #[test]
    fn test_commit_runs_once_per_game_over() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        let mut state = GameState::new(Settings::default(), 1, 0);
        state.phase = GamePhase::GameOver;
        state.score = 8;

        assert!(scores.commit_game_over(&mut state, &mut store).is_some());
        for _ in 0..100 {
            state.score = 1_000;
            assert!(scores.commit_game_over(&mut state, &mut store).is_none());
        }
        assert_eq!(store.writes, 1);
        assert_eq!(scores.record(GameMode::Normal), 8);

        state.reset(0);
        state.phase = GamePhase::GameOver;
        state.score = 9;
        assert!(scores.commit_game_over(&mut state, &mut store).is_some());
        assert_eq!(store.writes, 2);
    }

    #[test]
    fn test_commit_skipped_while_playing() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        let mut state = GameState::new(Settings::default(), 1, 0);
        state.phase = GamePhase::Playing;
        state.score = 5;
        assert!(scores.commit_game_over(&mut state, &mut store).is_none());
        assert!(!state.high_score_committed);
    }

    #[test]
    fn test_failed_write_keeps_session_record() {
        let mut store = ReadOnlyStore;
        let mut scores = HighScores::load(&store);
        let outcome = scores.commit(GameMode::Cheat, 7, &mut store);
        assert!(outcome.new_record);
        assert_eq!(scores.record(GameMode::Cheat), 7);
    }
}
