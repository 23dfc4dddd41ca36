//! File-backed [`WorkoutService`] used by the CLI and tests.
//!
//! Recorded workouts are appended to `workouts.wal`; level, coins and quest
//! progress live in `state.json`. Writers hold the state lock for the whole
//! update, and the log line is only kept once the state has been saved.

use crate::service::WorkoutService;
use crate::state::PlayerState;
use crate::wal::{JsonlSink, LoggedWorkout, WorkoutSink};
use crate::{Error, ExerciseLibrary, Profile, Quest, QuestDifficulty, Result, WorkoutSession};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

pub const STATE_FILE: &str = "state.json";
pub const WAL_FILE: &str = "workouts.wal";
pub const CSV_FILE: &str = "workouts.csv";

pub struct LocalLedger {
    state_path: PathBuf,
    wal_path: PathBuf,
    library: ExerciseLibrary,
    fail_next_persist: AtomicBool,
}

impl LocalLedger {
    /// Ledger over the standard file names inside `data_dir`
    pub fn open(data_dir: &Path, library: ExerciseLibrary) -> Self {
        Self::with_paths(data_dir.join(STATE_FILE), data_dir.join(WAL_FILE), library)
    }

    pub fn with_paths(
        state_path: impl Into<PathBuf>,
        wal_path: impl Into<PathBuf>,
        library: ExerciseLibrary,
    ) -> Self {
        Self {
            state_path: state_path.into(),
            wal_path: wal_path.into(),
            library,
            fail_next_persist: AtomicBool::new(false),
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    pub fn library(&self) -> &ExerciseLibrary {
        &self.library
    }

    /// Current player state as stored on disk
    pub fn state(&self) -> Result<PlayerState> {
        PlayerState::load(&self.state_path)
    }

    /// Add a quest and return it
    pub fn create_quest(&self, difficulty: QuestDifficulty) -> Result<Quest> {
        let (_, quest) =
            PlayerState::update(&self.state_path, |state| Ok(state.create_quest(difficulty).clone()))?;
        Ok(quest)
    }

    /// Make the next persist call fail with a retryable error
    pub fn fail_next_persist(&self) {
        self.fail_next_persist.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkoutService for LocalLedger {
    async fn persist_workout(&self, session: &WorkoutSession) -> Result<()> {
        if self.fail_next_persist.swap(false, Ordering::SeqCst) {
            return Err(Error::Service("Ledger unavailable".into()));
        }

        let _lock = PlayerState::lock(&self.state_path)?;
        let previous = PlayerState::load(&self.state_path)?;

        let mut state = previous.clone();
        let completed = state.record_workout(session, &self.library);
        state.save(&self.state_path)?;

        let logged = LoggedWorkout::new(session.clone());
        if let Err(e) = JsonlSink::new(&self.wal_path).append(&logged) {
            tracing::warn!("Failed to log workout, restoring previous state: {}", e);
            previous.save(&self.state_path)?;
            return Err(e);
        }

        tracing::info!(
            "Recorded workout {} (level {}, {} coins, {} quests completed)",
            logged.id,
            state.level,
            state.coins,
            completed.len()
        );
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        Ok(self.state()?.profile())
    }

    async fn fetch_quests(&self) -> Result<Vec<Quest>> {
        Ok(self.state()?.quests)
    }
}
