//! Local player state with file locking, plus the rules the ledger applies
//! to it when a workout is recorded.
//!
//! - Experience needed at level n: `floor(200 * 1.07^n)`
//! - Points earned by a workout are added as experience
//! - Quests advance by one per qualifying workout and pay out on completion

use crate::{
    Error, ExerciseLibrary, Profile, Quest, QuestDifficulty, QuestStatus, Result, UserStats,
    WorkoutSession,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Player progress kept by the local ledger
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub level: u32,
    /// Experience carried towards the next level
    pub exp: u32,
    pub coins: u32,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default = "first_quest_id")]
    pub next_quest_id: i32,
}

fn first_quest_id() -> i32 {
    1
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            coins: 0,
            stats: UserStats::default(),
            quests: Vec::new(),
            next_quest_id: first_quest_id(),
        }
    }
}

/// Experience needed to go from `level` to `level + 1`
pub fn exp_needed_for_level(level: u32) -> u32 {
    (200.0 * 1.07_f64.powi(level as i32)).floor() as u32
}

impl QuestDifficulty {
    /// Experience paid out on completion
    pub fn exp(self) -> u32 {
        match self {
            QuestDifficulty::Easy => 500,
            QuestDifficulty::Medium => 2_500,
            QuestDifficulty::Hard => 10_000,
        }
    }

    /// Coins paid out on completion
    pub fn coins(self) -> u32 {
        match self {
            QuestDifficulty::Easy => 250,
            QuestDifficulty::Medium => 500,
            QuestDifficulty::Hard => 2_000,
        }
    }

    pub fn workouts_needed(self) -> u32 {
        match self {
            QuestDifficulty::Easy => 1,
            QuestDifficulty::Medium => 3,
            QuestDifficulty::Hard => 10,
        }
    }

    /// Minimum workout length in minutes
    pub fn workout_duration(self) -> u32 {
        match self {
            QuestDifficulty::Easy => 15,
            QuestDifficulty::Medium => 45,
            QuestDifficulty::Hard => 80,
        }
    }
}

impl PlayerState {
    pub fn profile(&self) -> Profile {
        Profile {
            level: self.level,
            stats: self.stats,
        }
    }

    /// Add experience, levelling up as many times as it covers.
    /// Returns the number of levels gained.
    pub fn add_exp(&mut self, exp: u32) -> u32 {
        let start = self.level;
        self.exp = self.exp.saturating_add(exp);

        loop {
            let needed = exp_needed_for_level(self.level);
            if self.exp < needed {
                break;
            }
            self.exp -= needed;
            self.level += 1;
        }

        let gained = self.level - start;
        if gained > 0 {
            tracing::info!("Level {} -> {}", start, self.level);
        }
        gained
    }

    /// Apply a recorded workout: coins, experience, quest progress.
    /// Returns the ids of quests completed by this workout.
    pub fn record_workout(
        &mut self,
        session: &WorkoutSession,
        library: &ExerciseLibrary,
    ) -> Vec<i32> {
        self.coins = self.coins.saturating_add(session.coins);
        self.add_exp(session.points);

        let mut completed = Vec::new();
        let mut bonus_exp = 0;

        for quest in self
            .quests
            .iter_mut()
            .filter(|q| q.status != QuestStatus::Complete)
        {
            if !workout_applies_to_quest(quest, session, library) {
                continue;
            }

            quest.number_of_workouts_completed += 1;
            tracing::debug!(
                "Quest {} progress {}/{}",
                quest.id,
                quest.number_of_workouts_completed,
                quest.number_of_workouts_needed
            );

            if quest.number_of_workouts_completed >= quest.number_of_workouts_needed {
                quest.status = QuestStatus::Complete;
                bonus_exp += quest.difficulty.exp();
                self.coins = self.coins.saturating_add(quest.difficulty.coins());
                completed.push(quest.id);
                tracing::info!("Quest completed: {} (ID: {})", quest.name, quest.id);
            }
        }

        self.add_exp(bonus_exp);
        completed
    }

    /// Add a new quest of the given difficulty
    pub fn create_quest(&mut self, difficulty: QuestDifficulty) -> &Quest {
        let id = self.next_quest_id;
        self.next_quest_id += 1;

        let workouts = difficulty.workouts_needed();
        let minutes = difficulty.workout_duration();
        let plural = if workouts == 1 { "" } else { "s" };

        self.quests.push(Quest {
            id,
            name: format!("{:?} Quest #{}: {} workout{} of {}+ min", difficulty, id, workouts, plural, minutes),
            difficulty,
            status: QuestStatus::Incomplete,
            number_of_workouts_needed: workouts,
            number_of_workouts_completed: 0,
            workout_duration: Some(minutes),
            exercise_category: None,
        });

        let quest = &self.quests[self.quests.len() - 1];
        tracing::info!("Created quest {}", quest.name);
        quest
    }
}

/// Whether a workout counts towards a quest's requirements
pub fn workout_applies_to_quest(
    quest: &Quest,
    session: &WorkoutSession,
    library: &ExerciseLibrary,
) -> bool {
    if let Some(min) = quest.workout_duration {
        if session.duration < min {
            return false;
        }
    }

    if let Some(ref wanted) = quest.exercise_category {
        let wanted = wanted.trim().to_lowercase();
        let has_category = session.exercises.iter().any(|ex| {
            library
                .get(&ex.id)
                .and_then(|e| e.category.as_deref())
                .map(|c| c.trim().to_lowercase() == wanted)
                .unwrap_or(false)
        });
        if !has_category {
            return false;
        }
    }

    true
}

impl PlayerState {
    /// Load player state from a file with shared locking
    ///
    /// Returns default state if file doesn't exist.
    /// If file is corrupted, logs a warning and returns default state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read state file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<PlayerState>(&contents) {
            Ok(state) => {
                tracing::debug!("Loaded player state from {:?}", path);
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save player state atomically: temp file, fsync, rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("State path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved player state to {:?}", path);
        Ok(())
    }

    /// Take the exclusive writer lock for the state at `path`.
    ///
    /// The lock lives on a sidecar `<path>.lock` file, since `save` replaces
    /// the state file itself. Held until the guard is dropped.
    pub fn lock(path: &Path) -> Result<StateLock> {
        let lock_path = lock_path(path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;

        tracing::debug!("Acquired state lock {:?}", lock_path);
        Ok(StateLock { file })
    }

    /// Load state, modify it, and save it back under the writer lock
    ///
    /// Nothing is saved if `f` fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut PlayerState) -> Result<T>,
    {
        let _lock = Self::lock(path)?;
        let mut state = Self::load(path)?;
        let value = f(&mut state)?;
        state.save(path)?;
        Ok((state, value))
    }
}

/// Exclusive writer lock on a state file; released on drop
#[derive(Debug)]
pub struct StateLock {
    file: File,
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release state lock: {}", e);
        }
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}
