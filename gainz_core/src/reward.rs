//! Points and coins for a finished workout.
//!
//! ```text
//! points = round((50 + minutes) * (1 + (stat / 50 + streak / 50)))
//! coins  = round(25 + minutes / 2)
//! ```
//!
//! `stat` is the user's value for the stat the workout trains, chosen by
//! majority classification of the session's exercises.

use crate::classify::classify;
use crate::config::RewardConfig;
use crate::{CompletedExercise, ExerciseKind, ExerciseLibrary, RewardStat, UserStats};

/// Rewards computed for one session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reward {
    pub stat: RewardStat,
    pub points: u32,
    pub coins: u32,
}

/// Per-kind exercise counts for one session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub strength: u32,
    pub cardio: u32,
    pub other: u32,
}

impl KindCounts {
    pub fn add(&mut self, kind: ExerciseKind) {
        match kind {
            ExerciseKind::Strength => self.strength += 1,
            ExerciseKind::Cardio => self.cardio += 1,
            ExerciseKind::Other => self.other += 1,
        }
    }

    /// Dominant kind; ties go to strength, then cardio
    pub fn dominant(&self) -> ExerciseKind {
        if self.strength >= self.cardio && self.strength >= self.other {
            ExerciseKind::Strength
        } else if self.cardio >= self.other {
            ExerciseKind::Cardio
        } else {
            ExerciseKind::Other
        }
    }
}

/// Reward calculator with its streak input
#[derive(Clone, Debug)]
pub struct RewardCalculator {
    streak: u32,
}

impl RewardCalculator {
    pub fn new(streak: u32) -> Self {
        Self { streak }
    }

    pub fn from_config(config: &RewardConfig) -> Self {
        Self::new(config.streak)
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Compute the session's rewards
    pub fn calculate(
        &self,
        records: &[CompletedExercise],
        duration_minutes: u32,
        stats: &UserStats,
        library: &ExerciseLibrary,
    ) -> Reward {
        let stat = workout_stat(records, library);
        let stat_value = stats.get(stat);
        let points = points(duration_minutes, stat_value, self.streak);
        let coins = coins(duration_minutes);

        tracing::info!(
            "Using {:?} stat ({}) for point calculation: {} points, {} coins for {} minutes",
            stat,
            stat_value,
            points,
            coins,
            duration_minutes
        );

        Reward {
            stat,
            points,
            coins,
        }
    }
}

impl Default for RewardCalculator {
    fn default() -> Self {
        Self::from_config(&RewardConfig::default())
    }
}

/// Count the session's exercises by kind.
///
/// Exercises missing from the library are not counted.
pub fn count_kinds(records: &[CompletedExercise], library: &ExerciseLibrary) -> KindCounts {
    let mut counts = KindCounts::default();
    for record in records {
        match library.get(&record.id) {
            Some(exercise) => counts.add(classify(exercise)),
            None => tracing::debug!("Exercise {} not in library, not counted", record.id),
        }
    }
    counts
}

/// Stat the workout trains
pub fn workout_stat(records: &[CompletedExercise], library: &ExerciseLibrary) -> RewardStat {
    RewardStat::from(count_kinds(records, library).dominant())
}

pub fn points(duration_minutes: u32, stat_value: u32, streak: u32) -> u32 {
    let base = 50.0 + f64::from(duration_minutes);
    let multiplier = 1.0 + (f64::from(stat_value) / 50.0 + f64::from(streak) / 50.0);
    (base * multiplier).round() as u32
}

pub fn coins(duration_minutes: u32) -> u32 {
    (25.0 + f64::from(duration_minutes) / 2.0).round() as u32
}
