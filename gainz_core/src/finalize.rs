//! Session finalizer: turns a position's raw sets into a completed record.
//!
//! Aggregation depends on the exercise kind:
//! - Strength: sets with reps or weight count; reps summed, weight averaged
//! - Cardio: sets with a distance count; distance summed
//! - Other: sets with any field count; all three aggregated
//!
//! Weight is an average per completed set while distance is a total. The two
//! live in separate functions so neither is mistaken for the other.

use crate::classify::classify;
use crate::progress::ProgressStore;
use crate::sanitize::parse_numeric;
use crate::{CompletedExercise, ExerciseKind, ExerciseRef, SetEntry};
use std::collections::BTreeMap;

/// Finalize one position into a completed exercise record
///
/// The record is an owned copy; mutating the store afterwards does not
/// change it. Finalizing the same state twice yields equal records.
pub fn finalize(
    store: &ProgressStore,
    position: usize,
    exercise: &ExerciseRef,
) -> CompletedExercise {
    let kind = classify(exercise);
    let completed = completed_sets(store.get_sets(position), kind);
    let sets = completed.len() as u32;

    let (reps, weight) = match kind {
        ExerciseKind::Strength | ExerciseKind::Other => {
            (total_reps(&completed), average_weight(&completed))
        }
        ExerciseKind::Cardio => (0, 0.0),
    };

    let distance = match kind {
        ExerciseKind::Cardio | ExerciseKind::Other => total_distance(&completed),
        ExerciseKind::Strength => 0.0,
    };

    tracing::debug!(
        "Finalized {} ({}) at position {}: {} sets, {} reps, {} avg weight, {} distance",
        exercise.id,
        kind,
        position,
        sets,
        reps,
        weight,
        distance
    );

    CompletedExercise {
        id: exercise.id.clone(),
        sets,
        reps,
        weight,
        distance,
    }
}

/// Filter to the sets that count for this kind of exercise
pub fn completed_sets(sets: &[SetEntry], kind: ExerciseKind) -> Vec<&SetEntry> {
    sets.iter()
        .filter(|s| match kind {
            ExerciseKind::Strength => !s.reps.is_empty() || !s.weight.is_empty(),
            ExerciseKind::Cardio => !s.distance.is_empty(),
            ExerciseKind::Other => {
                !s.reps.is_empty() || !s.weight.is_empty() || !s.distance.is_empty()
            }
        })
        .collect()
}

/// Sum of reps across sets, rounded to a whole number
pub fn total_reps(sets: &[&SetEntry]) -> u32 {
    let total: f64 = sets.iter().map(|s| parse_numeric(&s.reps)).sum();
    total.round() as u32
}

/// Average weight per set, one decimal; 0 when there are no sets
pub fn average_weight(sets: &[&SetEntry]) -> f64 {
    if sets.is_empty() {
        return 0.0;
    }
    let total: f64 = sets.iter().map(|s| parse_numeric(&s.weight)).sum();
    round_tenths(total / sets.len() as f64)
}

/// Total distance across sets, one decimal
pub fn total_distance(sets: &[&SetEntry]) -> f64 {
    let total: f64 = sets.iter().map(|s| parse_numeric(&s.distance)).sum();
    round_tenths(total)
}

/// Round to one decimal place
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Completed records of the current workout, one per position
///
/// Re-recording a position replaces its earlier record.
#[derive(Clone, Debug, Default)]
pub struct SessionRecords {
    records: BTreeMap<usize, CompletedExercise>,
}

impl SessionRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: usize, record: CompletedExercise) {
        if self.records.insert(position, record).is_some() {
            tracing::debug!("Replaced record for position {}", position);
        }
    }

    pub fn get(&self, position: usize) -> Option<&CompletedExercise> {
        self.records.get(&position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in position order
    pub fn to_vec(&self) -> Vec<CompletedExercise> {
        self.records.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
