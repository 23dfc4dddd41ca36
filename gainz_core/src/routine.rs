//! Active routine navigation.
//!
//! Leaving a position in any direction finalizes it, so the records always
//! reflect the last state the user left each exercise in.

use crate::finalize::{finalize, SessionRecords};
use crate::progress::ProgressStore;
use crate::{CompletedExercise, ExerciseLibrary, ExerciseRef};
use serde_json::Value;

/// Result of moving forward
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// Now at this position
    At(usize),
    /// The last exercise was left; all records in position order
    Finished(Vec<CompletedExercise>),
}

/// A routine being worked through
#[derive(Clone, Debug)]
pub struct ActiveRoutine {
    name: String,
    exercises: Vec<ExerciseRef>,
    position: usize,
    store: ProgressStore,
    records: SessionRecords,
}

impl ActiveRoutine {
    /// Start a routine; `start` is clamped to the last exercise
    pub fn new(name: impl Into<String>, exercises: Vec<ExerciseRef>, start: usize) -> Self {
        let position = start.min(exercises.len().saturating_sub(1));
        let mut store = ProgressStore::new();
        if !exercises.is_empty() {
            store.visit(position);
        }
        Self {
            name: name.into(),
            exercises,
            position,
            store,
            records: SessionRecords::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn exercises(&self) -> &[ExerciseRef] {
        &self.exercises
    }

    /// Exercise at the current position, if the routine has any
    pub fn current(&self) -> Option<&ExerciseRef> {
        self.exercises.get(self.position)
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProgressStore {
        &mut self.store
    }

    pub fn records(&self) -> &SessionRecords {
        &self.records
    }

    /// Finalize the current position and advance, or finish after the last one
    pub fn next(&mut self) -> Step {
        self.finalize_current();
        if self.position + 1 < self.exercises.len() {
            self.move_to(self.position + 1);
            Step::At(self.position)
        } else {
            Step::Finished(self.records.to_vec())
        }
    }

    /// Finalize the current position and step back; no-op at the first one
    pub fn prev(&mut self) -> usize {
        if self.position > 0 {
            self.finalize_current();
            self.move_to(self.position - 1);
        }
        self.position
    }

    /// Finalize the current position and return all records
    pub fn end(&mut self) -> Vec<CompletedExercise> {
        self.finalize_current();
        self.records.to_vec()
    }

    /// Throw away everything typed so far
    pub fn cancel(&mut self) {
        tracing::info!("Workout {:?} cancelled", self.name);
        self.store.clear();
        self.records.clear();
    }

    fn finalize_current(&mut self) {
        if let Some(exercise) = self.exercises.get(self.position) {
            let record = finalize(&self.store, self.position, exercise);
            self.records.record(self.position, record);
        }
    }

    fn move_to(&mut self, position: usize) {
        self.position = position;
        self.store.visit(position);
    }
}

/// Parse a serialized exercise list handed over by navigation.
///
/// Accepts an array of objects with an `id` (enriched from the library when
/// the id is known) or an array of exercise names (resolved through the
/// library by name). Anything else yields an empty list.
pub fn parse_exercise_list(raw: &str, library: &ExerciseLibrary) -> Vec<ExerciseRef> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("Exercise list is not an array, showing no exercises");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Failed to parse exercise list: {}. Showing no exercises.", e);
            return Vec::new();
        }
    };

    match items.first() {
        Some(Value::Object(_)) => items.iter().filter_map(|v| from_object(v, library)).collect(),
        Some(Value::String(_)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|name| from_name(name, library))
            .collect(),
        Some(_) => {
            tracing::warn!("Unsupported exercise list entries, showing no exercises");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn from_object(value: &Value, library: &ExerciseLibrary) -> Option<ExerciseRef> {
    let id = match value.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            tracing::debug!("Skipping exercise entry without id");
            return None;
        }
    };

    if let Some(known) = library.get(&id) {
        return Some(known.clone());
    }

    let mut exercise: ExerciseRef = match serde_json::from_value(value.clone()) {
        Ok(exercise) => exercise,
        Err(_) => ExerciseRef::bare(id.clone(), ""),
    };
    exercise.id = id;
    if exercise.name.is_empty() {
        exercise.name = exercise.id.clone();
    }
    Some(exercise)
}

fn from_name(name: &str, library: &ExerciseLibrary) -> ExerciseRef {
    match library.find_by_name(name) {
        Some(known) => known.clone(),
        None => ExerciseRef::bare(name, name),
    }
}
