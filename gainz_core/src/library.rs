//! Exercise library lookups.
//!
//! The library is read-only reference data. It is either loaded from a
//! free-exercise-db style JSON array or taken from the small built-in set.

use crate::{ExerciseRef, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

/// Cached built-in library - built once and reused
static BUILTIN_LIBRARY: Lazy<ExerciseLibrary> = Lazy::new(build_builtin_library);

/// In-memory exercise library indexed by id
#[derive(Clone, Debug, Default)]
pub struct ExerciseLibrary {
    exercises: Vec<ExerciseRef>,
    by_id: HashMap<String, usize>,
}

impl ExerciseLibrary {
    /// Build a library from a list; later duplicates of an id are ignored
    pub fn from_exercises(exercises: Vec<ExerciseRef>) -> Self {
        let mut library = ExerciseLibrary::default();
        for exercise in exercises {
            if library.by_id.contains_key(&exercise.id) {
                tracing::warn!("Duplicate exercise id {} in library, keeping first", exercise.id);
                continue;
            }
            library
                .by_id
                .insert(exercise.id.clone(), library.exercises.len());
            library.exercises.push(exercise);
        }
        library
    }

    /// Load a JSON array of exercises from disk
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let exercises: Vec<ExerciseRef> = serde_json::from_str(&contents)?;
        tracing::info!("Loaded {} exercises from {:?}", exercises.len(), path);
        Ok(Self::from_exercises(exercises))
    }

    /// Reference to the cached built-in library
    pub fn builtin() -> &'static ExerciseLibrary {
        &BUILTIN_LIBRARY
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseRef> {
        self.by_id.get(id).map(|&idx| &self.exercises[idx])
    }

    /// Case-insensitive name lookup
    pub fn find_by_name(&self, name: &str) -> Option<&ExerciseRef> {
        let wanted = name.trim().to_lowercase();
        self.exercises
            .iter()
            .find(|e| e.name.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseRef> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

fn exercise(id: &str, name: &str, category: &str, equipment: Option<&str>) -> ExerciseRef {
    ExerciseRef {
        id: id.into(),
        name: name.into(),
        category: Some(category.into()),
        equipment: equipment.map(Into::into),
        images: vec![format!("{}/0.jpg", id), format!("{}/1.jpg", id)],
    }
}

fn build_builtin_library() -> ExerciseLibrary {
    ExerciseLibrary::from_exercises(vec![
        // Strength
        exercise("Barbell_Squat", "Barbell Squat", "strength", Some("barbell")),
        exercise(
            "Barbell_Bench_Press_-_Medium_Grip",
            "Barbell Bench Press - Medium Grip",
            "strength",
            Some("barbell"),
        ),
        exercise("Barbell_Deadlift", "Barbell Deadlift", "powerlifting", Some("barbell")),
        exercise("Dumbbell_Bicep_Curl", "Dumbbell Bicep Curl", "strength", Some("dumbbell")),
        exercise("Clean_and_Jerk", "Clean and Jerk", "olympic weightlifting", Some("barbell")),
        exercise("Pushups", "Pushups", "strength", Some("body only")),
        // Cardio
        exercise("Running_Treadmill", "Running, Treadmill", "cardio", Some("machine")),
        exercise("Rowing_Stationary", "Rowing, Stationary", "cardio", Some("machine")),
        exercise("Mountain_Climbers", "Mountain Climbers", "plyometrics", Some("body only")),
        exercise("Box_Jump_Multiple_Response", "Box Jump (Multiple Response)", "plyometrics", Some("other")),
        // Other
        exercise("Childs_Pose", "Child's Pose", "stretching", None),
        exercise("Worlds_Greatest_Stretch", "World's Greatest Stretch", "stretching", None),
        exercise("Farmers_Walk", "Farmer's Walk", "strongman", Some("other")),
    ])
}
