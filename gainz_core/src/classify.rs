//! Exercise classification from library metadata.

use crate::{ExerciseKind, ExerciseRef};

const STRENGTH_CATEGORIES: &[&str] = &["strength", "powerlifting", "olympic weightlifting"];
const STRENGTH_EQUIPMENT: &[&str] = &["barbell", "dumbbell"];
const CARDIO_CATEGORIES: &[&str] = &["cardio", "running", "plyometrics"];
const CARDIO_EQUIPMENT: &[&str] = &["body only"];

/// Map an exercise to strength, cardio or other.
///
/// Strength wins over cardio when both rules match (e.g. a plyometric
/// exercise performed with a barbell).
pub fn classify(exercise: &ExerciseRef) -> ExerciseKind {
    let category = normalize(exercise.category.as_deref());
    let equipment = normalize(exercise.equipment.as_deref());

    if matches_any(&category, STRENGTH_CATEGORIES) || matches_any(&equipment, STRENGTH_EQUIPMENT)
    {
        ExerciseKind::Strength
    } else if matches_any(&category, CARDIO_CATEGORIES)
        || matches_any(&equipment, CARDIO_EQUIPMENT)
    {
        ExerciseKind::Cardio
    } else {
        ExerciseKind::Other
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value.map(|v| v.trim().to_lowercase())
}

fn matches_any(value: &Option<String>, candidates: &[&str]) -> bool {
    value
        .as_deref()
        .map(|v| candidates.contains(&v))
        .unwrap_or(false)
}
