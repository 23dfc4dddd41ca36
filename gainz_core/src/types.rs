//! Core domain types for the Gainz workout engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Set entries typed during an active workout
//! - Exercise references and their classification
//! - Completed exercise records and the workout submission payload
//! - Profile, quest and snapshot types exchanged with the workout service

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Set Entry Types
// ============================================================================

/// One row of user input for an exercise: free-text numeric strings.
///
/// An empty string means "not entered".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntry {
    pub reps: String,
    pub weight: String,
    pub distance: String,
}

impl SetEntry {
    /// The entry every unvisited position starts with
    pub const EMPTY: SetEntry = SetEntry {
        reps: String::new(),
        weight: String::new(),
        distance: String::new(),
    };

    /// Read one field
    pub fn field(&self, field: SetField) -> &str {
        match field {
            SetField::Reps => &self.reps,
            SetField::Weight => &self.weight,
            SetField::Distance => &self.distance,
        }
    }

    /// Mutable access to one field
    pub fn field_mut(&mut self, field: SetField) -> &mut String {
        match field {
            SetField::Reps => &mut self.reps,
            SetField::Weight => &mut self.weight,
            SetField::Distance => &mut self.distance,
        }
    }
}

/// Which field of a set entry is being edited
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    Reps,
    Weight,
    Distance,
}

impl FromStr for SetField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reps" | "r" => Ok(SetField::Reps),
            "weight" | "w" => Ok(SetField::Weight),
            "distance" | "d" => Ok(SetField::Distance),
            other => Err(crate::Error::Other(format!("Unknown set field: {}", other))),
        }
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// Read-only exercise metadata from the exercise library
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ExerciseRef {
    /// Minimal reference used when only an id/name pair is known
    pub fn bare(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: None,
            equipment: None,
            images: Vec::new(),
        }
    }
}

/// Exercise classification driving input fields and aggregation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Strength,
    Cardio,
    Other,
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Strength => write!(f, "strength"),
            ExerciseKind::Cardio => write!(f, "cardio"),
            ExerciseKind::Other => write!(f, "other"),
        }
    }
}

/// The user stat a workout scales its points by
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStat {
    Strength,
    Endurance,
    Flexibility,
}

impl From<ExerciseKind> for RewardStat {
    fn from(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Strength => RewardStat::Strength,
            ExerciseKind::Cardio => RewardStat::Endurance,
            ExerciseKind::Other => RewardStat::Flexibility,
        }
    }
}

// ============================================================================
// Session Record Types
// ============================================================================

/// Finalized summary of one exercise's sets within a session.
///
/// `weight` is the average weight per completed set; `distance` is a total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    pub id: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub distance: f64,
}

/// Workout submission payload sent to the workout service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub name: String,
    pub exercises: Vec<CompletedExercise>,
    /// Calendar date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Duration in minutes
    pub duration: u32,
    pub points: u32,
    pub coins: u32,
}

// ============================================================================
// Profile and Quest Types
// ============================================================================

/// The user's class stats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub strength: u32,
    #[serde(default)]
    pub endurance: u32,
    #[serde(default)]
    pub flexibility: u32,
}

impl UserStats {
    pub fn get(&self, stat: RewardStat) -> u32 {
        match stat {
            RewardStat::Strength => self.strength,
            RewardStat::Endurance => self.endurance,
            RewardStat::Flexibility => self.flexibility,
        }
    }
}

/// Profile fields the engine needs from the service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub level: u32,
    #[serde(default)]
    pub stats: UserStats,
}

/// Quest completion status.
///
/// The service reports free-form status strings; only "complete" (or
/// "completed"), in any case, counts as complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestStatus {
    Incomplete,
    Complete,
}

impl QuestStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "complete" | "completed" => QuestStatus::Complete,
            _ => QuestStatus::Incomplete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Incomplete => "Incomplete",
            QuestStatus::Complete => "Complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == QuestStatus::Complete
    }
}

impl Serialize for QuestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(QuestStatus::parse(&raw))
    }
}

/// Quest difficulty tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestDifficulty {
    #[serde(alias = "easy")]
    Easy,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl FromStr for QuestDifficulty {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(QuestDifficulty::Easy),
            "medium" => Ok(QuestDifficulty::Medium),
            "hard" => Ok(QuestDifficulty::Hard),
            other => Err(crate::Error::Other(format!("Unknown difficulty: {}", other))),
        }
    }
}

/// A quest as returned by the workout service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: i32,
    pub name: String,
    pub difficulty: QuestDifficulty,
    pub status: QuestStatus,
    pub number_of_workouts_needed: u32,
    pub number_of_workouts_completed: u32,
    /// Minimum workout duration in minutes for a workout to count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_duration: Option<u32>,
    /// Exercise category a workout must include to count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_category: Option<String>,
}

// ============================================================================
// Snapshot Types
// ============================================================================

/// The slice of a quest the delta detector compares and displays
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestSummary {
    pub id: i32,
    pub name: String,
    pub status: QuestStatus,
    pub workouts_completed: u32,
    pub workouts_needed: u32,
}

impl From<&Quest> for QuestSummary {
    fn from(quest: &Quest) -> Self {
        QuestSummary {
            id: quest.id,
            name: quest.name.clone(),
            status: quest.status,
            workouts_completed: quest.number_of_workouts_completed,
            workouts_needed: quest.number_of_workouts_needed,
        }
    }
}

/// Immutable capture of level and quest state at one point of the flow
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub quests: Vec<QuestSummary>,
}

impl Snapshot {
    /// Copy the relevant parts of a profile and quest list
    pub fn capture(profile: &Profile, quests: &[Quest]) -> Self {
        Snapshot {
            level: profile.level,
            quests: quests.iter().map(QuestSummary::from).collect(),
        }
    }
}
