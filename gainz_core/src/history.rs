//! Workout history from the WAL and the CSV archive.
//!
//! History is loaded from both files, deduplicated by workout id and
//! grouped by calendar month for display.

use crate::csv_rollup::CsvRow;
use crate::wal::LoggedWorkout;
use crate::{Result, WorkoutSession};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

impl TryFrom<CsvRow> for LoggedWorkout {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let recorded_at = DateTime::parse_from_rfc3339(&row.recorded_at)
            .map_err(|e| crate::Error::Other(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?;

        Ok(LoggedWorkout {
            id,
            recorded_at,
            session: WorkoutSession {
                name: row.name,
                exercises: vec![], // Only the count is archived
                date,
                duration: row.duration,
                points: row.points,
                coins: row.coins,
            },
        })
    }
}

/// Load every recorded workout from the WAL and the CSV archive
///
/// Returns workouts sorted by date (newest first, ties by record time).
/// Workouts present in both files are returned once, from the WAL.
pub fn load_workouts(wal_path: &Path, csv_path: &Path) -> Result<Vec<LoggedWorkout>> {
    let mut workouts = Vec::new();
    let mut seen_ids = HashSet::new();

    if wal_path.exists() {
        for workout in crate::wal::read_workouts(wal_path)? {
            if seen_ids.insert(workout.id) {
                workouts.push(workout);
            }
        }
        tracing::debug!("Loaded {} workouts from WAL", workouts.len());
    }

    if csv_path.exists() {
        let mut csv_count = 0;
        for workout in load_workouts_from_csv(csv_path)? {
            if seen_ids.insert(workout.id) {
                workouts.push(workout);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} workouts from CSV", csv_count);
    }

    workouts.sort_by(|a, b| {
        b.session
            .date
            .cmp(&a.session.date)
            .then_with(|| b.recorded_at.cmp(&a.recorded_at))
    });

    tracing::info!("Loaded {} total workouts", workouts.len());
    Ok(workouts)
}

fn load_workouts_from_csv(path: &Path) -> Result<Vec<LoggedWorkout>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut workouts = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match LoggedWorkout::try_from(row) {
                Ok(workout) => workouts.push(workout),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    Ok(workouts)
}

/// Workouts of one calendar month
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthGroup {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. "October 2025"
    pub display_month: String,
    pub total_sessions: usize,
    pub total_points: u32,
    pub workouts: Vec<LoggedWorkout>,
}

/// Group workouts by month, newest month first.
///
/// Input order is kept within each month.
pub fn group_by_month(workouts: &[LoggedWorkout]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for workout in workouts {
        let date = workout.session.date;
        let month = format!("{:04}-{:02}", date.year(), date.month());

        match groups.iter_mut().find(|g| g.month == month) {
            Some(group) => {
                group.total_sessions += 1;
                group.total_points += workout.session.points;
                group.workouts.push(workout.clone());
            }
            None => groups.push(MonthGroup {
                month,
                display_month: date.format("%B %Y").to_string(),
                total_sessions: 1,
                total_points: workout.session.points,
                workouts: vec![workout.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| b.month.cmp(&a.month));
    groups
}
