//! Archive the workout WAL into CSV.
//!
//! The CSV keeps one summary row per workout. It is fsynced before the WAL
//! is renamed so a crash never loses a recorded workout.

use crate::wal::LoggedWorkout;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    pub id: String,
    pub recorded_at: String,
    pub name: String,
    pub date: String,
    pub duration: u32,
    pub points: u32,
    pub coins: u32,
    pub exercises: usize,
}

impl From<&LoggedWorkout> for CsvRow {
    fn from(workout: &LoggedWorkout) -> Self {
        CsvRow {
            id: workout.id.to_string(),
            recorded_at: workout.recorded_at.to_rfc3339(),
            name: workout.session.name.clone(),
            date: workout.session.date.format("%Y-%m-%d").to_string(),
            duration: workout.session.duration,
            points: workout.session.points,
            coins: workout.session.coins,
            exercises: workout.session.exercises.len(),
        }
    }
}

/// Append WAL workouts to the CSV and rename the WAL to `.wal.processed`.
///
/// Returns the number of workouts archived.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let workouts = crate::wal::read_workouts(wal_path)?;

    if workouts.is_empty() {
        tracing::info!("No workouts in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for workout in &workouts {
        writer.serialize(CsvRow::from(workout))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} workouts to CSV", workouts.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(workouts.len())
}

/// Remove `.processed` WAL files in `dir`
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().map_or(false, |ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed WAL: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::{JsonlSink, WorkoutSink};
    use crate::{CompletedExercise, WorkoutSession};
    use chrono::NaiveDate;
    use std::fs::File;

    fn create_test_workout(name: &str) -> LoggedWorkout {
        LoggedWorkout::new(WorkoutSession {
            name: name.into(),
            exercises: vec![CompletedExercise {
                id: "Running_Treadmill".into(),
                sets: 1,
                reps: 0,
                weight: 0.0,
                distance: 5.0,
            }],
            date: NaiveDate::from_ymd_opt(2025, 10, 4).unwrap(),
            duration: 30,
            points: 96,
            coins: 40,
        })
    }

    #[test]
    fn test_wal_to_csv_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        let mut sink = JsonlSink::new(&wal_path);
        for i in 0..3 {
            sink.append(&create_test_workout(&format!("Run {}", i))).unwrap();
        }

        let count = wal_to_csv_and_archive(&wal_path, &csv_path).unwrap();
        assert_eq!(count, 3);

        assert!(csv_path.exists());
        assert!(!wal_path.exists());
        assert!(wal_path.with_extension("wal.processed").exists());
    }

    #[test]
    fn test_wal_to_csv_appends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        JsonlSink::new(&wal_path)
            .append(&create_test_workout("First"))
            .unwrap();
        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 1);

        JsonlSink::new(&wal_path)
            .append(&create_test_workout("Second"))
            .unwrap();
        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 1);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let names: Vec<String> = reader
            .deserialize::<CsvRow>()
            .map(|row| row.unwrap().name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_empty_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("empty.wal");
        let csv_path = temp_dir.path().join("workouts.csv");

        File::create(&wal_path).unwrap();

        assert_eq!(wal_to_csv_and_archive(&wal_path, &csv_path).unwrap(), 0);
        assert!(wal_path.exists());
    }

    #[test]
    fn test_cleanup_processed_wals() {
        let temp_dir = tempfile::tempdir().unwrap();

        File::create(temp_dir.path().join("a.wal.processed")).unwrap();
        File::create(temp_dir.path().join("b.wal.processed")).unwrap();
        File::create(temp_dir.path().join("keep.wal")).unwrap();

        assert_eq!(cleanup_processed_wals(temp_dir.path()).unwrap(), 2);
        assert!(!temp_dir.path().join("a.wal.processed").exists());
        assert!(temp_dir.path().join("keep.wal").exists());
    }
}
