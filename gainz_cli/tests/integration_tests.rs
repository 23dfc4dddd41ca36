//! Integration tests for the gainz binary.
//!
//! These tests verify end-to-end behavior including:
//! - Workout entry from stdin and submission to the local ledger
//! - Outcome screens (level up, quest complete, plain complete)
//! - History and CSV rollup

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gainz"))
}

/// Log a 30 minute squat workout: one set of 10 x 100
fn log_squats(data_dir: &Path) -> assert_cmd::assert::Assert {
    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--routine", "Leg Day", "--exercise", "Barbell_Squat", "--duration", "30"])
        .write_stdin("reps 1 10\nweight 1 100\nend\n")
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gamified workout tracker"));
}

#[test]
fn test_plain_workout_is_recorded() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_squats(data_dir)
        .success()
        .stdout(predicate::str::contains("WORKOUT COMPLETE"))
        .stdout(predicate::str::contains("+96 points, +40 coins"));

    let wal = fs::read_to_string(data_dir.join("workouts.wal")).expect("Failed to read WAL");
    assert_eq!(wal.lines().count(), 1);

    let line: serde_json::Value = serde_json::from_str(wal.lines().next().unwrap()).unwrap();
    let exercise = &line["session"]["exercises"][0];
    assert_eq!(line["session"]["name"], "Leg Day");
    assert_eq!(exercise["id"], "Barbell_Squat");
    assert_eq!(exercise["sets"], 1);
    assert_eq!(exercise["reps"], 10);
    assert_eq!(exercise["weight"], 100.0);
}

#[test]
fn test_status_reflects_recorded_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_squats(data_dir).success();

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Level: 1"))
        .stdout(predicate::str::contains("Exp: 96/214"))
        .stdout(predicate::str::contains("Coins: 40"));
}

#[test]
fn test_quest_completion_levels_up() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("quest")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--difficulty", "easy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quest #1"));

    // 96 points plus 500 quest exp outweighs the quest screen
    log_squats(data_dir)
        .success()
        .stdout(predicate::str::contains("LEVEL UP! Level 1 -> 3"));

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("[✓] #1"))
        .stdout(predicate::str::contains("Coins: 290"));
}

#[test]
fn test_quest_complete_screen() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    // High enough that the quest reward does not level up
    let state = serde_json::json!({
        "level": 40,
        "exp": 0,
        "coins": 0,
        "quests": [],
        "next_quest_id": 1
    });
    fs::write(data_dir.join("state.json"), state.to_string()).unwrap();

    cli()
        .arg("quest")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--difficulty", "easy"])
        .assert()
        .success();

    log_squats(data_dir)
        .success()
        .stdout(predicate::str::contains("QUEST COMPLETE"))
        .stdout(predicate::str::contains("Easy Quest #1"));
}

#[test]
fn test_zero_duration_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--exercise", "Barbell_Squat", "--duration", "0"])
        .write_stdin("reps 1 10\nend\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please select a workout duration"));

    assert!(!data_dir.join("workouts.wal").exists());
}

#[test]
fn test_empty_routine_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--duration", "30"])
        .write_stdin("end\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exercise data to record"));
}

#[test]
fn test_cancel_records_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--exercise", "Barbell_Squat", "--duration", "30"])
        .write_stdin("reps 1 10\ncancel\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout cancelled"));

    assert!(!data_dir.join("workouts.wal").exists());
}

#[test]
fn test_multi_exercise_navigation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let script = "\
reps 1 10
weight 1 60kg
add
reps 2 8
weight 2 70
next
distance 1 2.5
add
distance 2 3.5
prev
show
next
next
";

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args([
            "--exercise",
            "Barbell_Squat",
            "--exercise",
            "Running_Treadmill",
            "--duration",
            "45",
        ])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("[2/2] Running, Treadmill (cardio)"))
        .stdout(predicate::str::contains("Set 2: reps=8 weight=70 distance="))
        .stdout(predicate::str::contains("WORKOUT COMPLETE"));

    let wal = fs::read_to_string(data_dir.join("workouts.wal")).unwrap();
    let line: serde_json::Value = serde_json::from_str(wal.trim()).unwrap();
    let exercises = line["session"]["exercises"].as_array().unwrap();

    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["sets"], 2);
    assert_eq!(exercises[0]["reps"], 18);
    assert_eq!(exercises[0]["weight"], 65.0);
    assert_eq!(exercises[1]["sets"], 2);
    assert_eq!(exercises[1]["distance"], 6.0);
}

#[test]
fn test_exercises_json_names() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--exercises-json", r#"["barbell squat"]"#, "--duration", "20"])
        .write_stdin("reps 1 5\nweight 1 40\nend\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Barbell Squat (strength)"));

    let wal = fs::read_to_string(data_dir.join("workouts.wal")).unwrap();
    assert!(wal.contains("\"Barbell_Squat\""));
}

#[test]
fn test_history_groups_by_month() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts recorded yet"));

    log_squats(data_dir).success();
    log_squats(data_dir).success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 sessions, 192 points"))
        .stdout(predicate::str::contains("Leg Day (30 min, 96 points, 40 coins)"));
}

#[test]
fn test_rollup_keeps_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_squats(data_dir).success();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 1 workouts"));

    assert!(data_dir.join("workouts.csv").exists());
    assert!(!data_dir.join("workouts.wal").exists());
    assert!(!data_dir.join("workouts.wal.processed").exists());

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 session, 96 points"));
}

#[test]
fn test_rollup_without_wal() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}

#[test]
fn test_unknown_difficulty_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("quest")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--difficulty", "legendary"])
        .assert()
        .failure();
}
