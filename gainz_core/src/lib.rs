#![forbid(unsafe_code)]

//! Core domain model and business logic for the Gainz workout engine.
//!
//! This crate provides:
//! - Domain types (exercises, sets, sessions, quests, snapshots)
//! - Set entry, classification and per-exercise finalization
//! - Reward calculation and post-submission outcome detection
//! - The submission flow against a [`WorkoutService`]
//! - A local file-backed ledger (WAL, CSV, state)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod sanitize;
pub mod classify;
pub mod library;
pub mod progress;
pub mod finalize;
pub mod routine;
pub mod reward;
pub mod delta;
pub mod service;
pub mod submit;
pub mod wal;
pub mod csv_rollup;
pub mod state;
pub mod ledger;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use library::ExerciseLibrary;
pub use classify::classify;
pub use progress::ProgressStore;
pub use finalize::{finalize, SessionRecords};
pub use routine::{parse_exercise_list, ActiveRoutine, Step};
pub use reward::{Reward, RewardCalculator};
pub use delta::{detect, NextScreen, Outcome};
pub use service::WorkoutService;
pub use submit::{prepare, Submission, SubmissionReport, SubmissionRequest};
pub use wal::{JsonlSink, LoggedWorkout, WorkoutSink};
pub use state::PlayerState;
pub use ledger::LocalLedger;
pub use history::{group_by_month, load_workouts, MonthGroup};
