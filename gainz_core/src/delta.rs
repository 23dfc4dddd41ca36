//! Outcome detection by diffing pre- and post-submission snapshots.
//!
//! Priority:
//! 1. Level-up, when the level went up
//! 2. Quest completion, when some quest went from incomplete to complete
//! 3. Plain completion otherwise

use crate::{QuestSummary, Snapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a submitted workout led to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    LevelUp {
        old_level: u32,
        new_level: u32,
        levels_gained: u32,
    },
    /// Carries the pre-submission copies of the newly completed quests
    QuestComplete { quests: Vec<QuestSummary> },
    PlainComplete,
}

/// Screen to show after submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextScreen {
    LevelUp,
    QuestComplete,
    WorkoutComplete,
}

impl Outcome {
    pub fn next_screen(&self) -> NextScreen {
        match self {
            Outcome::LevelUp { .. } => NextScreen::LevelUp,
            Outcome::QuestComplete { .. } => NextScreen::QuestComplete,
            Outcome::PlainComplete => NextScreen::WorkoutComplete,
        }
    }
}

/// Classify the outcome of a submission
pub fn detect(old: &Snapshot, new: &Snapshot) -> Outcome {
    if new.level > old.level {
        let levels_gained = new.level - old.level;
        tracing::info!(
            "Level up: {} -> {} (+{} levels)",
            old.level,
            new.level,
            levels_gained
        );
        return Outcome::LevelUp {
            old_level: old.level,
            new_level: new.level,
            levels_gained,
        };
    }

    let completed = newly_completed(&old.quests, &new.quests);
    if !completed.is_empty() {
        tracing::info!("{} quest(s) completed", completed.len());
        return Outcome::QuestComplete { quests: completed };
    }

    Outcome::PlainComplete
}

/// Quests that were not complete before and are complete now.
///
/// Quests are matched by id; an old quest with no counterpart in `new` is
/// skipped.
pub fn newly_completed(old: &[QuestSummary], new: &[QuestSummary]) -> Vec<QuestSummary> {
    let current: HashMap<i32, &QuestSummary> = new.iter().map(|q| (q.id, q)).collect();

    old.iter()
        .filter(|before| match current.get(&before.id) {
            Some(after) => !before.status.is_complete() && after.status.is_complete(),
            None => {
                tracing::debug!("Quest {} missing after submission, skipped", before.id);
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuestStatus;

    fn quest(id: i32, status: &str) -> QuestSummary {
        QuestSummary {
            id,
            name: format!("Quest {}", id),
            status: QuestStatus::parse(status),
            workouts_completed: 0,
            workouts_needed: 1,
        }
    }

    fn snapshot(level: u32, quests: Vec<QuestSummary>) -> Snapshot {
        Snapshot { level, quests }
    }

    #[test]
    fn test_quest_complete() {
        let old = snapshot(3, vec![quest(1, "active")]);
        let new = snapshot(3, vec![quest(1, "completed")]);

        let outcome = detect(&old, &new);
        match &outcome {
            Outcome::QuestComplete { quests } => {
                assert_eq!(quests.len(), 1);
                assert_eq!(quests[0].id, 1);
                // Old-snapshot copy is carried
                assert_eq!(quests[0].status, QuestStatus::Incomplete);
            }
            other => panic!("Expected QuestComplete, got {:?}", other),
        }
        assert_eq!(outcome.next_screen(), NextScreen::QuestComplete);
    }

    #[test]
    fn test_level_up_takes_priority() {
        let old = snapshot(3, vec![quest(1, "active")]);
        let new = snapshot(4, vec![quest(1, "completed")]);

        let outcome = detect(&old, &new);
        assert_eq!(
            outcome,
            Outcome::LevelUp {
                old_level: 3,
                new_level: 4,
                levels_gained: 1
            }
        );
        assert_eq!(outcome.next_screen(), NextScreen::LevelUp);
    }

    #[test]
    fn test_multiple_levels_gained() {
        let outcome = detect(&snapshot(2, vec![]), &snapshot(5, vec![]));
        assert!(matches!(outcome, Outcome::LevelUp { levels_gained: 3, .. }));
    }

    #[test]
    fn test_plain_complete() {
        let old = snapshot(3, vec![quest(1, "Incomplete")]);
        let new = snapshot(3, vec![quest(1, "Incomplete")]);
        let outcome = detect(&old, &new);
        assert_eq!(outcome, Outcome::PlainComplete);
        assert_eq!(outcome.next_screen(), NextScreen::WorkoutComplete);
    }

    #[test]
    fn test_level_decrease_is_not_level_up() {
        let outcome = detect(&snapshot(4, vec![]), &snapshot(3, vec![]));
        assert_eq!(outcome, Outcome::PlainComplete);
    }

    #[test]
    fn test_already_complete_quests_ignored() {
        let old = snapshot(1, vec![quest(1, "Complete"), quest(2, "Incomplete")]);
        let new = snapshot(1, vec![quest(1, "Complete"), quest(2, "Complete")]);

        let completed = newly_completed(&old.quests, &new.quests);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, 2);
    }

    #[test]
    fn test_missing_quest_is_excluded() {
        let old = snapshot(1, vec![quest(1, "Incomplete"), quest(2, "Incomplete")]);
        let new = snapshot(1, vec![quest(2, "Incomplete")]);
        assert_eq!(detect(&old, &new), Outcome::PlainComplete);
    }

    #[test]
    fn test_new_quests_without_old_counterpart_ignored() {
        let old = snapshot(1, vec![]);
        let new = snapshot(1, vec![quest(9, "Complete")]);
        assert_eq!(detect(&old, &new), Outcome::PlainComplete);
    }

    #[test]
    fn test_matching_is_by_id_not_position() {
        let old = snapshot(1, vec![quest(1, "Incomplete"), quest(2, "Incomplete")]);
        let new = snapshot(1, vec![quest(2, "Complete"), quest(1, "Incomplete")]);

        let completed = newly_completed(&old.quests, &new.quests);
        assert_eq!(completed.iter().map(|q| q.id).collect::<Vec<_>>(), vec![2]);
    }
}
