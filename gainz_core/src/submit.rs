//! Submission flow: validate, reward, persist, refetch, detect.
//!
//! A [`Submission`] is pure data (payload plus pre-submission snapshot), so
//! a failed submit can be retried with exactly the same payload. Once the
//! persist call has succeeded it is not repeated on retry; only the
//! refetch and detection run again.

use crate::delta::{detect, Outcome};
use crate::reward::{Reward, RewardCalculator};
use crate::service::WorkoutService;
use crate::{
    CompletedExercise, Error, ExerciseLibrary, Profile, Quest, Result, Snapshot, WorkoutSession,
};
use chrono::NaiveDate;

/// Name used when the routine has none
pub const DEFAULT_WORKOUT_NAME: &str = "Workout Session";

/// Everything needed to build a submission
#[derive(Clone, Debug)]
pub struct SubmissionRequest<'a> {
    pub name: &'a str,
    pub records: Vec<CompletedExercise>,
    pub duration_minutes: u32,
    pub date: NaiveDate,
    /// Profile as cached before the workout; supplies stats and the old level
    pub profile: &'a Profile,
    /// Quests as cached before the workout
    pub quests: &'a [Quest],
}

/// A validated, priced workout ready to be sent
#[derive(Clone, Debug)]
pub struct Submission {
    payload: WorkoutSession,
    reward: Reward,
    before: Snapshot,
    persisted: bool,
}

/// Result of a successful submission
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionReport {
    pub outcome: Outcome,
    pub before: Snapshot,
    pub after: Snapshot,
    pub profile: Profile,
}

/// Validate the request and compute rewards.
///
/// Validation errors are returned before anything is sent.
pub fn prepare(
    request: SubmissionRequest<'_>,
    library: &ExerciseLibrary,
    calculator: &RewardCalculator,
) -> Result<Submission> {
    if request.duration_minutes == 0 {
        return Err(Error::Validation("Please select a workout duration".into()));
    }
    if request.records.is_empty() {
        return Err(Error::Validation("No exercise data to record".into()));
    }

    let reward = calculator.calculate(
        &request.records,
        request.duration_minutes,
        &request.profile.stats,
        library,
    );

    let name = match request.name.trim() {
        "" => DEFAULT_WORKOUT_NAME.to_string(),
        trimmed => trimmed.to_string(),
    };

    let payload = WorkoutSession {
        name,
        exercises: request.records,
        date: request.date,
        duration: request.duration_minutes,
        points: reward.points,
        coins: reward.coins,
    };

    // Captured now, before anything reaches the service
    let before = Snapshot::capture(request.profile, request.quests);

    Ok(Submission {
        payload,
        reward,
        before,
        persisted: false,
    })
}

impl Submission {
    pub fn payload(&self) -> &WorkoutSession {
        &self.payload
    }

    pub fn reward(&self) -> &Reward {
        &self.reward
    }

    pub fn before(&self) -> &Snapshot {
        &self.before
    }

    /// Whether the service has already accepted this workout
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Send the workout and classify the outcome.
    ///
    /// On error the submission is unchanged apart from remembering a
    /// successful persist, so calling this again retries the same payload.
    pub async fn submit<S>(&mut self, service: &S) -> Result<SubmissionReport>
    where
        S: WorkoutService + ?Sized,
    {
        if !self.persisted {
            tracing::info!(
                "Submitting workout {:?}: {} exercises, {} min, {} points, {} coins",
                self.payload.name,
                self.payload.exercises.len(),
                self.payload.duration,
                self.payload.points,
                self.payload.coins
            );
            if let Err(e) = service.persist_workout(&self.payload).await {
                tracing::warn!("Persist failed: {}", e);
                return Err(e);
            }
            self.persisted = true;
        } else {
            tracing::info!("Workout already persisted, refetching only");
        }

        // Independent of each other; both only need persist to have finished
        let (profile, quests) =
            futures::try_join!(service.fetch_profile(), service.fetch_quests())?;

        let after = Snapshot::capture(&profile, &quests);
        let outcome = detect(&self.before, &after);

        Ok(SubmissionReport {
            outcome,
            before: self.before.clone(),
            after,
            profile,
        })
    }
}
