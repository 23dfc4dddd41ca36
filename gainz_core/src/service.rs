//! Contract the engine needs from the remote workout service.

use crate::{Profile, Quest, Result, WorkoutSession};
use async_trait::async_trait;

/// Remote operations used by the submission flow.
///
/// Implementations map transport failures to [`crate::Error::Service`] so
/// callers can offer a retry with the same payload.
#[async_trait]
pub trait WorkoutService: Send + Sync {
    /// Record a finished workout
    async fn persist_workout(&self, session: &WorkoutSession) -> Result<()>;

    /// Current level and stats
    async fn fetch_profile(&self) -> Result<Profile>;

    /// Current quest list
    async fn fetch_quests(&self) -> Result<Vec<Quest>>;
}
