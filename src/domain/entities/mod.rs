//! Aggregates of the training domain
//!
//! Entities validate themselves on creation and after every mutation and keep
//! the resulting notifications, so a handler can check `is_valid()` before
//! persisting anything.

pub mod exercise;
pub mod exercise_history;
pub mod muscle_group;
pub mod refresh_token;
pub mod user;
pub mod workout;
pub mod workout_exercise;
pub mod workout_history;

pub use exercise::Exercise;
pub use exercise_history::ExerciseHistory;
pub use muscle_group::MuscleGroup;
pub use refresh_token::RefreshToken;
pub use user::{NewUser, User, UserChanges};
pub use workout::{Workout, WorkoutChanges};
pub use workout_exercise::{WorkoutExercise, WorkoutExerciseChanges};
pub use workout_history::WorkoutHistory;

use uuid::Uuid;

use super::notification::Notification;

pub trait SelfValidating {
    /// Re-runs the entity rules, replacing any previous notifications.
    fn validate(&mut self) -> bool;

    fn notifications(&self) -> &[Notification];

    fn is_valid(&self) -> bool {
        self.notifications().is_empty()
    }
}

pub(crate) fn all_valid_ids(ids: &[Uuid]) -> bool {
    !ids.is_empty() && ids.iter().all(|id| !id.is_nil())
}

/// Appends the ids of `incoming` that `target` does not hold yet, keeping order.
pub(crate) fn append_missing(target: &mut Vec<Uuid>, incoming: impl IntoIterator<Item = Uuid>) {
    for id in incoming {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

/// Treats blank strings like an absent value.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn valid_measure(value: Option<f32>) -> bool {
    value.is_none_or(|v| v.is_finite() && !v.is_sign_negative())
}
