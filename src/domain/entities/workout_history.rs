use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{SelfValidating, all_valid_ids};
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

/// A completed session of a workout, pointing at the workout exercises
/// that were performed.
#[derive(Debug, Clone)]
pub struct WorkoutHistory {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub created_by: Uuid,
    pub workout_id: Uuid,
    pub workout_exercise_ids: Vec<Uuid>,
    pub(crate) notifications: NotificationContext,
}

impl WorkoutHistory {
    pub fn create(created_by: Uuid, workout_id: Uuid, workout_exercise_ids: Vec<Uuid>) -> Self {
        let now = Utc::now();
        let mut history = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            created_by,
            workout_id,
            workout_exercise_ids,
            notifications: NotificationContext::new(),
        };
        history.validate();
        history
    }
}

impl SelfValidating for WorkoutHistory {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(!self.created_by.is_nil(), "CreatedBy must be a valid Guid.");
        v.must(
            all_valid_ids(&self.workout_exercise_ids),
            "WorkoutExercisesId must be a valid list of Guids.",
        );
        v.must(!self.workout_id.is_nil(), "WorkoutId must be a valid Guid.");

        self.notifications = v.into_context();
        self.is_valid()
    }

    fn notifications(&self) -> &[Notification] {
        self.notifications.notifications()
    }
}
