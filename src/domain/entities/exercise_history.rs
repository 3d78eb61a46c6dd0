use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SelfValidating;
use crate::domain::enums::WeightUnit;
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

/// One performed set of an exercise, as logged by the athlete.
#[derive(Debug, Clone)]
pub struct ExerciseHistory {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub created_by: Uuid,
    pub exercise_id: Uuid,
    pub weight_unit: WeightUnit,
    /// Position of the set within the session, starting at 1.
    pub set: i32,
    pub reps: i32,
    pub weight: f32,
    pub(crate) notifications: NotificationContext,
}

impl ExerciseHistory {
    pub fn create(
        created_by: Uuid,
        exercise_id: Uuid,
        weight_unit: WeightUnit,
        set: i32,
        reps: i32,
        weight: f32,
    ) -> Self {
        let now = Utc::now();
        let mut history = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            created_by,
            exercise_id,
            weight_unit,
            set,
            reps,
            weight,
            notifications: NotificationContext::new(),
        };
        history.validate();
        history
    }
}

impl SelfValidating for ExerciseHistory {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(!self.created_by.is_nil(), "CreatedBy must be a valid Guid.");
        v.must(!self.exercise_id.is_nil(), "ExerciseId must be a valid Guid.");
        v.must(self.set >= 0, "Set must be a valid positive integer.");
        v.must(self.reps >= 0, "Reps must be a valid positive integer.");
        v.must(
            self.weight.is_finite() && !self.weight.is_sign_negative(),
            "Weight must be a valid positive number.",
        );

        self.notifications = v.into_context();
        self.is_valid()
    }

    fn notifications(&self) -> &[Notification] {
        self.notifications.notifications()
    }
}
