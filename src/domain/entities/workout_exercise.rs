use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SelfValidating;
use crate::domain::enums::WeightUnit;
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

/// One exercise prescription inside a workout: which exercise, how many
/// sets and reps, and with how much load.
#[derive(Debug, Clone)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub exercise_id: Uuid,
    /// Copy of the catalogue name taken when the prescription was made.
    pub exercise_name: String,
    pub weight_unit: WeightUnit,
    pub sets: i32,
    pub reps: i32,
    pub weight: f32,
    pub(crate) notifications: NotificationContext,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutExerciseChanges {
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f32>,
    pub weight_unit: Option<WeightUnit>,
}

impl WorkoutExercise {
    pub fn create(
        created_by: Uuid,
        exercise_id: Uuid,
        exercise_name: impl Into<String>,
        sets: i32,
        reps: i32,
        weight: f32,
        weight_unit: WeightUnit,
    ) -> Self {
        let now = Utc::now();
        let mut workout_exercise = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            created_by,
            updated_by: created_by,
            exercise_id,
            exercise_name: exercise_name.into(),
            weight_unit,
            sets,
            reps,
            weight,
            notifications: NotificationContext::new(),
        };
        workout_exercise.validate();
        workout_exercise
    }

    pub fn update(&mut self, updated_by: Uuid, changes: WorkoutExerciseChanges) {
        if let Some(sets) = changes.sets {
            self.sets = sets;
        }
        if let Some(reps) = changes.reps {
            self.reps = reps;
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(weight_unit) = changes.weight_unit {
            self.weight_unit = weight_unit;
        }

        self.updated_by = updated_by;
        self.updated_at_utc = Utc::now();
        self.validate();
    }
}

impl SelfValidating for WorkoutExercise {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(!self.created_by.is_nil(), "CreatedBy must be a valid Guid.");
        v.must(!self.updated_by.is_nil(), "UpdatedBy must be a valid Guid.");
        v.must(!self.exercise_id.is_nil(), "ExerciseId must be a valid Guid.");
        v.must(self.sets >= 0, "Sets must be a valid positive integer.");
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
