use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{SelfValidating, all_valid_ids, append_missing, non_blank};
use crate::domain::enums::DayOfWeek;
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

/// A named training session scheduled on a weekday, made of workout
/// exercises and shared with one or more users.
#[derive(Debug, Clone)]
pub struct Workout {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub name: String,
    pub day_of_week: DayOfWeek,
    pub workout_exercise_ids: Vec<Uuid>,
    pub created_for_user_ids: Vec<Uuid>,
    pub(crate) notifications: NotificationContext,
}

/// Partial workout update. Id lists are appended, never replaced.
#[derive(Debug, Clone, Default)]
pub struct WorkoutChanges {
    pub name: Option<String>,
    pub day_of_week: Option<DayOfWeek>,
    pub workout_exercise_ids: Option<Vec<Uuid>>,
    pub created_for_user_ids: Option<Vec<Uuid>>,
}

impl Workout {
    pub fn create(
        created_by: Uuid,
        name: impl Into<String>,
        day_of_week: DayOfWeek,
        workout_exercise_ids: Vec<Uuid>,
        created_for_user_ids: Vec<Uuid>,
    ) -> Self {
        let now = Utc::now();
        let mut workout = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            created_by,
            updated_by: created_by,
            name: name.into(),
            day_of_week,
            workout_exercise_ids,
            created_for_user_ids,
            notifications: NotificationContext::new(),
        };
        workout.validate();
        workout
    }

    pub fn update(&mut self, updated_by: Uuid, changes: WorkoutChanges) {
        if let Some(ids) = changes.workout_exercise_ids {
            append_missing(&mut self.workout_exercise_ids, ids);
        }
        if let Some(ids) = changes.created_for_user_ids {
            append_missing(&mut self.created_for_user_ids, ids);
        }
        if let Some(name) = non_blank(changes.name) {
            self.name = name;
        }
        if let Some(day_of_week) = changes.day_of_week {
            self.day_of_week = day_of_week;
        }

        self.touch(updated_by);
    }

    /// Stops sharing the workout with `user_id`. Returns whether the user had access.
    pub fn remove_user(&mut self, updated_by: Uuid, user_id: Uuid) -> bool {
        let before = self.created_for_user_ids.len();
        self.created_for_user_ids.retain(|id| *id != user_id);
        let removed = self.created_for_user_ids.len() != before;
        if removed {
            self.touch(updated_by);
        }
        removed
    }

    pub fn remove_workout_exercises(&mut self, updated_by: Uuid, ids: &[Uuid]) {
        self.workout_exercise_ids.retain(|id| !ids.contains(id));
        self.touch(updated_by);
    }

    pub fn is_shared_with(&self, user_id: Uuid) -> bool {
        self.created_for_user_ids.contains(&user_id)
    }

    pub fn is_visible_to(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.is_shared_with(user_id)
    }

    fn touch(&mut self, updated_by: Uuid) {
        self.updated_by = updated_by;
        self.updated_at_utc = Utc::now();
        self.validate();
    }
}

impl SelfValidating for Workout {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(!self.created_by.is_nil(), "CreatedBy must be a valid Guid.");
        v.must(
            all_valid_ids(&self.workout_exercise_ids),
            "WorkoutExerciseIds must be a valid list of Guids.",
        );
        v.must(
            all_valid_ids(&self.created_for_user_ids),
            "CreatedForUserIds must be a valid list of Guids.",
        );

        v.text(&self.name)
            .not_empty("Name is required.")
            .min_len(3, "Name must have more than 2 characters.")
            .max_len(30, "Name must be up to 30 characters.");

        self.notifications = v.into_context();
        self.is_valid()
    }

    fn notifications(&self) -> &[Notification] {
        self.notifications.notifications()
    }
}
