use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{SelfValidating, all_valid_ids};
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

/// Catalogue entry a workout exercise points at.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub name: String,
    pub muscle_group_ids: Vec<Uuid>,
    pub(crate) notifications: NotificationContext,
}

impl Exercise {
    pub fn create(name: impl Into<String>, muscle_group_ids: Vec<Uuid>) -> Self {
        let now = Utc::now();
        let mut exercise = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            name: name.into(),
            muscle_group_ids,
            notifications: NotificationContext::new(),
        };
        exercise.validate();
        exercise
    }

    pub fn targets(&self, muscle_group_id: Uuid) -> bool {
        self.muscle_group_ids.contains(&muscle_group_id)
    }
}

impl SelfValidating for Exercise {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(
            all_valid_ids(&self.muscle_group_ids),
            "MuscleGroupIds must be a valid list of Guids.",
        );

        v.text(&self.name)
            .not_empty("Name is required.")
            .min_len(3, "Name must have more than 2 characters.")
            .max_len(50, "Name must be up to 50 characters.");

        self.notifications = v.into_context();
        self.is_valid()
    }

    fn notifications(&self) -> &[Notification] {
        self.notifications.notifications()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_at_least_one_muscle_group() {
        let exercise = Exercise::create("Bench Press", vec![]);
        assert!(!exercise.is_valid());

        let exercise = Exercise::create("Bench Press", vec![Uuid::nil()]);
        assert!(!exercise.is_valid());

        let exercise = Exercise::create("Bench Press", vec![Uuid::new_v4()]);
        assert!(exercise.is_valid());
    }

    #[test]
    fn name_length_bounds() {
        let group = vec![Uuid::new_v4()];
        assert!(!Exercise::create("Up", group.clone()).is_valid());
        assert!(!Exercise::create("x".repeat(51), group.clone()).is_valid());
        assert!(Exercise::create("x".repeat(50), group).is_valid());
    }
}
