use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::SelfValidating;
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

#[derive(Debug, Clone)]
pub struct MuscleGroup {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub name: String,
    pub(crate) notifications: NotificationContext,
}

impl MuscleGroup {
    pub fn create(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut group = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            name: name.into(),
            notifications: NotificationContext::new(),
        };
        group.validate();
        group
    }
}

impl SelfValidating for MuscleGroup {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();
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
