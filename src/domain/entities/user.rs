use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{SelfValidating, non_blank, valid_measure};
use crate::domain::enums::{Gender, HeightUnit, UserType, WeightUnit};
use crate::domain::formats::{
    CPF_PATTERN, ONLY_LETTERS_PATTERN, is_hashed_password, is_valid_cpf, is_valid_email,
    is_valid_phone_number,
};
use crate::domain::notification::{Notification, NotificationContext};
use crate::domain::validation::Validator;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    pub user_type: UserType,
    pub gender: Option<Gender>,
    pub height_unit: Option<HeightUnit>,
    pub weight_unit: Option<WeightUnit>,
    pub teacher_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    pub password: String,
    pub search_text: String,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub(crate) notifications: NotificationContext,
}

/// Input for [`User::create`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_type: UserType,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub phone_number: String,
    pub email: String,
    pub password_hash: String,
    pub teacher_id: Option<Uuid>,
}

/// Partial profile update. `None` and blank strings keep the current value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
    pub height_unit: Option<HeightUnit>,
    pub weight_unit: Option<WeightUnit>,
    pub teacher_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub cpf: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub height: Option<f32>,
    pub weight: Option<f32>,
}

impl User {
    pub fn create(new: NewUser) -> Self {
        let now = Utc::now();
        let mut user = Self {
            id: Uuid::new_v4(),
            created_at_utc: now,
            updated_at_utc: now,
            user_type: new.user_type,
            gender: Some(Gender::Undefined),
            height_unit: Some(HeightUnit::Centimeters),
            weight_unit: Some(WeightUnit::Kilograms),
            teacher_id: new.teacher_id,
            first_name: new.first_name,
            last_name: new.last_name,
            cpf: new.cpf,
            phone_number: new.phone_number,
            email: new.email,
            password: new.password_hash,
            search_text: String::new(),
            height: None,
            weight: None,
            notifications: NotificationContext::new(),
        };
        user.refresh_search_text();
        user.validate();
        user
    }

    pub fn update(&mut self, changes: UserChanges) {
        if let Some(user_type) = changes.user_type {
            self.user_type = user_type;
        }
        if changes.gender.is_some() {
            self.gender = changes.gender;
        }
        if changes.height_unit.is_some() {
            self.height_unit = changes.height_unit;
        }
        if changes.weight_unit.is_some() {
            self.weight_unit = changes.weight_unit;
        }
        if changes.teacher_id.is_some() {
            self.teacher_id = changes.teacher_id;
        }
        if let Some(first_name) = non_blank(changes.first_name) {
            self.first_name = first_name;
        }
        if let Some(last_name) = non_blank(changes.last_name) {
            self.last_name = last_name;
        }
        if let Some(cpf) = non_blank(changes.cpf) {
            self.cpf = cpf;
        }
        if let Some(phone_number) = non_blank(changes.phone_number) {
            self.phone_number = phone_number;
        }
        if let Some(email) = non_blank(changes.email) {
            self.email = email;
        }
        if changes.height.is_some() {
            self.height = changes.height;
        }
        if changes.weight.is_some() {
            self.weight = changes.weight;
        }

        self.updated_at_utc = Utc::now();
        self.refresh_search_text();
        self.validate();
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn refresh_search_text(&mut self) {
        self.search_text = format!(
            "{} {} {} {} {}",
            self.first_name, self.last_name, self.cpf, self.phone_number, self.email
        );
    }
}

impl SelfValidating for User {
    fn validate(&mut self) -> bool {
        let mut v = Validator::new();

        v.must(
            self.teacher_id.is_none_or(|id| !id.is_nil()),
            "TeacherId must be a valid Guid when provided.",
        );

        v.text(&self.first_name)
            .not_empty("FirstName is required.")
            .min_len(3, "FirstName must have more than 2 characters.")
            .max_len(20, "FirstName must be up to 20 characters.")
            .matches(&ONLY_LETTERS_PATTERN, "FirstName contains invalid characters.");

        v.text(&self.last_name)
            .not_empty("LastName is required.")
            .min_len(3, "LastName must have more than 2 characters.")
            .max_len(20, "LastName must be up to 20 characters.")
            .matches(&ONLY_LETTERS_PATTERN, "LastName contains invalid characters.");

        v.text(&self.cpf)
            .not_empty("CPF is required.")
            .matches(&CPF_PATTERN, "CPF must be in the format XXX.XXX.XXX-XX.")
            .must(is_valid_cpf, "CPF must be valid.");

        v.text(&self.phone_number)
            .not_empty("PhoneNumber is required.")
            .must(
                is_valid_phone_number,
                "PhoneNumber must be in the format: +CC (AA) 99999-9999.",
            );

        v.text(&self.email)
            .not_empty("Email is required.")
            .must(is_valid_email, "Email is not a valid email address.");

        v.text(&self.password)
            .not_empty("Password is required.")
            .must(is_hashed_password, "Password must be stored in hash.");

        v.must(
            valid_measure(self.height),
            "Height must be a valid positive number when provided.",
        );
        v.must(
            valid_measure(self.weight),
            "Weight must be a valid positive number when provided.",
        );

        self.notifications = v.into_context();
        self.is_valid()
    }

    fn notifications(&self) -> &[Notification] {
        self.notifications.notifications()
    }
}
