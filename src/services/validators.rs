//! Request validation
//!
//! Each request type implements [`Validate`]. Rules run in full so the client
//! gets every problem in one response; the API layer answers 422 with the
//! collected notifications.

use uuid::Uuid;

use crate::domain::formats::{
    CPF_PATTERN, ONLY_LETTERS_PATTERN, STRONG_PASSWORD_PATTERNS, is_safe_for_sql_input,
    is_valid_cpf, is_valid_email, is_valid_phone_number,
};
use crate::domain::validation::{Rule, Validator};
use crate::domain::Notification;

pub const PASSWORD_RULE_MESSAGE: &str = "Password must be at least 12 characters long, have one uppercase letter, one lowercase letter and one digit, one special character.";

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<Notification>>;
}

pub(crate) fn person_name(v: &mut Validator, field: &str, value: &str) {
    v.text(value)
        .not_empty(&format!("{} is required.", field))
        .min_len(3, &format!("{} must have more than 2 characters.", field))
        .max_len(20, &format!("{} must be up to 20 characters.", field))
        .matches(
            &ONLY_LETTERS_PATTERN,
            &format!("{} contains invalid characters.", field),
        )
        .must(
            is_safe_for_sql_input,
            &format!("{} contains invalid characters.", field),
        );
}

pub(crate) fn cpf(v: &mut Validator, value: &str) {
    v.text(value)
        .not_empty("CPF is required.")
        .matches(&CPF_PATTERN, "CPF must be in the format XXX.XXX.XXX-XX.")
        .must(is_valid_cpf, "CPF must be valid.")
        .must(is_safe_for_sql_input, "CPF contains invalid characters.");
}

pub(crate) fn phone_number(v: &mut Validator, value: &str) {
    v.text(value)
        .not_empty("PhoneNumber is required.")
        .must(
            is_valid_phone_number,
            "PhoneNumber must be in the format: +CC (AA) 99999-9999",
        )
        .must(
            is_safe_for_sql_input,
            "PhoneNumber contains invalid characters.",
        );
}

pub(crate) fn email(v: &mut Validator, value: &str) {
    v.text(value)
        .not_empty("Email is required.")
        .must(is_valid_email, "Email is not a valid email address.")
        .must(is_safe_for_sql_input, "Email contains invalid characters.");
}

pub(crate) fn new_password(v: &mut Validator, value: &str) {
    v.text(value)
        .not_empty("Password is required.")
        .matches_all(&*STRONG_PASSWORD_PATTERNS, PASSWORD_RULE_MESSAGE)
        .max_len(20, "Password must be up to 20 characters.")
        .must(is_safe_for_sql_input, "Password contains invalid characters.");
}

/// An optional id sent as text: must parse and must not be the nil id.
pub(crate) fn optional_id(v: &mut Validator, field: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };

    let parsed = Uuid::parse_str(value.trim()).ok();
    v.must(
        parsed.is_some_and(|id| !id.is_nil()),
        &format!("{} must be a valid Guid when provided.", field),
    );
    v.must(
        is_safe_for_sql_input(value),
        &format!("{} contains invalid characters.", field),
    );
}

pub(crate) fn optional_search(v: &mut Validator, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };

    v.must(
        !value.trim().is_empty(),
        "If provided, Search needs to be a valid string.",
    );
    v.must(
        is_safe_for_sql_input(value),
        "Search contains invalid characters.",
    );
}

pub(crate) fn measure(v: &mut Validator, field: &str, value: Option<f32>) {
    if let Some(value) = value {
        v.must(
            value.is_finite() && !value.is_sign_negative(),
            &format!("{} must be a valid positive number when provided.", field),
        );
    }
}

pub(crate) fn positive_count(v: &mut Validator, field: &str, value: i32) {
    v.check(
        value > 0,
        Rule::GreaterThan,
        &format!("{} must be a positive integer.", field),
    );
}

/// Parses an id that already passed [`optional_id`].
pub(crate) fn parse_optional_id(value: Option<&str>) -> Option<Uuid> {
    value.and_then(|v| Uuid::parse_str(v.trim()).ok())
}

/// Normalizes an optional query string: blank becomes `None`.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
