//! Repository implementations using SeaORM
//!
//! Every repository borrows a connection: either the pooled
//! `DatabaseConnection` or an open `DatabaseTransaction`, so the same code
//! serves plain reads and unit-of-work writes.

pub mod exercise_history_repository;
pub mod exercise_repository;
pub mod muscle_group_repository;
pub mod refresh_token_repository;
pub mod user_repository;
pub mod workout_exercise_repository;
pub mod workout_history_repository;
pub mod workout_repository;

pub use exercise_history_repository::SeaOrmExerciseHistoryRepository;
pub use exercise_repository::SeaOrmExerciseRepository;
pub use muscle_group_repository::SeaOrmMuscleGroupRepository;
pub use refresh_token_repository::SeaOrmRefreshTokenRepository;
pub use user_repository::SeaOrmUserRepository;
pub use workout_exercise_repository::SeaOrmWorkoutExerciseRepository;
pub use workout_history_repository::SeaOrmWorkoutHistoryRepository;
pub use workout_repository::SeaOrmWorkoutRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::DbErr;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

const ID_SEPARATOR: char = ';';

pub(crate) fn parse_id(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Corrupt(format!("invalid id '{}': {}", value, e)))
}

pub(crate) fn parse_optional_id(value: Option<&str>) -> Result<Option<Uuid>, DomainError> {
    value.map(parse_id).transpose()
}

pub(crate) fn ids_to_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

/// Serializes an id list into its `;`-separated column form.
pub(crate) fn join_ids(ids: &[Uuid]) -> String {
    ids_to_strings(ids).join(&ID_SEPARATOR.to_string())
}

pub(crate) fn split_ids(value: &str) -> Result<Vec<Uuid>, DomainError> {
    value
        .split(ID_SEPARATOR)
        .filter(|part| !part.is_empty())
        .map(parse_id)
        .collect()
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Corrupt(format!("invalid timestamp '{}': {}", value, e)))
}

pub(crate) fn parse_name<T>(value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse()
}

pub(crate) fn parse_optional_name<T>(value: Option<&str>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    value.map(parse_name).transpose()
}

/// Maps the error of an update that matched no row to `NotFound`.
pub(crate) fn update_result<T>(result: Result<T, DbErr>) -> Result<(), DomainError> {
    match result {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotUpdated) => Err(DomainError::NotFound),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_lists_use_semicolons() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let joined = join_ids(&[a, b]);
        assert_eq!(joined, format!("{};{}", a, b));
        assert_eq!(split_ids(&joined).unwrap(), vec![a, b]);
        assert!(split_ids("").unwrap().is_empty());
        assert!(split_ids("not-a-uuid").is_err());
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let now = Utc::now();
        let text = format_timestamp(&now);

        assert!(text.ends_with('Z'));
        assert_eq!(text.len(), "2024-01-01T00:00:00.000000Z".len());
        assert_eq!(
            parse_timestamp(&text).unwrap().timestamp_micros(),
            now.timestamp_micros()
        );
    }
}
