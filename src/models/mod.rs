//! SeaORM table models
//!
//! Ids are stored as hyphenated UUID text and timestamps as RFC 3339 text.

pub mod exercise_history;
pub mod exercises;
pub mod muscle_groups;
pub mod refresh_tokens;
pub mod users;
pub mod workout_exercises;
pub mod workout_history;
pub mod workouts;
