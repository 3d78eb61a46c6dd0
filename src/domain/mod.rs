//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM, no Axum).
//! Entities, validation rules, repository contracts and domain error types.

pub mod entities;
pub mod enums;
pub mod errors;
pub mod formats;
pub mod notification;
pub mod repositories;
pub mod validation;

pub use entities::*;
pub use enums::*;
pub use errors::DomainError;
pub use notification::{Notification, NotificationContext};
pub use repositories::*;
