use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DomainError;

/// Opaque single-use token that lets a client obtain a new access token.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub expires: DateTime<Utc>,
    pub is_revoked: bool,
    pub is_used: bool,
}

impl RefreshToken {
    pub fn new(
        user_id: Uuid,
        token: impl Into<String>,
        expires: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let token = token.into();

        if token.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "Token cannot be null or empty.".to_string(),
            ));
        }
        if user_id.is_nil() {
            return Err(DomainError::InvalidArgument(
                "UserId cannot be empty.".to_string(),
            ));
        }
        if expires <= Utc::now() {
            return Err(DomainError::InvalidArgument(
                "Expiration date must be in the future.".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            token,
            expires,
            is_revoked: false,
            is_used: false,
        })
    }

    pub fn revoke(&mut self) {
        self.is_revoked = true;
    }

    pub fn mark_used(&mut self) {
        self.is_used = true;
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires
    }

    pub fn is_valid(&self) -> bool {
        !self.is_revoked && !self.is_used && !self.is_expired()
    }
}
