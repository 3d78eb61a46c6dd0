//! HTTP error responses
//!
//! Failures that are not business notifications leave the API as RFC 7807
//! problem details (`application/problem+json`).

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::DomainError;

const BAD_REQUEST_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.5.1";
const UNAUTHORIZED_TYPE: &str = "https://tools.ietf.org/html/rfc7235#section-3.1";
const INTERNAL_TYPE: &str = "https://tools.ietf.org/html/rfc7231#section-6.6.1";

const INTERNAL_DETAIL: &str =
    "An unexpected error occurred. Please contact the development team";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, with optional per-field messages
    #[error("validation failed: {detail}")]
    Validation {
        detail: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
            errors: BTreeMap::new(),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn problem(&self) -> ProblemDetails {
        let status = self.http_status().as_u16();
        match self {
            ApiError::Validation { detail, errors } => ProblemDetails {
                problem_type: BAD_REQUEST_TYPE,
                title: "Validation Error",
                status,
                detail: detail.clone(),
                errors: (!errors.is_empty()).then(|| errors.clone()),
            },
            ApiError::InvalidArgument(detail) => ProblemDetails {
                problem_type: BAD_REQUEST_TYPE,
                title: "Invalid Argument",
                status,
                detail: detail.clone(),
                errors: None,
            },
            ApiError::Unauthorized(_) => ProblemDetails {
                problem_type: UNAUTHORIZED_TYPE,
                title: "Not Authorized",
                status,
                detail: "You do not have permission to access this resource".to_string(),
                errors: None,
            },
            ApiError::Internal(_) => ProblemDetails {
                problem_type: INTERNAL_TYPE,
                title: "Internal Server Error",
                status,
                detail: INTERNAL_DETAIL.to_string(),
                errors: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(_) => tracing::error!("{}", self),
            ApiError::Unauthorized(_) => tracing::debug!("{}", self),
            _ => tracing::warn!("{}", self),
        }

        let status = self.http_status();
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.problem()),
        )
            .into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            DomainError::Security(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Turns a panic caught by `CatchPanicLayer` into a 500 problem response.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let problem = ApiError::Internal("db exploded".to_string()).problem();

        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "Internal Server Error");
        assert!(!problem.detail.contains("db exploded"));
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), vec!["invalid".to_string()]);

        let problem = ApiError::Validation {
            detail: "One or more validation errors occurred.".to_string(),
            errors,
        }
        .problem();

        assert_eq!(problem.status, 400);
        let body = serde_json::to_value(&problem).unwrap();
        assert_eq!(body["type"], BAD_REQUEST_TYPE);
        assert_eq!(body["errors"]["email"][0], "invalid");
    }

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(DomainError::InvalidArgument("x".into())).http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::Database("x".into())).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
