use serde::Serialize;

use crate::domain::Notification;

/// Envelope returned by every request handler and sent as the JSON body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub successful: bool,
    pub data: Option<T>,
    pub errors: Option<Vec<Notification>>,
}

impl<T> ServiceResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            successful: true,
            data: Some(data),
            errors: None,
        }
    }

    pub fn failure(errors: impl IntoIterator<Item = Notification>) -> Self {
        Self {
            successful: false,
            data: None,
            errors: Some(errors.into_iter().collect()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure([Notification::not_found(message)])
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::failure([Notification::operation(message)])
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::failure([Notification::forbidden(message)])
    }

    pub fn notifications(&self) -> &[Notification] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Re-types a failure so it can be returned from a handler with another
    /// output type. The data of a successful response is dropped.
    pub fn cast<U>(self) -> ServiceResponse<U> {
        ServiceResponse {
            successful: self.successful,
            data: None,
            errors: self.errors,
        }
    }
}
