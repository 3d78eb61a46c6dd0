//! Mapping of handler outcomes to HTTP responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::ApiError;
use crate::domain::notification::keys;
use crate::services::{Mediator, Request, ServiceResponse, Validate};

/// Validates the request, sends it and answers with `success` on success.
/// A successful body is the bare data; failures keep the envelope.
pub async fn dispatch<R>(mediator: &Mediator, request: R, success: StatusCode) -> Response
where
    R: Request + Validate,
    R::Output: Serialize,
{
    match send(mediator, request).await {
        Ok(response) if response.successful => (success, Json(response.data)).into_response(),
        Ok(response) => failure(response),
        Err(rejection) => rejection,
    }
}

/// Like [`dispatch`], answering 204 when the list is empty.
pub async fn dispatch_list<R, T>(mediator: &Mediator, request: R) -> Response
where
    R: Request<Output = Vec<T>> + Validate,
    T: Serialize + Send + 'static,
{
    match send(mediator, request).await {
        Ok(response) if response.successful => {
            match response.data {
                Some(items) if !items.is_empty() => (StatusCode::OK, Json(items)).into_response(),
                _ => StatusCode::NO_CONTENT.into_response(),
            }
        }
        Ok(response) => failure(response),
        Err(rejection) => rejection,
    }
}

/// Like [`dispatch`], answering 204 without a body on success.
pub async fn dispatch_empty<R>(mediator: &Mediator, request: R) -> Response
where
    R: Request + Validate,
    R::Output: Serialize,
{
    match send(mediator, request).await {
        Ok(response) if response.successful => StatusCode::NO_CONTENT.into_response(),
        Ok(response) => failure(response),
        Err(rejection) => rejection,
    }
}

async fn send<R>(mediator: &Mediator, request: R) -> Result<ServiceResponse<R::Output>, Response>
where
    R: Request + Validate,
{
    if let Err(errors) = request.validate() {
        let body = ServiceResponse::<()>::failure(errors);
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    mediator
        .send(request)
        .await
        .map_err(|e| ApiError::from(e).into_response())
}

pub(crate) fn failure_status<T>(response: &ServiceResponse<T>) -> StatusCode {
    let notifications = response.notifications();
    if notifications.iter().any(|n| n.is(keys::NOT_FOUND)) {
        StatusCode::NOT_FOUND
    } else if notifications.iter().any(|n| n.is(keys::FORBIDDEN)) {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::BAD_REQUEST
    }
}

fn failure<T: Serialize>(response: ServiceResponse<T>) -> Response {
    (failure_status(&response), Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Notification;

    #[test]
    fn not_found_wins_over_forbidden() {
        let response = ServiceResponse::<()>::failure([
            Notification::forbidden("Only the creator of the workout can change it."),
            Notification::not_found("Workout not found with provided in request."),
        ]);
        assert_eq!(failure_status(&response), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_failures_are_bad_requests() {
        let response = ServiceResponse::<()>::operation("Workout creation attempt failed.");
        assert_eq!(failure_status(&response), StatusCode::BAD_REQUEST);

        let response = ServiceResponse::<()>::forbidden("Only the creator of the workout can change it.");
        assert_eq!(failure_status(&response), StatusCode::FORBIDDEN);
    }
}
