//! Request middleware
//!
//! `authenticate` guards every protected route. `notification_filter` runs
//! after it and stops requests that already carry notifications.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::ApiError;
use crate::domain::NotificationContext;
use crate::domain::notification::keys;
use crate::infrastructure::AppState;

const BEARER_PREFIX: &str = "Bearer ";

pub(crate) const INVALID_SUBJECT: &str = "Unable to get user Id from request token.";

/// Validates the bearer token and stores its claims on the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state
        .tokens
        .validate(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    if claims.user_id().is_none() {
        tracing::warn!("Token subject '{}' is not a user id", claims.sub);
        let mut notifications = NotificationContext::new();
        notifications.add(keys::OPERATION, INVALID_SUBJECT);
        req.extensions_mut().insert(notifications);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Answers 400 with the pending notifications instead of running the handler.
pub async fn notification_filter(req: Request, next: Next) -> Response {
    if let Some(context) = req.extensions().get::<NotificationContext>()
        && context.has_notifications()
    {
        let notifications = context.notifications().to_vec();
        return (StatusCode::BAD_REQUEST, Json(notifications)).into_response();
    }

    next.run(req).await
}
