//! Extractors that reject in the API's own response formats

use axum::{
    Json,
    async_trait,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::Claims;
use crate::domain::Notification;
use crate::services::ServiceResponse;

/// JSON body. Malformed JSON is a 400 problem; JSON that does not fit the
/// request type is a 422 failure envelope.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(JsonRejection::JsonDataError(e)) => {
                Err(unprocessable("Body", e.body_text()))
            }
            Err(rejection) => Err(ApiError::validation(rejection.body_text()).into_response()),
        }
    }
}

/// Query string, rejected with a 422 failure envelope.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(|e: QueryRejection| unprocessable("Query", e.body_text()))
    }
}

/// Id of the user named by the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .and_then(Claims::user_id)
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("no authenticated user on request".to_string()))
    }
}

pub(crate) fn unprocessable(key: &str, message: String) -> Response {
    let body = ServiceResponse::<()>::failure([Notification::new(key, message)]);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}
