//! Registration, login and token refresh. These routes are public.

use axum::{extract::State, http::StatusCode, response::Response};

use super::extract::ApiJson;
use super::respond::dispatch;
use crate::services::{LoginRequest, Mediator, RefreshTokenRequest, RegisterRequest};

pub async fn register(
    State(mediator): State<Mediator>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Response {
    tracing::info!("Registration attempt for {}", payload.email);
    dispatch(&mediator, payload, StatusCode::CREATED).await
}

pub async fn login(
    State(mediator): State<Mediator>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Response {
    tracing::info!("Login attempt for {}", payload.email);
    dispatch(&mediator, payload, StatusCode::OK).await
}

pub async fn refresh_token(
    State(mediator): State<Mediator>,
    ApiJson(payload): ApiJson<RefreshTokenRequest>,
) -> Response {
    dispatch(&mediator, payload, StatusCode::OK).await
}
