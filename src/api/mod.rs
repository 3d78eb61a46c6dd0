//! HTTP API
//!
//! Controllers translate requests into service requests and hand them to the
//! mediator. Everything except registration, login, token refresh and the
//! health probes requires a bearer token.

pub mod auth;
pub mod error;
pub mod exercise;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod respond;
pub mod user;
pub mod workout;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};

use crate::infrastructure::AppState;

pub use error::ApiError;

/// Routes mounted under `/api`.
pub fn api_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token));

    let protected = Router::new()
        .route("/users", get(user::list_users).patch(user::update_user))
        .route("/users/self", get(user::get_self))
        .route(
            "/workouts",
            get(workout::list_workouts).post(workout::create_workout),
        )
        .route(
            "/workouts/:id",
            patch(workout::update_workout).delete(workout::delete_workout),
        )
        .route("/exercises", get(exercise::list_exercises))
        .route("/musclegroups", get(exercise::list_muscle_groups))
        .route_layer(from_fn(middleware::notification_filter))
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate));

    public.merge(protected).with_state(state)
}

/// Liveness and readiness probes mounted at the root.
pub fn health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/startup", get(health::startup))
        .route("/health/liveness", get(health::liveness))
        .with_state(state)
}
