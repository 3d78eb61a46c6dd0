use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use uuid::Uuid;

use super::extract::{ApiJson, ApiQuery, AuthUser, unprocessable};
use super::respond::{dispatch, dispatch_empty, dispatch_list};
use crate::services::{
    CreateWorkoutRequest, DeleteWorkoutRequest, FindWorkoutsRequest, Mediator,
    UpdateWorkoutRequest,
};

pub async fn list_workouts(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    ApiQuery(mut query): ApiQuery<FindWorkoutsRequest>,
) -> Response {
    query.requested_by = user_id;
    dispatch_list(&mediator, query).await
}

pub async fn create_workout(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    ApiJson(mut payload): ApiJson<CreateWorkoutRequest>,
) -> Response {
    payload.requested_by = user_id;
    dispatch(&mediator, payload, StatusCode::CREATED).await
}

pub async fn update_workout(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(mut payload): ApiJson<UpdateWorkoutRequest>,
) -> Response {
    let Some(id) = workout_id(&id) else {
        return invalid_workout_id();
    };

    payload.id = id;
    payload.requested_by = user_id;
    dispatch(&mediator, payload, StatusCode::OK).await
}

pub async fn delete_workout(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = workout_id(&id) else {
        return invalid_workout_id();
    };

    let request = DeleteWorkoutRequest {
        id,
        requested_by: user_id,
    };
    dispatch_empty(&mediator, request).await
}

fn workout_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok().filter(|id| !id.is_nil())
}

fn invalid_workout_id() -> Response {
    unprocessable("WorkoutId", "WorkoutId must be a valid Guid.".to_string())
}
