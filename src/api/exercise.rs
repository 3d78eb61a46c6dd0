use axum::{extract::State, response::Response};

use super::extract::{ApiQuery, AuthUser};
use super::respond::dispatch_list;
use crate::services::{FindExercisesRequest, FindMuscleGroupsRequest, Mediator};

pub async fn list_exercises(
    State(mediator): State<Mediator>,
    AuthUser(_): AuthUser,
    ApiQuery(query): ApiQuery<FindExercisesRequest>,
) -> Response {
    dispatch_list(&mediator, query).await
}

pub async fn list_muscle_groups(
    State(mediator): State<Mediator>,
    AuthUser(_): AuthUser,
) -> Response {
    dispatch_list(&mediator, FindMuscleGroupsRequest).await
}
