use axum::{extract::State, http::StatusCode, response::Response};

use super::extract::{ApiJson, ApiQuery, AuthUser};
use super::respond::{dispatch, dispatch_list};
use crate::services::{FindSelfRequest, FindUsersRequest, Mediator, UpdateUserRequest};

pub async fn list_users(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    ApiQuery(mut query): ApiQuery<FindUsersRequest>,
) -> Response {
    query.requested_by = user_id;
    dispatch_list(&mediator, query).await
}

pub async fn get_self(State(mediator): State<Mediator>, AuthUser(user_id): AuthUser) -> Response {
    let request = FindSelfRequest {
        requested_by: user_id,
    };
    dispatch(&mediator, request, StatusCode::OK).await
}

pub async fn update_user(
    State(mediator): State<Mediator>,
    AuthUser(user_id): AuthUser,
    ApiJson(mut payload): ApiJson<UpdateUserRequest>,
) -> Response {
    payload.requested_by = user_id;
    dispatch(&mediator, payload, StatusCode::OK).await
}
