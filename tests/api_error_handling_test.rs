mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use common::{JWT_KEY, call, register, setup_app};
use jsonwebtoken::{EncodingKey, Header, encode};
use liftlog::auth::Claims;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

fn forged_token(sub: &str, key: &str, expires_in: Duration) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        email: "ghost@liftlog.app".to_string(),
        given_name: "Ghost".to_string(),
        family_name: "User".to_string(),
        cpf: "529.982.247-25".to_string(),
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
        iss: "liftlog".to_string(),
        aud: "liftlog-clients".to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup_app().await;

    let res = call(&app, Method::GET, "/api/users/self", None, None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.content_type.as_deref(),
        Some("application/problem+json")
    );
    assert_eq!(res.body["title"], json!("Not Authorized"));
    assert_eq!(res.body["status"], json!(401));
    assert_eq!(
        res.body["detail"],
        json!("You do not have permission to access this resource")
    );
}

#[tokio::test]
async fn test_rejected_tokens() {
    let app = setup_app().await;
    let sub = uuid::Uuid::new_v4().to_string();

    let garbage = call(&app, Method::GET, "/api/workouts", Some("not.a.jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let wrong_key = forged_token(
        &sub,
        "some-other-signing-key-0123456789abcdef",
        Duration::hours(1),
    );
    let res = call(&app, Method::GET, "/api/workouts", Some(&wrong_key), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let expired = forged_token(&sub, JWT_KEY, Duration::hours(-1));
    let res = call(&app, Method::GET, "/api/workouts", Some(&expired), None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_subject_must_be_a_user_id() {
    let app = setup_app().await;
    let token = forged_token("admin", JWT_KEY, Duration::hours(1));

    let res = call(&app, Method::GET, "/api/users/self", Some(&token), None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!([{ "key": "Operation", "message": "Unable to get user Id from request token." }])
    );
}

#[tokio::test]
async fn test_token_of_deleted_user_is_not_found() {
    let app = setup_app().await;
    let token = forged_token(&uuid::Uuid::new_v4().to_string(), JWT_KEY, Duration::hours(1));

    let res = call(&app, Method::GET, "/api/users/self", Some(&token), None).await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body["errors"][0]["message"],
        json!("User not found with provided UserId in request token.")
    );
}

#[tokio::test]
async fn test_malformed_json_is_a_problem() {
    let app = setup_app().await;

    let req = Request::builder()
        .uri("/api/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ \"email\": "))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_mistyped_body_is_unprocessable() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(json!({ "name": "Leg Day", "dayOfWeek": "Someday", "exercises": [] })),
    )
    .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(res.body["successful"], json!(false));
    assert_eq!(res.body["errors"][0]["key"], json!("Body"));
}

#[tokio::test]
async fn test_sql_injection_is_rejected() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::GET,
        "/api/users?search=x%27%20OR%20%271%27%3D%271",
        Some(&ana.token),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        res.body["errors"][0]["message"],
        json!("Search contains invalid characters.")
    );
}

#[tokio::test]
async fn test_health_probes_are_public() {
    let app = setup_app().await;

    for uri in ["/health", "/health/startup", "/health/liveness"] {
        let res = call(&app, Method::GET, uri, None, None).await;
        assert_eq!(res.status, StatusCode::OK, "{}", uri);
        assert_eq!(res.body["status"], json!("ok"));
    }
}
