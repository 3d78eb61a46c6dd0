#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use liftlog::auth::JwtOptions;
use liftlog::config::Config;
use liftlog::{db, seed, server};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

pub const PASSWORD: &str = "Str0ng!Passw";
pub const JWT_KEY: &str = "integration-test-signing-key-0123456789";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        cors_allowed_origins: Vec::new(),
        environment: "development".to_string(),
        seed_reference_data: true,
        jwt: JwtOptions {
            key: JWT_KEY.to_string(),
            issuer: "liftlog".to_string(),
            audience: "liftlog-clients".to_string(),
            expiration_days: 7,
        },
    }
}

// Full application over a fresh in-memory database with reference data
pub async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    seed::seed_reference_data(&db)
        .await
        .expect("Failed to seed reference data");
    server::build_router(db, &test_config())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        content_type,
        body,
    }
}

pub fn register_body(first_name: &str, email: &str, cpf: &str) -> Value {
    json!({
        "type": "Student",
        "firstName": first_name,
        "lastName": "Souza",
        "cpf": cpf,
        "phoneNumber": "+55 (11) 91234-5678",
        "email": email,
        "password": PASSWORD
    })
}

pub struct Session {
    pub token: String,
    pub refresh_token: String,
}

// Registers a user and returns their tokens
pub async fn register(app: &Router, first_name: &str, email: &str, cpf: &str) -> Session {
    let res = call(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(register_body(first_name, email, cpf)),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

    Session {
        token: res.body["token"].as_str().unwrap().to_string(),
        refresh_token: res.body["refreshToken"].as_str().unwrap().to_string(),
    }
}

pub async fn self_id(app: &Router, token: &str) -> String {
    let res = call(app, Method::GET, "/api/users/self", Some(token), None).await;
    assert_eq!(res.status, StatusCode::OK);
    res.body["id"].as_str().unwrap().to_string()
}

pub async fn exercise_id(app: &Router, token: &str, muscle: &str, name: &str) -> String {
    let res = call(
        app,
        Method::GET,
        &format!("/api/exercises?muscle={}", muscle),
        Some(token),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    res.body
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == name)
        .map(|e| e["id"].as_str().unwrap().to_string())
        .unwrap_or_else(|| panic!("exercise {} not seeded", name))
}

pub fn messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| e["message"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}
