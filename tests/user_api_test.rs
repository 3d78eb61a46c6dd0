mod common;

use axum::http::{Method, StatusCode};
use common::{call, messages, register, self_id, setup_app};
use serde_json::json;

#[tokio::test]
async fn test_get_self() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(&app, Method::GET, "/api/users/self", Some(&ana.token), None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["email"], json!("ana@liftlog.app"));
    assert_eq!(res.body["type"], json!("Student"));
    assert_eq!(res.body["weightUnit"], json!("Kilograms"));
}

#[tokio::test]
async fn test_list_users_excludes_requester() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    // Nobody else yet
    let alone = call(&app, Method::GET, "/api/users", Some(&ana.token), None).await;
    assert_eq!(alone.status, StatusCode::NOT_FOUND);
    assert_eq!(messages(&alone.body), vec!["No user found with given parameters."]);

    let bruno = register(&app, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;
    let bruno_id = self_id(&app, &bruno.token).await;

    let all = call(&app, Method::GET, "/api/users", Some(&ana.token), None).await;
    assert_eq!(all.status, StatusCode::OK);
    let users = all.body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], json!("Bruno Souza"));

    let by_id = call(
        &app,
        Method::GET,
        &format!("/api/users?id={}", bruno_id),
        Some(&ana.token),
        None,
    )
    .await;
    assert_eq!(by_id.status, StatusCode::OK);
    assert_eq!(by_id.body[0]["id"], json!(bruno_id));

    let search = call(
        &app,
        Method::GET,
        "/api/users?search=bruno",
        Some(&ana.token),
        None,
    )
    .await;
    assert_eq!(search.status, StatusCode::OK);
    assert_eq!(search.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_users_rejects_bad_id() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::GET,
        "/api/users?id=not-a-guid",
        Some(&ana.token),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_profile() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::PATCH,
        "/api/users",
        Some(&ana.token),
        Some(json!({ "lastName": "Lima", "height": 168.0, "gender": "Female" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["name"], json!("Ana Lima"));

    let me = call(&app, Method::GET, "/api/users/self", Some(&ana.token), None).await;
    assert_eq!(me.body["lastName"], json!("Lima"));
    assert_eq!(me.body["gender"], json!("Female"));
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;
    register(&app, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;

    let res = call(
        &app,
        Method::PATCH,
        "/api/users",
        Some(&ana.token),
        Some(json!({ "email": "bruno@liftlog.app" })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        messages(&res.body),
        vec!["A user already exists with given email."]
    );
}
