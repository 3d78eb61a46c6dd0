mod common;

use axum::http::{Method, StatusCode};
use common::{call, exercise_id, messages, register, self_id, setup_app};
use serde_json::{Value, json};

fn leg_day(squat: &str) -> Value {
    json!({
        "name": "Leg Day",
        "dayOfWeek": "Monday",
        "exercises": [
            { "id": squat, "sets": 5, "reps": 5, "weight": 100.0, "unit": "Kilograms" }
        ]
    })
}

#[tokio::test]
async fn test_create_and_list_workouts() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;
    let ana_id = self_id(&app, &ana.token).await;
    let squat = exercise_id(&app, &ana.token, "quads", "Back Squat").await;

    let created = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(leg_day(&squat)),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["createdBy"], json!(ana_id));
    assert_eq!(created.body["dayOfWeek"], json!("Monday"));
    assert_eq!(created.body["exercises"][0]["name"], json!("Back Squat"));
    assert_eq!(created.body["hasAccess"], json!([ana_id]));
    let workout_id = created.body["id"].as_str().unwrap().to_string();

    let all = call(&app, Method::GET, "/api/workouts", Some(&ana.token), None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body.as_array().unwrap().len(), 1);

    let by_id = call(
        &app,
        Method::GET,
        &format!("/api/workouts?workoutId={}", workout_id),
        Some(&ana.token),
        None,
    )
    .await;
    assert_eq!(by_id.status, StatusCode::OK);
    assert_eq!(by_id.body[0]["id"], json!(workout_id));

    let by_name = call(
        &app,
        Method::GET,
        "/api/workouts?search=leg",
        Some(&ana.token),
        None,
    )
    .await;
    assert_eq!(by_name.status, StatusCode::OK);

    let nothing = call(
        &app,
        Method::GET,
        "/api/workouts?search=push",
        Some(&ana.token),
        None,
    )
    .await;
    assert_eq!(nothing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        messages(&nothing.body),
        vec!["No workout found with given parameters."]
    );
}

#[tokio::test]
async fn test_create_workout_validation() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(json!({ "name": "Leg Day 1", "dayOfWeek": "Monday", "exercises": [] })),
    )
    .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let messages = messages(&res.body);
    assert!(messages.contains(&"Name contains invalid characters.".to_string()));
    assert!(messages.contains(&"Exercises are required.".to_string()));
}

#[tokio::test]
async fn test_create_workout_with_unknown_exercise() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;
    let unknown = uuid::Uuid::new_v4().to_string();

    let res = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(leg_day(&unknown)),
    )
    .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        messages(&res.body),
        vec![format!("Some exercises were not found: {}", unknown)]
    );
}

#[tokio::test]
async fn test_sharing_and_creator_rights() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;
    let bruno = register(&app, "Bruno", "bruno@liftlog.app", "111.444.777-35").await;
    let bruno_id = self_id(&app, &bruno.token).await;
    let squat = exercise_id(&app, &ana.token, "quads", "Back Squat").await;

    let created = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(leg_day(&squat)),
    )
    .await;
    let workout_id = created.body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/workouts/{}", workout_id);

    // Hidden from Bruno until shared
    let hidden = call(&app, Method::GET, "/api/workouts", Some(&bruno.token), None).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    let hidden_patch = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&bruno.token),
        Some(json!({ "name": "Mine" })),
    )
    .await;
    assert_eq!(hidden_patch.status, StatusCode::NOT_FOUND);
    assert_eq!(
        messages(&hidden_patch.body),
        vec!["Workout not found with provided in request."]
    );

    let shared = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&ana.token),
        Some(json!({ "shareWith": [bruno_id] })),
    )
    .await;
    assert_eq!(shared.status, StatusCode::OK, "{}", shared.body);
    assert!(
        shared.body["hasAccess"]
            .as_array()
            .unwrap()
            .contains(&json!(bruno_id))
    );

    let visible = call(&app, Method::GET, "/api/workouts", Some(&bruno.token), None).await;
    assert_eq!(visible.status, StatusCode::OK);

    let forbidden_patch = call(
        &app,
        Method::PATCH,
        &uri,
        Some(&bruno.token),
        Some(json!({ "name": "Mine" })),
    )
    .await;
    assert_eq!(forbidden_patch.status, StatusCode::FORBIDDEN);
    assert_eq!(
        messages(&forbidden_patch.body),
        vec!["Only the creator of the workout can change it."]
    );

    let forbidden_delete = call(&app, Method::DELETE, &uri, Some(&bruno.token), None).await;
    assert_eq!(forbidden_delete.status, StatusCode::FORBIDDEN);

    let deleted = call(&app, Method::DELETE, &uri, Some(&ana.token), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.body, Value::Null);

    let gone = call(&app, Method::GET, "/api/workouts", Some(&ana.token), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_workout_exercises() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;
    let squat = exercise_id(&app, &ana.token, "quads", "Back Squat").await;
    let curl = exercise_id(&app, &ana.token, "hamstrings", "Leg Curl").await;

    let created = call(
        &app,
        Method::POST,
        "/api/workouts",
        Some(&ana.token),
        Some(leg_day(&squat)),
    )
    .await;
    let workout_id = created.body["id"].as_str().unwrap().to_string();
    let squat_entry = created.body["exercises"][0]["id"].clone();

    let res = call(
        &app,
        Method::PATCH,
        &format!("/api/workouts/{}", workout_id),
        Some(&ana.token),
        Some(json!({
            "name": "Legs",
            "dayOfWeek": "Friday",
            "exercises": [
                { "id": curl, "sets": 3, "reps": 12, "weight": 40.0, "unit": "Kilograms" }
            ],
            "removeExercises": [squat_entry]
        })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["name"], json!("Legs"));
    assert_eq!(res.body["dayOfWeek"], json!("Friday"));
    let exercises = res.body["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["name"], json!("Leg Curl"));
    assert_eq!(exercises[0]["sets"], json!(3));
}

#[tokio::test]
async fn test_workout_path_must_be_a_guid() {
    let app = setup_app().await;
    let ana = register(&app, "Ana", "ana@liftlog.app", "529.982.247-25").await;

    let res = call(
        &app,
        Method::DELETE,
        "/api/workouts/not-a-guid",
        Some(&ana.token),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(messages(&res.body), vec!["WorkoutId must be a valid Guid."]);
}
