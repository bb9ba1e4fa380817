//! Integration tests for routine endpoints
//!
//! Covers the data-management rules end to end: case-insensitive name
//! uniqueness, partial updates, cascade deletion, pagination, search and
//! duplication.

mod common;

use axum::http::StatusCode;
use serde_json::json;

fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4())
}

async fn create_routine(app: &common::TestApp, token: &str, name: &str) -> serde_json::Value {
    let body = json!({ "name": name, "description": "test routine" });
    let (status, response) = app
        .post_auth("/api/v1/routines", &body.to_string(), token)
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", response);
    serde_json::from_str(&response).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_routine_success() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let name = unique_name("Fuerza");
    let body = json!({ "name": name, "description": "Bloque de fuerza" });
    let (status, response) = app
        .post_auth("/api/v1/routines", &body.to_string(), &token)
        .await;

    assert_eq!(status, StatusCode::CREATED);

    let routine: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(routine["name"], name.as_str());
    assert_eq!(routine["description"], "Bloque de fuerza");
    assert!(routine["id"].as_i64().unwrap() > 0);
    assert!(!routine["created_at"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_routine_requires_auth() {
    let app = common::TestApp::new().await;

    let body = json!({ "name": unique_name("Sin Token") });
    let (status, _) = app.post("/api/v1/routines", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_routine_name_conflict_is_case_insensitive() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let name = unique_name("Leg Day");
    create_routine(&app, &token, &name).await;

    // Same name in a different case must be rejected
    let body = json!({ "name": name.to_uppercase() });
    let (status, _) = app
        .post_auth("/api/v1/routines", &body.to_string(), &token)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_routine_detail_includes_exercises() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let routine = create_routine(&app, &token, &unique_name("Detalle")).await;
    let id = routine["id"].as_i64().unwrap();

    let exercise = json!({
        "name": "Press banca", "weekday": "Lunes", "sets": 4, "reps": 10, "weight_kg": 60.0
    });
    app.post_auth(
        &format!("/api/v1/routines/{}/exercises", id),
        &exercise.to_string(),
        &token,
    )
    .await;

    let (status, response) = app.get(&format!("/api/v1/routines/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let detail: serde_json::Value = serde_json::from_str(&response).unwrap();
    let exercises = detail["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0]["name"], "Press banca");
    assert_eq!(exercises[0]["weekday"], "Lunes");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_get_routine_not_found() {
    let app = common::TestApp::new().await;

    let (status, _) = app.get("/api/v1/routines/999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_partial_update_preserves_other_fields() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let name = unique_name("Parcial");
    let routine = create_routine(&app, &token, &name).await;
    let id = routine["id"].as_i64().unwrap();

    // Update only the description: name must survive
    let body = json!({ "description": "nueva descripcion" });
    let (status, response) = app
        .put_auth(&format!("/api/v1/routines/{}", id), &body.to_string(), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let updated: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["description"], "nueva descripcion");

    // Update only the name: description must survive
    let new_name = unique_name("Parcial Renombrada");
    let body = json!({ "name": new_name });
    let (status, response) = app
        .put_auth(&format!("/api/v1/routines/{}", id), &body.to_string(), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let updated: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(updated["name"], new_name.as_str());
    assert_eq!(updated["description"], "nueva descripcion");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_to_taken_name_conflicts() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let taken = unique_name("Ocupada");
    create_routine(&app, &token, &taken).await;
    let routine = create_routine(&app, &token, &unique_name("Libre")).await;
    let id = routine["id"].as_i64().unwrap();

    let body = json!({ "name": taken.to_lowercase() });
    let (status, _) = app
        .put_auth(&format!("/api/v1/routines/{}", id), &body.to_string(), &token)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_cascades_to_exercises() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let routine = create_routine(&app, &token, &unique_name("Cascada")).await;
    let id = routine["id"].as_i64().unwrap();

    let mut exercise_ids = Vec::new();
    for day in ["Lunes", "Martes", "Viernes"] {
        let exercise = json!({ "name": "Remo", "weekday": day, "sets": 3, "reps": 12 });
        let (status, response) = app
            .post_auth(
                &format!("/api/v1/routines/{}/exercises", id),
                &exercise.to_string(),
                &token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let exercise: serde_json::Value = serde_json::from_str(&response).unwrap();
        exercise_ids.push(exercise["id"].as_i64().unwrap());
    }

    // Delete returns the routine's last-known state
    let (status, response) = app
        .delete_auth(&format!("/api/v1/routines/{}", id), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let deleted: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(deleted["id"].as_i64().unwrap(), id);

    // The routine and every one of its exercises are gone
    let (status, _) = app.get(&format!("/api/v1/routines/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for exercise_id in exercise_ids {
        let (status, _) = app
            .delete_auth(&format!("/api/v1/exercises/{}", exercise_id), &token)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_missing_routine_is_not_found() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let (status, _) = app
        .delete_auth("/api/v1/routines/999999999", &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_pagination_windows_and_total_pages() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;
    app.clear_routines().await;

    for i in 0..25 {
        create_routine(&app, &token, &format!("Rutina {:02}", i)).await;
    }

    let (status, response) = app.get("/api/v1/routines?page=1&page_size=10").await;
    assert_eq!(status, StatusCode::OK);
    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["items"].as_array().unwrap().len(), 10);
    assert_eq!(page["total_items"], 25);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["page_size"], 10);

    let (_, response) = app.get("/api/v1/routines?page=3&page_size=10").await;
    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["total_pages"], 3);

    // Pages are stable: the first item of page 2 follows the last of page 1
    let (_, response) = app.get("/api/v1/routines?page=2&page_size=10").await;
    let page2: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page2["items"][0]["name"], "Rutina 10");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_pagination_weekday_filter() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;
    app.clear_routines().await;

    let with_monday = create_routine(&app, &token, "Con Lunes").await;
    create_routine(&app, &token, "Sin Ejercicios").await;

    let exercise = json!({ "name": "Sentadilla", "weekday": "Lunes", "sets": 5, "reps": 5 });
    app.post_auth(
        &format!("/api/v1/routines/{}/exercises", with_monday["id"].as_i64().unwrap()),
        &exercise.to_string(),
        &token,
    )
    .await;

    let (status, response) = app.get("/api/v1/routines?weekday=Lunes").await;
    assert_eq!(status, StatusCode::OK);
    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["name"], "Con Lunes");

    let (_, response) = app.get("/api/v1/routines?weekday=Domingo").await;
    let page: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(page["total_items"], 0);
    assert_eq!(page["total_pages"], 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_search_is_case_insensitive_substring() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;
    app.clear_routines().await;

    create_routine(&app, &token, "Leg Day").await;
    create_routine(&app, &token, "LEG press").await;
    create_routine(&app, &token, "Espalda").await;

    let (status, response) = app.get("/api/v1/routines/search?name=leg").await;
    assert_eq!(status, StatusCode::OK);
    let results: serde_json::Value = serde_json::from_str(&response).unwrap();
    let names: Vec<&str> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Leg Day", "LEG press"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_search_blank_term_returns_all() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;
    app.clear_routines().await;

    create_routine(&app, &token, "Uno").await;
    create_routine(&app, &token, "Dos").await;
    create_routine(&app, &token, "Tres").await;

    let (status, response) = app.get("/api/v1/routines/search?name=").await;
    assert_eq!(status, StatusCode::OK);
    let results: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 3);

    // Missing parameter behaves the same as a blank one
    let (status, response) = app.get("/api/v1/routines/search").await;
    assert_eq!(status, StatusCode::OK);
    let results: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_generates_copy_names_and_copies_exercises() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let name = unique_name("Empuje");
    let routine = create_routine(&app, &token, &name).await;
    let id = routine["id"].as_i64().unwrap();

    for (exercise_name, day) in [("Press militar", "Lunes"), ("Fondos", "Jueves")] {
        let exercise = json!({ "name": exercise_name, "weekday": day, "sets": 3, "reps": 10 });
        app.post_auth(
            &format!("/api/v1/routines/{}/exercises", id),
            &exercise.to_string(),
            &token,
        )
        .await;
    }

    // First copy
    let (status, response) = app
        .post_auth(&format!("/api/v1/routines/{}/duplicate", id), "{}", &token)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let copy1: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(copy1["name"], format!("{} (Copia 1)", name));

    // Second copy of the same source increments the counter
    let (status, response) = app
        .post_auth(&format!("/api/v1/routines/{}/duplicate", id), "{}", &token)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let copy2: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(copy2["name"], format!("{} (Copia 2)", name));

    // The copy carries every exercise with fresh ids bound to the new routine
    let copy_id = copy1["id"].as_i64().unwrap();
    let (_, response) = app.get(&format!("/api/v1/routines/{}", copy_id)).await;
    let detail: serde_json::Value = serde_json::from_str(&response).unwrap();
    let copied = detail["exercises"].as_array().unwrap();
    assert_eq!(copied.len(), 2);
    for exercise in copied {
        assert_eq!(exercise["routine_id"].as_i64().unwrap(), copy_id);
    }

    let (_, response) = app.get(&format!("/api/v1/routines/{}", id)).await;
    let original: serde_json::Value = serde_json::from_str(&response).unwrap();
    let original_ids: Vec<i64> = original["exercises"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    for exercise in copied {
        assert!(!original_ids.contains(&exercise["id"].as_i64().unwrap()));
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_missing_routine_is_not_found() {
    let app = common::TestApp::new().await;
    let token = app.authenticate().await;

    let (status, _) = app
        .post_auth("/api/v1/routines/999999999/duplicate", "{}", &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
