//! HTTP-level integration tests for the `/api/personagens` resource.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, photo, Part, TestApp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a character through the API and return the response JSON.
async fn create(app: &TestApp, name: &str, description: &str) -> serde_json::Value {
    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[
                Part::Text("nome", name),
                Part::Text("descricao", description),
                photo("hero.png"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_returns_same_fields() {
    let app = TestApp::new();

    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["nome"], "Aria");
    assert_eq!(created["descricao"], "Hero");

    let foto = created["foto"].as_str().expect("foto should be set");
    assert!(foto.ends_with(".png"));
    assert!(app.uploads.path().join(foto).exists());

    let response = app.get(&format!("/api/personagens/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["nome"], "Aria");
    assert_eq!(fetched["descricao"], "Hero");
    assert_eq!(fetched["foto"], foto);
}

#[tokio::test]
async fn uploaded_photo_is_served_under_uploads() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let foto = created["foto"].as_str().unwrap();

    let response = app.get(&format!("/uploads/{foto}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"\x89PNG fake image bytes");
}

#[tokio::test]
async fn create_without_photo_is_400() {
    let app = TestApp::new();

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[Part::Text("nome", "Aria"), Part::Text("descricao", "Hero")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required 'foto' file");

    let list = body_json(app.get("/api/personagens").await).await;
    assert_eq!(list, serde_json::json!([]));
}

#[tokio::test]
async fn create_without_name_is_400_and_leaves_no_file() {
    let app = TestApp::new();

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[Part::Text("descricao", "Hero"), photo("hero.png")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn create_with_store_down_is_500_and_leaves_no_file() {
    let app = TestApp::new();
    app.store.set_offline(true);

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[Part::Text("nome", "Aria"), photo("hero.png")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "store unavailable");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn injection_text_is_stored_literally() {
    let app = TestApp::new();

    let name = "\"; DROP TABLE personagens; --";
    let created = create(&app, name, "d").await;
    assert_eq!(created["nome"], name);

    let list = body_json(app.get("/api/personagens").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["nome"], name);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_characters_in_creation_order() {
    let app = TestApp::new();
    create(&app, "First", "1").await;
    create(&app, "Second", "2").await;

    let response = app.get("/api/personagens").await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["nome"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["First", "Second"]);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = TestApp::new();
    let response = app.get("/api/personagens/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_non_numeric_id_is_400() {
    let app = TestApp::new();
    let response = app.get("/api/personagens/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_with_store_down_is_500() {
    let app = TestApp::new();
    app.store.set_offline(true);
    let response = app.get("/api/personagens").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[Part::Text("descricao", "Villain")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["nome"], "Aria");
    assert_eq!(updated["descricao"], "Villain");
    assert_eq!(updated["foto"], created["foto"]);
}

#[tokio::test]
async fn update_with_empty_name_keeps_stored_name() {
    let app = TestApp::new();
    let id = create(&app, "Aria", "Hero").await["id"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[Part::Text("nome", ""), Part::Text("descricao", "Villain")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["nome"], "Aria");
}

#[tokio::test]
async fn update_with_new_photo_replaces_foto() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[photo("portrait.jpg")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    let foto = updated["foto"].as_str().unwrap();
    assert_ne!(updated["foto"], created["foto"]);
    assert!(foto.ends_with(".jpg"));
    assert!(app.uploads.path().join(foto).exists());
}

#[tokio::test]
async fn update_with_no_fields_is_400() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[Part::Text("nome", ""), Part::Text("unrelated", "x")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No fields to update");

    let fetched = body_json(app.get(&format!("/api/personagens/{id}")).await).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn update_unknown_id_is_404_and_leaves_no_file() {
    let app = TestApp::new();

    let response = app
        .multipart(
            Method::PUT,
            "/api/personagens/42",
            &[Part::Text("nome", "Ghost"), photo("ghost.png")],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.upload_count(), 0);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_the_character() {
    let app = TestApp::new();
    let id = create(&app, "Aria", "Hero").await["id"].as_i64().unwrap();

    let response = app.delete(&format!("/api/personagens/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Character deleted successfully");

    let response = app.get(&format!("/api/personagens/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.delete(&format!("/api/personagens/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_leaves_the_photo_file_in_place() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();
    let foto = created["foto"].as_str().unwrap();

    let response = app.delete(&format!("/api/personagens/{id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.uploads.path().join(foto).exists());
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let app = TestApp::new();
    let response = app.delete("/api/personagens/7", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Upload edge cases
// ---------------------------------------------------------------------------

fn empty_photo() -> Part<'static> {
    Part::File {
        name: "foto",
        file_name: "",
        data: b"",
    }
}

#[tokio::test]
async fn body_over_the_limit_is_413() {
    let app = TestApp::with_config(|config| config.max_upload_bytes = 64);
    let big = vec![b'x'; 4096];

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[
                Part::Text("nome", "Aria"),
                Part::File {
                    name: "foto",
                    file_name: "big.png",
                    data: &big,
                },
            ],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn zero_byte_photo_on_create_counts_as_missing() {
    let app = TestApp::new();

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[Part::Text("nome", "Aria"), empty_photo()],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required 'foto' file");
    assert_eq!(app.upload_count(), 0);
}

#[tokio::test]
async fn zero_byte_photo_on_update_keeps_stored_photo() {
    let app = TestApp::new();
    let created = create(&app, "Aria", "Hero").await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[Part::Text("descricao", "Villain"), empty_photo()],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["descricao"], "Villain");
    assert_eq!(updated["foto"], created["foto"]);
    assert_eq!(app.upload_count(), 1);

    // A zero-byte photo alone changes nothing.
    let response = app
        .multipart(
            Method::PUT,
            &format!("/api/personagens/{id}"),
            &[empty_photo()],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No fields to update");
}

#[tokio::test]
async fn second_photo_part_is_400() {
    let app = TestApp::new();

    let response = app
        .multipart(
            Method::POST,
            "/api/personagens",
            &[
                Part::Text("nome", "Aria"),
                photo("one.png"),
                photo("two.png"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Only one 'foto' file is accepted");
    assert_eq!(app.upload_count(), 0);

    let list = body_json(app.get("/api/personagens").await).await;
    assert_eq!(list, serde_json::json!([]));
}
