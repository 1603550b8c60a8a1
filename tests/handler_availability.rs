mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;

#[tokio::test]
async fn test_reserve_slot_on_empty_availability() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch(&format!("/api/expert/availability/{}", expert.id))
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["expert_id"], expert.id);
    assert_eq!(body["availability"], json!(["2026-03-01T10:00:00Z"]));
}

#[tokio::test]
async fn test_reserve_slot_too_close_is_conflict() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state.clone())).unwrap();
    let path = format!("/api/expert/availability/{}", expert.id);

    server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await
        .assert_status_ok();

    let response = server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:30:00Z" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "Slot already reserved");
    assert!(body.get("availability").is_none());

    let stored = state
        .availability_service
        .list_availability(expert.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_reserve_slot_after_separation_is_admitted() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    let path = format!("/api/expert/availability/{}", expert.id);

    server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await
        .assert_status_ok();

    let response = server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T11:01:00Z" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body["availability"],
        json!(["2026-03-01T10:00:00Z", "2026-03-01T11:01:00Z"])
    );
}

#[tokio::test]
async fn test_resubmitting_rejected_slot_is_conflict_again() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state.clone())).unwrap();
    let path = format!("/api/expert/availability/{}", expert.id);

    server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await
        .assert_status_ok();

    for _ in 0..2 {
        server
            .patch(&path)
            .json(&json!({ "availability": "2026-03-01T09:15:00Z" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    let stored = state
        .availability_service
        .list_availability(expert.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_reserve_slot_unknown_expert() {
    let state = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch("/api/expert/availability/404")
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_reserve_slot_invalid_timestamp() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch(&format!("/api/expert/availability/{}", expert.id))
        .json(&json!({ "availability": "next tuesday" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["slot"], "next tuesday");
}

#[tokio::test]
async fn test_reserve_slot_invalid_timestamp_checked_before_lookup() {
    let state = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch("/api/expert/availability/404")
        .json(&json!({ "availability": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reserve_slot_accepts_slot_field_and_offsets() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch(&format!("/api/expert/availability/{}", expert.id))
        .json(&json!({ "slot": "2026-03-01T12:00:00+02:00" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["availability"], json!(["2026-03-01T10:00:00Z"]));
}

#[tokio::test]
async fn test_get_availability_in_stored_order() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    let path = format!("/api/expert/availability/{}", expert.id);

    for slot in ["2026-03-02T10:00:00Z", "2026-03-01T10:00:00Z"] {
        server
            .patch(&path)
            .json(&json!({ "availability": slot }))
            .await
            .assert_status_ok();
    }

    let response = server.get(&path).await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body["availability"],
        json!(["2026-03-02T10:00:00Z", "2026-03-01T10:00:00Z"])
    );
}

#[tokio::test]
async fn test_get_availability_unknown_expert() {
    let state = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    server
        .get("/api/expert/availability/77")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reserve_slot_missing_field_is_bad_request() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state.clone())).unwrap();

    let response = server
        .patch(&format!("/api/expert/availability/{}", expert.id))
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");

    let stored = state
        .availability_service
        .list_availability(expert.id)
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_reserve_slot_non_string_field_is_bad_request() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch(&format!("/api/expert/availability/{}", expert.id))
        .json(&json!({ "availability": 12345 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_reserve_slot_malformed_body_checked_before_lookup() {
    let state = common::create_test_state();
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .patch("/api/expert/availability/404")
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_conflict_response_hides_existing_reservation() {
    let state = common::create_test_state();
    let expert = common::create_test_expert(&state, "ada@example.com").await;
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    let path = format!("/api/expert/availability/{}", expert.id);

    server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:00:00Z" }))
        .await
        .assert_status_ok();

    let response = server
        .patch(&path)
        .json(&json!({ "availability": "2026-03-01T10:30:00Z" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body = response.json::<serde_json::Value>();
    assert_eq!(
        body["error"]["details"],
        json!({ "slot": "2026-03-01T10:30:00Z" })
    );
}
