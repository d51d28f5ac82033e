//! Integration tests for the generation endpoints.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the router.
//! No LLM client is configured in tests, so every request exercises the
//! rule-based assembler.

mod common;

use axum::http::StatusCode;
use common::{access_token, body_json, post_json, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

fn beginner_params() -> serde_json::Value {
    json!({
        "duration_minutes": 30,
        "difficulty": "beginner",
        "style": "vinyasa",
        "focus": "full body"
    })
}

// ---------------------------------------------------------------------------
// Test: POST /generate-sequence builds and persists a full sequence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_sequence_returns_created_sequence(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/generate-sequence", beginner_params()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let sequence = &json["sequence"];

    assert!(sequence["id"].as_i64().is_some());
    assert_eq!(sequence["ai_generated"], false);
    assert_eq!(sequence["duration_minutes"], 30);
    // Anonymous request: the sequence has no owner.
    assert!(sequence["user_id"].is_null());

    // A 30-minute practice has a 10-pose budget split 30/50/20.
    let phases = sequence["phases"].as_array().unwrap();
    assert_eq!(phases.len(), 3);
    assert_eq!(phases[0]["name"], "Warm Up");
    assert_eq!(phases[1]["name"], "Main Sequence");
    assert_eq!(phases[2]["name"], "Cool Down");

    let counts: Vec<usize> = phases
        .iter()
        .map(|p| p["poses"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, vec![3, 5, 2]);
}

// ---------------------------------------------------------------------------
// Test: authenticated generation sets the owner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_generation_sets_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = access_token(7);
    let response =
        post_json_auth(app, "/api/v1/generate-sequence", beginner_params(), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["sequence"]["user_id"], 7);
}

// ---------------------------------------------------------------------------
// Test: duration over the cap is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn overlong_duration_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "duration_minutes": 91,
        "difficulty": "beginner",
        "style": "vinyasa",
        "focus": "full body"
    });
    let response = post_json(app, "/api/v1/generate-sequence", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: unknown enum values are rejected at deserialization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_style_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "duration_minutes": 30,
        "difficulty": "beginner",
        "style": "ashtanga",
        "focus": "core"
    });
    let response = post_json(app, "/api/v1/generate-sequence", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: an empty pose catalog is a 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_catalog_is_not_found(pool: PgPool) {
    sqlx::query("DELETE FROM poses")
        .execute(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/generate-sequence", beginner_params()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: POST /generate-cues derives a cue from the catalog entry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_cues_uses_catalog_data(pool: PgPool) {
    let pose_id: i64 = sqlx::query_scalar("SELECT id FROM poses WHERE name = 'Mountain Pose'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/generate-cues", json!({ "pose_id": pose_id })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let cues = json["cues"].as_str().unwrap();
    assert!(cues.contains("Mountain Pose"));
    // The seeded breath instruction is folded into the cue.
    assert!(cues.contains("Breathe evenly through the nose"));
}

// ---------------------------------------------------------------------------
// Test: cue generation for an unknown pose is a 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_cues_for_unknown_pose_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response =
        post_json(app, "/api/v1/generate-cues", json!({ "pose_id": 999_999 })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
