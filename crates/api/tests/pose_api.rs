//! Integration tests for the read-only pose catalog endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /poses returns the seeded catalog in id order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pose_list_returns_seeded_catalog(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/poses").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let poses = json.as_array().unwrap();

    assert!(poses.len() >= 20, "seed catalog should have 20+ poses");

    let ids: Vec<i64> = poses.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted, "catalog must be in id order");

    assert_eq!(poses[0]["name"], "Mountain Pose");
    assert_eq!(poses[0]["sanskrit_name"], "Tadasana");
}

// ---------------------------------------------------------------------------
// Test: GET /poses/{id} round trip and 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn pose_by_id_round_trip(pool: PgPool) {
    let pose_id: i64 = sqlx::query_scalar("SELECT id FROM poses WHERE name = 'Warrior II'")
        .fetch_one(&pool)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/poses/{pose_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Warrior II");
    assert_eq!(json["side_option"], "left_right");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/poses/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}
