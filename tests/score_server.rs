use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use snake_arcade::server::{self, MemoryScoreStore, ScoreRecord, ScoreStore, StoreError};

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/scores")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn get() -> Request<Body> {
    Request::builder().uri("/scores").body(Body::empty()).unwrap()
}

fn seeded(rows: i64) -> Arc<MemoryScoreStore> {
    let store = Arc::new(MemoryScoreStore::new());
    for i in 0..rows {
        store.insert(&format!("player{i}"), i * 10).unwrap();
    }
    store
}

#[tokio::test]
async fn posting_a_score_adds_one_row() {
    let store = seeded(5);
    let app = server::router(store.clone());

    let (status, body) = send(app.clone(), post(json!({ "name": "Ada", "score": 42 }).to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Score saved" }));
    assert_eq!(store.live_count().unwrap(), 6);

    let (status, body) = send(app, get()).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["name"], "Ada");
    assert_eq!(rows[0]["score"], 42);
    assert!(rows[0]["created_at"].is_string());
}

#[tokio::test]
async fn name_longer_than_thirty_chars_is_rejected() {
    let store = seeded(0);
    let app = server::router(store.clone());

    let (status, body) = send(app, post(json!({ "name": "A".repeat(31), "score": 10 }).to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name must be at most 30 characters");
    assert_eq!(store.live_count().unwrap(), 0);
}

#[tokio::test]
async fn invalid_submissions_are_bad_requests() {
    let app = server::router(seeded(0));
    let bodies = [
        json!({ "name": "   ", "score": 10 }).to_string(),
        json!({ "name": "Ada", "score": 1.5 }).to_string(),
        json!({ "name": "Ada", "score": "lots" }).to_string(),
        json!({ "name": "Ada" }).to_string(),
        "not json".to_string(),
    ];

    for body in bodies {
        let (status, reply) = send(app.clone(), post(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(reply["error"], "Invalid input", "{body}");
    }
}

#[tokio::test]
async fn numeric_string_score_and_padded_name_are_accepted() {
    let store = seeded(0);
    let app = server::router(store.clone());

    let (status, _) = send(app.clone(), post(json!({ "name": "  Bo  ", "score": "17" }).to_string())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(app, get()).await;
    assert_eq!(body, json!([{ "name": "Bo", "score": 17, "created_at": body[0]["created_at"] }]));
}

#[tokio::test]
async fn read_returns_top_twenty_only() {
    let app = server::router(seeded(25));

    let (status, body) = send(app, get()).await;

    assert_eq!(status, StatusCode::OK);
    let scores: Vec<i64> = body.as_array().unwrap().iter().map(|r| r["score"].as_i64().unwrap()).collect();
    assert_eq!(scores.len(), 20);
    assert_eq!(scores[0], 240);
    assert_eq!(scores[19], 50);
}

#[tokio::test]
async fn soft_deleted_rows_are_not_served() {
    let store = seeded(0);
    let cheat = store.insert("cheat", 1_000_000).unwrap();
    store.insert("ada", 5).unwrap();
    store.soft_delete(cheat).unwrap();

    let (_, body) = send(server::router(store), get()).await;

    let names: Vec<&str> = body.as_array().unwrap().iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, ["ada"]);
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn insert(&self, _name: &str, _score: i64) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }

    fn top(&self, _limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        Err(StoreError::Unavailable("disk on fire".into()))
    }
}

#[tokio::test]
async fn storage_failures_are_server_errors() {
    let app = server::router(Arc::new(BrokenStore));

    let (status, body) = send(app.clone(), post(json!({ "name": "Ada", "score": 1 }).to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save score" }));

    let (status, body) = send(app, get()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch scores" }));
}

#[tokio::test]
async fn responses_allow_cross_origin_reads() {
    let app = server::router(seeded(1));
    let request = Request::builder()
        .uri("/scores")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
