//! HTTP score service: `GET /scores` and `POST /scores`.

pub mod store;

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::config::{MAX_NAME_CHARS, TOP_SCORES_LIMIT};
pub use store::{MemoryScoreStore, ScoreRecord, ScoreStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub name: String,
    pub score: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Invalid input")]
    Malformed,
    #[error("Invalid input")]
    MissingName,
    #[error("Name must be at most 30 characters")]
    NameTooLong,
    #[error("Invalid input")]
    InvalidScore,
}

/// Validates a raw `POST /scores` body.
pub fn parse_submission(body: &[u8]) -> Result<Submission, SubmitError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| SubmitError::Malformed)?;
    let Value::Object(fields) = value else {
        return Err(SubmitError::Malformed);
    };

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(SubmitError::MissingName)?;
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(SubmitError::NameTooLong);
    }

    let score = fields.get("score").and_then(integral).ok_or(SubmitError::InvalidScore)?;
    Ok(Submission { name: name.to_string(), score })
}

fn integral(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole))?,
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(whole))?
        }
        _ => return None,
    };
    Some(n)
}

fn whole(f: f64) -> Option<i64> {
    let in_range = f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64;
    in_range.then_some(f as i64)
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("Failed to fetch scores")]
    Fetch(#[source] StoreError),
    #[error("Failed to save score")]
    Save(#[source] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Submit(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(source) | ApiError::Save(source) => {
                error!(error = %source, "{self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Clone)]
struct AppState {
    store: Arc<dyn ScoreStore>,
}

async fn list_scores(State(state): State<AppState>) -> Result<Json<Vec<ScoreRecord>>, ApiError> {
    let rows = state.store.top(TOP_SCORES_LIMIT).map_err(ApiError::Fetch)?;
    Ok(Json(rows))
}

async fn submit_score(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse, ApiError> {
    let submission = parse_submission(&body)?;
    state.store.insert(&submission.name, submission.score).map_err(ApiError::Save)?;
    info!(name = %submission.name, score = submission.score, "score saved");
    Ok((StatusCode::CREATED, Json(json!({ "message": "Score saved" }))))
}

pub fn router(store: Arc<dyn ScoreStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/scores", get(list_scores).post(submit_score))
        .with_state(AppState { store })
        .layer(cors)
}
