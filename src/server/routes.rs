//! HTTP route handlers for the string index API.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures::stream;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::NeardexError;
use crate::metric::Metric;
use crate::server::AppState;
use crate::vptree::SearchOptions;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct KnnRequest {
    #[serde(default = "missing_k")]
    pub k: i64,
    #[serde(default)]
    pub query: String,
    #[serde(default = "unbounded")]
    pub maxdist: f64,
    #[serde(default)]
    pub regexp: String,
}

// k must be set by the caller; maxdist defaults to "find everything".
fn missing_k() -> i64 {
    -1
}

fn unbounded() -> f64 {
    f64::INFINITY
}

#[derive(Serialize)]
pub struct KnnResult {
    pub point: String,
    pub distance: f64,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub metric: &'static str,
    pub norm: &'static str,
    pub size: usize,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub metric: &'static str,
    pub distance: f64,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn internal(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/info", get(info))
        .route("/keys", get(keys))
        .route("/knn", post(knn))
        .route("/distance", post(distance))
        .with_state(state)
}

// --- Handlers ---

async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        metric: state.metric.name(),
        norm: state.norm_name(),
        size: state.tree.len(),
    })
}

/// Sends a JSON array of every indexed string, element by element, in
/// unspecified order.
async fn keys(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let n = state.tree.len();
    let mut chunks = Vec::with_capacity(n + 2);
    chunks.push("[".to_string());
    for (i, key) in state.tree.iter().enumerate() {
        if let Ok(mut encoded) = serde_json::to_string(key) {
            if i + 1 < n {
                encoded.push(',');
            }
            chunks.push(encoded);
        }
    }
    chunks.push("]".to_string());

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(stream::iter(chunks.into_iter().map(Ok::<_, Infallible>))),
    )
}

async fn knn(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KnnRequest>, JsonRejection>,
) -> Result<Json<Vec<KnnResult>>, HandlerError> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;

    if req.k < 0 {
        return Err(bad_request("missing or negative k"));
    }
    if req.query.is_empty() {
        return Err(bad_request("missing or empty query string"));
    }
    if req.maxdist < 0.0 {
        return Err(bad_request(format!(
            "negative maximum distance {}",
            req.maxdist
        )));
    }

    // The predicate runs against the stored, already-normalized strings.
    let predicate = match req.regexp.as_str() {
        "" => None,
        pattern => Some(Regex::new(pattern).map_err(|e| bad_request(e.to_string()))?),
    };

    let query = state.normalize(&req.query);
    let k = req.k as usize;
    let maxdist = req.maxdist;
    let deadline = Instant::now() + state.timeout;
    tracing::debug!(k, query = %query, maxdist, "knn search");

    let search_state = state.clone();
    let results = tokio::task::spawn_blocking(move || {
        let pred = predicate.map(|re| move |s: &str| re.is_match(s));

        let mut opts = SearchOptions::new(k);
        opts.max_dist = maxdist;
        opts.deadline = Some(deadline);
        opts.predicate = pred.as_ref().map(|p| p as &(dyn Fn(&str) -> bool + Sync));
        search_state.tree.search(&query, &opts)
    })
    .await
    .map_err(|e| internal(e.to_string()))?
    .map_err(|e| {
        let status = match e {
            NeardexError::Timeout => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: e.to_string() }))
    })?;

    Ok(Json(
        results
            .into_iter()
            .map(|n| KnnResult {
                point: n.point,
                distance: n.distance,
            })
            .collect(),
    ))
}

async fn distance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<(String, String)>, JsonRejection>,
) -> Result<Json<DistanceResponse>, HandlerError> {
    let Json((a, b)) = payload.map_err(|e| bad_request(e.body_text()))?;

    let (a, b) = (state.normalize(&a), state.normalize(&b));
    Ok(Json(DistanceResponse {
        metric: state.metric.name(),
        distance: state.metric.distance(&a, &b),
    }))
}
