//! HTTP request handlers for the log API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use logscope_core::{Facets, FilterParams, LogRecord};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: String,
    /// Human-readable status.
    pub message: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

/// Handle GET /health - health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Server is running".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Handle POST /logs - ingest a single log entry.
///
/// The body is parsed here rather than through the `Json` extractor so an
/// empty or malformed body gets the same error shape as a validation failure.
pub async fn ingest_log(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<LogRecord>)> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServerError::EmptyBody);
    }

    let payload: Value =
        serde_json::from_slice(&body).map_err(|e| ServerError::MalformedBody(e.to_string()))?;

    // Appending rewrites the data file, keep it off the async workers.
    let service = state.service().clone();
    let record = tokio::task::spawn_blocking(move || service.ingest(&payload))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Raw query-string pairs, in order of appearance.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Turns the query string into filter parameters.
///
/// Pairs are taken as a list so a repeated key resolves to its last value
/// instead of failing the whole request.
fn filter_params(query: QueryPairs) -> ServerResult<FilterParams> {
    let Query(pairs) = query.map_err(|e| ServerError::InvalidQuery(e.body_text()))?;
    Ok(FilterParams::from_pairs(pairs))
}

/// Handle GET /logs - filtered records, most recent first.
pub async fn query_logs(
    State(state): State<Arc<AppState>>,
    query: QueryPairs,
) -> ServerResult<Json<Vec<LogRecord>>> {
    let params = filter_params(query)?;
    Ok(Json(state.service().query(&params)))
}

/// Handle GET /logs/facets - level and resource counts for a filter.
pub async fn get_facets(
    State(state): State<Arc<AppState>>,
    query: QueryPairs,
) -> ServerResult<Json<Facets>> {
    let params = filter_params(query)?;
    Ok(Json(state.service().facets(&params)))
}
