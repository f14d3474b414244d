//! Route configuration for the log API.

use std::sync::Arc;

use axum::routing::{get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers::{get_facets, health_check, ingest_log, query_logs};
use crate::state::AppState;

/// Create the log API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(state.config());

    Router::new()
        .route("/health", get(health_check))
        .route("/logs", get(query_logs).post(ingest_log))
        .route("/logs/facets", get(get_facets))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn make_test_router() -> Router {
        let config = ServerConfig::default().with_ephemeral(true);
        let state = AppState::open(config).expect("open state");
        create_router(Arc::new(state))
    }

    fn sample_log(level: &str, timestamp: &str) -> Value {
        json!({
            "level": level,
            "message": "Failed to connect to DB",
            "resourceId": "server-1234",
            "timestamp": timestamp,
            "traceId": "abc-xyz-123",
            "spanId": "span-456",
            "commit": "5e5342f",
            "metadata": { "parentResourceId": "server-0987" }
        })
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/logs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("request")
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = make_test_router();

        let (status, json) = send(&app, get_uri("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["message"], "Server is running");
    }

    #[tokio::test]
    async fn test_ingest_returns_created_record() {
        let app = make_test_router();
        let log = sample_log("error", "2023-09-15T08:00:00Z");

        let (status, json) = send(&app, post(log.to_string())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json, log);
    }

    #[tokio::test]
    async fn test_ingest_normalizes_level() {
        let app = make_test_router();
        let log = sample_log("ERROR", "2023-09-15T08:00:00Z");

        let (status, json) = send(&app, post(log.to_string())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["level"], "error");
    }

    #[tokio::test]
    async fn test_ingest_invalid_level_is_rejected() {
        let app = make_test_router();
        let log = sample_log("fatal", "2023-09-15T08:00:00Z");

        let (status, json) = send(&app, post(log.to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "Invalid log entry");
        assert_eq!(
            json["details"],
            json!(["Invalid level. Must be one of: error, warn, info, debug"])
        );

        let (_, logs) = send(&app, get_uri("/logs")).await;
        assert_eq!(logs, json!([]));
    }

    #[tokio::test]
    async fn test_ingest_missing_fields_are_listed() {
        let app = make_test_router();

        let (status, json) = send(&app, post(r#"{"level":"info"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"].as_array().expect("details").len(), 7);
        assert_eq!(json["details"][0], "Missing required field: message");
    }

    #[tokio::test]
    async fn test_ingest_empty_body_is_rejected() {
        let app = make_test_router();

        for body in ["", "  \n", "{}", "[]", "null"] {
            let (status, json) = send(&app, post(body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(json["message"], "Request body is missing or empty");
        }
    }

    #[tokio::test]
    async fn test_ingest_malformed_json_is_rejected() {
        let app = make_test_router();

        let (status, json) = send(&app, post(r#"{"level": "#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Bad Request");
        assert!(json["message"]
            .as_str()
            .expect("message")
            .starts_with("Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_query_filters_and_sorts() {
        let app = make_test_router();
        for (level, timestamp) in [
            ("info", "2023-09-15T08:00:00Z"),
            ("error", "2023-09-15T10:00:00Z"),
            ("info", "2023-09-15T09:00:00Z"),
        ] {
            let (status, _) = send(&app, post(sample_log(level, timestamp).to_string())).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, all) = send(&app, get_uri("/logs")).await;
        assert_eq!(status, StatusCode::OK);
        let timestamps: Vec<&str> = all
            .as_array()
            .expect("array")
            .iter()
            .map(|l| l["timestamp"].as_str().expect("timestamp"))
            .collect();
        assert_eq!(
            timestamps,
            [
                "2023-09-15T10:00:00Z",
                "2023-09-15T09:00:00Z",
                "2023-09-15T08:00:00Z"
            ]
        );

        let (_, info) = send(&app, get_uri("/logs?level=INFO")).await;
        assert_eq!(info.as_array().expect("array").len(), 2);

        let (_, windowed) = send(
            &app,
            get_uri("/logs?timestamp_start=2023-09-15T09:00:00Z&timestamp_end=2023-09-15T10:00:00Z"),
        )
        .await;
        assert_eq!(windowed.as_array().expect("array").len(), 2);
    }

    #[tokio::test]
    async fn test_query_ignores_empty_and_unparsable_params() {
        let app = make_test_router();
        send(&app, post(sample_log("warn", "2023-09-15T08:00:00Z").to_string())).await;

        let (status, logs) =
            send(&app, get_uri("/logs?level=&message=&timestamp_start=yesterday")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(logs.as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn test_query_repeated_key_uses_last_value() {
        let app = make_test_router();
        send(&app, post(sample_log("info", "2023-09-15T08:00:00Z").to_string())).await;
        send(&app, post(sample_log("error", "2023-09-15T09:00:00Z").to_string())).await;

        let (status, logs) = send(&app, get_uri("/logs?level=info&level=error")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(logs.as_array().expect("array").len(), 1);
        assert_eq!(logs[0]["level"], "error");

        let (status, facets) = send(&app, get_uri("/logs/facets?level=error&level=info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(facets["total"], 1);
        assert_eq!(facets["levels"]["info"], 1);
    }

    #[tokio::test]
    async fn test_query_blank_level_matches_nothing() {
        let app = make_test_router();
        send(&app, post(sample_log("info", "2023-09-15T08:00:00Z").to_string())).await;

        for uri in ["/logs?level=%20", "/logs?level=%2C", "/logs?level=info%20"] {
            let (status, logs) = send(&app, get_uri(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(logs, json!([]), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_query_substring_fields() {
        let app = make_test_router();
        send(&app, post(sample_log("warn", "2023-09-15T08:00:00Z").to_string())).await;

        let (_, hit) = send(&app, get_uri("/logs?resourceId=SERVER-12&traceId=xyz")).await;
        let (_, miss) = send(&app, get_uri("/logs?resourceId=server-12&commit=zzz")).await;

        assert_eq!(hit.as_array().expect("array").len(), 1);
        assert_eq!(miss, json!([]));
    }

    #[tokio::test]
    async fn test_facets_endpoint() {
        let app = make_test_router();
        for level in ["error", "error", "info"] {
            send(&app, post(sample_log(level, "2023-09-15T08:00:00Z").to_string())).await;
        }

        let (status, json) = send(&app, get_uri("/logs/facets")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 3);
        assert_eq!(json["levels"]["error"], 2);
        assert_eq!(json["levels"]["info"], 1);
        assert_eq!(json["levels"]["debug"], 0);
        assert_eq!(json["resources"]["server-1234"], 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = make_test_router();

        let response = app
            .oneshot(get_uri("/nope"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let app = make_test_router();
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("response");

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
