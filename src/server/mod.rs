//! Async HTTP Ingestion Server
//!
//! The ingestion layer in front of the inference engine:
//!
//! - `POST /usage` - smartphone usage payload; fuses the last known room
//!   reading, runs inference, appends a log row
//! - `POST /sensor` - room reading from the sensor node (or the simulator)
//! - `GET /infer` - ad-hoc inference from query parameters, nothing logged
//! - `GET /health`, `GET /stats` - liveness and counters
//!
//! The engine never fails a request; HTTP errors only arise from malformed
//! payloads, and carry the coded JSON body from [`crate::error`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

use crate::config::StresswatchConfig;
use crate::error::StressError;
use crate::fuzzy::engine::StressEngine;
use crate::sensor::{RoomReading, SensorState};
use crate::store::{AssessmentLog, AssessmentRecord};
use crate::usage::{self, ScreenTimeLevel, UsagePayload};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// The immutable inference engine, shared by all requests.
    pub engine: StressEngine,
    /// Last-known room sensor state.
    pub sensors: RwLock<SensorState>,
    /// Append-only assessment log.
    pub log: Mutex<AssessmentLog>,
    /// Full configuration the server was started with.
    pub config: StresswatchConfig,
}

impl AppState {
    pub fn new(config: StresswatchConfig) -> crate::error::Result<Self> {
        let log = AssessmentLog::open(&config.store.path)?;
        Ok(Self {
            engine: config.engine.build(),
            sensors: RwLock::new(SensorState::new(config.sensor.default_reading())),
            log: Mutex::new(log),
            config,
        })
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<AppState>;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for `GET /infer`.
#[derive(Debug, Deserialize)]
pub struct InferParams {
    screen: Option<f64>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    air_quality: Option<f64>,
}

/// Error response carrying the coded JSON body.
pub struct ApiError(StressError);

impl From<StressError> for ApiError {
    fn from(err: StressError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            self.0.to_json(),
        )
            .into_response()
    }
}

fn json_response(value: serde_json::Value) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        value.to_string(),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Handle `POST /usage`.
async fn receive_usage(
    State(state): State<SharedState>,
    body: String,
) -> Result<Response, ApiError> {
    if body.trim().is_empty() {
        return Err(StressError::empty_input("request body").into());
    }
    let payload: UsagePayload = serde_json::from_str(&body)
        .map_err(|e| StressError::validation(format!("invalid usage payload: {e}")))?;

    let total_hours = usage::hours(payload.total_screen_time_s);
    let level = ScreenTimeLevel::from_hours(total_hours);
    info!(
        total_screen_time = %usage::format_hms(payload.total_screen_time_s),
        apps = payload.usage_data.len(),
        level = level.as_str(),
        "received usage payload"
    );
    for app in &payload.usage_data {
        debug!(
            app = app.app_name(),
            package = %app.package,
            usage = %usage::format_hms(app.foreground_time_s),
            "app usage"
        );
    }

    let sample = {
        let sensors = state.sensors.read().await;
        sensors.latest(state.config.sensor.max_age())
    };
    if sample.freshness.is_stale() {
        warn!(
            freshness = sample.freshness.as_str(),
            "assessing with a non-fresh sensor reading"
        );
    }

    let assessment = state.engine.infer(
        total_hours,
        sample.reading.temperature,
        sample.reading.humidity,
        sample.reading.air_quality,
    );

    let record = AssessmentRecord::new(
        (
            total_hours,
            sample.reading.temperature,
            sample.reading.humidity,
            sample.reading.air_quality,
        ),
        &assessment,
        sample.freshness,
    );
    // A failed log write must not fail the assessment.
    if let Err(e) = state.log.lock().await.append(&record) {
        error!(error = %e, "failed to append assessment record");
    }

    Ok(json_response(serde_json::json!({
        "status": "ok",
        "total_apps": payload.usage_data.len(),
        "total_usage": usage::format_hms(payload.total_screen_time_s),
        "screen_time_level": level.as_str(),
        "assessment": assessment,
        "sensor": {
            "freshness": sample.freshness.as_str(),
            "temperature": sample.reading.temperature,
            "humidity": sample.reading.humidity,
            "air_quality": sample.reading.air_quality,
        },
    })))
}

/// Handle `POST /sensor`.
async fn receive_sensor(
    State(state): State<SharedState>,
    body: String,
) -> Result<Response, ApiError> {
    if body.trim().is_empty() {
        return Err(StressError::empty_input("request body").into());
    }
    let reading: RoomReading = serde_json::from_str(&body)
        .map_err(|e| StressError::validation(format!("invalid sensor payload: {e}")))?;
    if !reading.is_finite() {
        return Err(StressError::invalid_value("sensor reading", "non-finite field").into());
    }

    info!(
        temperature = reading.temperature,
        humidity = reading.humidity,
        air_quality = reading.air_quality,
        "received room reading"
    );
    state.sensors.write().await.update(reading);

    Ok(json_response(serde_json::json!({
        "status": "ok",
        "received": reading,
    })))
}

/// Handle `GET /infer?screen=..&temperature=..&humidity=..&air_quality=..`
///
/// Ad-hoc inference: nothing is logged and the sensor state is untouched.
async fn infer_get(
    State(state): State<SharedState>,
    Query(params): Query<InferParams>,
) -> Result<Response, ApiError> {
    let screen = params.screen.ok_or_else(|| StressError::missing("screen"))?;
    let temperature = params
        .temperature
        .ok_or_else(|| StressError::missing("temperature"))?;
    let humidity = params
        .humidity
        .ok_or_else(|| StressError::missing("humidity"))?;
    let air_quality = params
        .air_quality
        .ok_or_else(|| StressError::missing("air_quality"))?;

    let assessment = state.engine.infer(screen, temperature, humidity, air_quality);
    Ok(json_response(serde_json::to_value(assessment).map_err(
        |e| StressError::internal(e.to_string()),
    )?))
}

/// Serve a short HTML description at `/`.
async fn index_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>stresswatch</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
               max-width: 700px; margin: 50px auto; padding: 20px; }
        code { background: #f5f5f5; padding: 2px 4px; }
    </style>
</head>
<body>
    <h1>stresswatch</h1>
    <p>Screen-time and room-environment stress assessment.</p>
    <h3>Endpoints</h3>
    <ul>
        <li><code>POST /usage</code> - smartphone usage payload, returns the assessment</li>
        <li><code>POST /sensor</code> - room sensor reading (temperature, humidity, air quality)</li>
        <li><code>GET /infer?screen=&amp;temperature=&amp;humidity=&amp;air_quality=</code> - ad-hoc inference</li>
        <li><code>GET /health</code> - health check</li>
        <li><code>GET /stats</code> - server statistics</li>
    </ul>
</body>
</html>"#,
    )
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Server statistics endpoint.
async fn stats(State(state): State<SharedState>) -> impl IntoResponse {
    let assessments = state.log.lock().await.len();
    let (freshness, last_updated) = {
        let sensors = state.sensors.read().await;
        let sample = sensors.latest(state.config.sensor.max_age());
        (
            sample.freshness.as_str(),
            sensors.last_updated().map(|t| t.to_rfc3339()),
        )
    };

    json_response(serde_json::json!({
        "status": "ok",
        "assessments_logged": assessments,
        "sensor": {
            "freshness": freshness,
            "last_updated": last_updated,
        },
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Server Setup
// ============================================================================

/// Create the router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .route("/", get(index_page))
        .route("/usage", post(receive_usage))
        .route("/sensor", post(receive_sensor))
        .route("/infer", get(infer_get))
        .route("/health", get(health_check))
        .route("/stats", get(stats))
        .layer(DefaultBodyLimit::max(state.config.server.max_body_size));

    if state.config.server.cors_enabled {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_origin(Any)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
        router = router.layer(cors);
    }

    router.with_state(state)
}

/// Run the HTTP server until shut down (ctrl-c).
pub async fn run_server(config: StresswatchConfig) -> crate::error::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| StressError::config(format!("invalid bind address: {e}")))?;

    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StressError::network(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, "stresswatch server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StressError::network(e.to_string()))?;

    info!("server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (ctrl-c).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install ctrl-c handler");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::path::PathBuf;
    use tower::util::ServiceExt;

    fn test_state(name: &str) -> SharedState {
        let mut path = std::env::temp_dir();
        path.push(format!("stresswatch-server-{name}-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut config = StresswatchConfig::default();
        config.store.path = PathBuf::from(path);
        Arc::new(AppState::new(config).unwrap())
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state("health"));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_page() {
        let app = create_router(test_state("index"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_router(test_state("stats"));

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["assessments_logged"], 0);
        assert_eq!(json["sensor"]["freshness"], "missing");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_sensor_post_updates_state() {
        let state = test_state("sensor");
        let app = create_router(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sensor")
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        r#"{"temperature": 26.5, "humidity": 70.0, "air_quality": 1.2}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["received"]["temperature"], 26.5);

        let sensors = state.sensors.read().await;
        let sample = sensors.latest(state.config.sensor.max_age());
        assert_eq!(sample.reading.temperature, 26.5);
        assert!(!sample.freshness.is_stale());
    }

    #[tokio::test]
    async fn test_sensor_post_rejects_malformed_payload() {
        let app = create_router(test_state("sensor-bad"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sensor")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"temperature": "warm"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_usage_post_returns_assessment() {
        let app = create_router(test_state("usage"));

        let payload = r#"{
            "total_screen_time_s": 7200,
            "usage_data": [
                {"package": "com.whatsapp", "foreground_time_s": 3600},
                {"package": "com.google.android.youtube", "foreground_time_s": 3600}
            ]
        }"#;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/usage")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["total_apps"], 2);
        assert_eq!(json["total_usage"], "2 h 0 min 0 s");
        assert_eq!(json["screen_time_level"], "Low");
        // No sensor reading yet: defaults were used and flagged.
        assert_eq!(json["sensor"]["freshness"], "missing");
        assert!(json["assessment"]["stress_value"].is_number());
        assert!(json["assessment"]["category"].is_string());
    }

    #[tokio::test]
    async fn test_usage_after_sensor_uses_fresh_reading() {
        let state = test_state("usage-fresh");

        let sensor_req = Request::builder()
            .method("POST")
            .uri("/sensor")
            .header("Content-Type", "application/json")
            .body(Body::from(
                r#"{"temperature": 24.0, "humidity": 50.0, "air_quality": 0.2}"#,
            ))
            .unwrap();
        let response = create_router(state.clone()).oneshot(sensor_req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let usage_req = Request::builder()
            .method("POST")
            .uri("/usage")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"total_screen_time_s": 3600, "usage_data": []}"#))
            .unwrap();
        let response = create_router(state.clone()).oneshot(usage_req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["sensor"]["freshness"], "fresh");
        assert_eq!(json["sensor"]["temperature"], 24.0);
        // One hour in a comfortable room: low stress.
        assert_eq!(json["assessment"]["category"], "Low");

        // The assessment was appended to the log.
        assert_eq!(state.log.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_usage_post_rejects_empty_body() {
        let app = create_router(test_state("usage-empty"));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/usage")
                    .header("Content-Type", "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "EMPTY_INPUT");
    }

    #[tokio::test]
    async fn test_infer_get() {
        let app = create_router(test_state("infer"));

        let query = "screen=3&temperature=24&humidity=50&air_quality=0.1";
        let uri = format!("/infer?{query}");

        let response = app
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["category"], "Low");
        assert!((json["stress_value"].as_f64().unwrap() - 20.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_infer_get_with_encoded_params() {
        let app = create_router(test_state("infer-encoded"));

        let uri = format!(
            "/infer?screen={}&temperature=25&humidity=95&air_quality=0.1",
            urlencoding::encode("2.0")
        );
        let response = app
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["category"], "Medium");
    }

    #[tokio::test]
    async fn test_infer_get_missing_parameter() {
        let app = create_router(test_state("infer-missing"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/infer?screen=3&temperature=24")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "MISSING_REQUIRED");
    }
}
