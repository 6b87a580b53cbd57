mod ingestion;
mod intake;
mod read;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use sigdb_analyzer::AnalyzerClient;
use sigdb_core::Channel;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub analyzer: Arc<AnalyzerClient>,
    pub placeholder_avatar_url: Arc<str>,
}

/// Response envelope shared by the intake and callback endpoints. Matches
/// the client contract: `{success, message, channel?, action?}`, with
/// `action` carrying UI hints the front-end keys off.
#[derive(Debug, Serialize)]
pub struct PipelineResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError {
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new("invalid_input", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code {
            "invalid_input" | "missing_payload" | "invalid_signal_value" => {
                StatusCode::BAD_REQUEST
            }
            "store_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(PipelineResponse {
                success: false,
                message: self.message,
                channel: None,
                action: None,
            }),
        )
            .into_response()
    }
}

/// Maps a store error onto the wire: unavailability is a 503 the caller can
/// retry; anything else is a 500 with the message kept for diagnostics.
pub(super) fn map_db_error(request_id: &str, error: &sigdb_db::DbError) -> ApiError {
    if error.is_unavailable() {
        tracing::warn!(request_id, error = %error, "database unavailable");
        return ApiError::new("store_unavailable", "Database service is unavailable.");
    }
    tracing::error!(request_id, error = %error, "database query failed");
    ApiError::new("internal_error", error.to_string())
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn rate_limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/channels/analyze", post(intake::analyze_channel))
        .route(
            "/api/v1/analysis/callback",
            post(ingestion::analysis_callback),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let read_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/channels", get(read::list_channels))
        .route("/api/v1/signals", get(read::list_signals));

    Router::new()
        .merge(read_routes)
        .merge(rate_limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match sigdb_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
