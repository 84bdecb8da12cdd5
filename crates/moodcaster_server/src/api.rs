//! HTTP API for cast generation and health checks.

use crate::{EndpointConfig, GenerationPipeline};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use moodcaster_core::{GenerationRequest, GenerationResult};
use moodcaster_error::GenerationError;
use moodcaster_models::{ChatBackend, OpenAICompatibleClient};
use serde::Serialize;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, instrument, warn};

#[cfg(feature = "metrics")]
use crate::metrics::GenerationMetrics;

/// API server state.
#[derive(Clone)]
pub struct AppState {
    /// Immutable endpoint configuration
    pub config: Arc<EndpointConfig>,
    /// Generation pipeline shared by every request
    pub pipeline: GenerationPipeline,
    /// Metrics instruments
    #[cfg(feature = "metrics")]
    pub metrics: Arc<GenerationMetrics>,
}

impl AppState {
    /// Creates state around an explicit backend.
    pub fn new(config: EndpointConfig, backend: Option<Arc<dyn ChatBackend>>) -> Self {
        let pipeline = GenerationPipeline::new(backend, *config.upstream_timeout());
        Self {
            config: Arc::new(config),
            pipeline,
            #[cfg(feature = "metrics")]
            metrics: Arc::new(GenerationMetrics::new()),
        }
    }

    /// Creates state with an OpenAI-compatible client when an API key is configured.
    pub fn from_config(config: EndpointConfig) -> Self {
        let backend = config.api_key().as_ref().map(|api_key| {
            let client = OpenAICompatibleClient::new(
                api_key.clone(),
                config.model().clone(),
                config.upstream_url().clone(),
                "groq",
                *config.upstream_timeout(),
            )
            .with_streaming(*config.stream());
            Arc::new(client) as Arc<dyn ChatBackend>
        });
        if backend.is_none() {
            warn!("GROQ_API_KEY is not set; generation requests will fail");
        }
        Self::new(config, backend)
    }
}

/// Creates the API router.
///
/// Every response, including method mismatches, unknown routes and caught
/// panics, carries a JSON body.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/generate",
            post(generate).fallback(method_not_allowed),
        )
        .route("/api/health", get(health_check).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// JSON error body `{ error, detail? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ApiError {
    /// Creates an error response.
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            detail: None,
        }
    }

    /// Attaches a detail message.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid request body")
            .with_detail(rejection.body_text())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let kind = err.kind();
        let status = StatusCode::from_u16(kind.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, kind.to_string())
    }
}

/// Cast generation endpoint.
#[instrument(skip_all)]
async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    #[cfg(feature = "metrics")]
    let started = std::time::Instant::now();

    let outcome = match body {
        Ok(Json(request)) => state
            .pipeline
            .run(&request)
            .await
            .map(|result| (request, result))
            .map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };

    match outcome {
        Ok((_request, result)) => {
            #[cfg(feature = "metrics")]
            state.metrics.record_served(
                &_request.category,
                result.fallback,
                started.elapsed().as_secs_f64(),
            );
            Ok(Json(result))
        }
        Err(err) => {
            warn!(status = err.status.as_u16(), error = %err.error, "Rejected generation request");
            #[cfg(feature = "metrics")]
            state.metrics.record_rejection(err.status.as_u16());
            Err(err)
        }
    }
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "model": state.config.model() })),
    )
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!(detail = %detail, "Handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Unhandled error")
        .with_detail(detail)
        .into_response()
}
