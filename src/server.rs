use axum::{
    extract::State,
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;

use crate::auth::{auth_middleware, BearerToken};
use crate::error::{Error, Result};
use crate::logging::middleware::{access_log_middleware, request_id_middleware};
use crate::models::SynthesizeRequest;
use crate::tts::Synthesizer;

// Shared application state; read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<dyn Synthesizer>,
    pub token: BearerToken,
    pub slow_request_threshold: Duration,
}

impl AppState {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, token: BearerToken) -> Self {
        Self {
            synthesizer,
            token,
            slow_request_threshold: Duration::from_secs(5),
        }
    }

    pub fn with_slow_request_threshold(mut self, threshold: Duration) -> Self {
        self.slow_request_threshold = threshold;
        self
    }
}

// HTTP Handlers

/// Liveness probe, no authentication
async fn health_check() -> &'static str {
    "ok"
}

/// Forward one SSML document to the backend and return MP3 bytes
async fn synthesize(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let req: SynthesizeRequest = serde_json::from_slice(&body)
        .map_err(|_| Error::InvalidRequest("invalid request body".to_string()))?;

    tracing::debug!(
        "Synthesize request - ssml_len={}, speaking_rate={}",
        req.ssml.len(),
        req.speaking_rate
    );

    if req.ssml.is_empty() {
        return Err(Error::EmptySsml);
    }

    let audio = state
        .synthesizer
        .synthesize(&req.ssml, req.effective_rate().unwrap_or(0.0))
        .await
        .map_err(|e| {
            tracing::warn!(backend = state.synthesizer.name(), "Synthesis failed: {}", e);
            match e {
                Error::Backend(msg) => Error::Backend(msg),
                other => Error::Backend(other.to_string()),
            }
        })?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// Create and configure the proxy router
pub fn create_router(state: AppState) -> Router<()> {
    let v1 = Router::new()
        .route("/synthesize", post(synthesize))
        .route_layer(middleware::from_fn_with_state(
            state.token.clone(),
            auth_middleware,
        ));

    let slow_request_threshold = state.slow_request_threshold;

    Router::new()
        .route("/health", get(health_check))
        .nest("/v1", v1)
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn_with_state(
            slow_request_threshold,
            access_log_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
}

/// Human-readable summary printed when the proxy starts
pub fn startup_banner(transport: &str) -> String {
    format!(
        "tts-proxy v{}\nListening: {}\n\nAvailable endpoints:\n  GET    /health          - Health check (no auth)\n  POST   /v1/synthesize   - SSML to MP3 (Authorization: Bearer <token>)",
        env!("CARGO_PKG_VERSION"),
        transport
    )
}
