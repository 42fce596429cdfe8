//! IndexNow HTTP API
//!
//! Thin JSON wrappers over [`Notifier`] for the content tooling that
//! publishes posts.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use siteseo_indexnow::{EngineResult, Notifier, PingOutcome};
use tower_http::trace::TraceLayer;

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct AppState {
    /// IndexNow client.
    pub notifier: Arc<Notifier>,

    /// Directory holding the key file and the changed-URL list.
    pub output_dir: PathBuf,
}

impl AppState {
    /// Create state for `notifier`, reading and writing under `output_dir`.
    pub fn new(notifier: Notifier, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            notifier: Arc::new(notifier),
            output_dir: output_dir.into(),
        }
    }

    fn changes_file(&self) -> PathBuf {
        self.output_dir.join(&self.notifier.config().changes.file)
    }
}

/// Body of `POST /api/indexnow/ping`.
#[derive(Debug, Deserialize)]
pub struct PingRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Body of `POST /api/indexnow/ping/blog`.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub slugs: Vec<String>,
}

/// Response body of every ping route.
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<EngineResult>,
}

impl From<PingOutcome> for PingResponse {
    fn from(outcome: PingOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            results: outcome.results,
        }
    }
}

/// Request failure, answered as `{success: false, error}`.
///
/// Internal failures use `500`; rejected request bodies keep the status axum
/// assigned to the rejection.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(error = %self.message, "IndexNow API request failed");
        } else {
            tracing::warn!(status = %self.status, error = %self.message, "IndexNow API request rejected");
        }

        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/indexnow/ping", post(ping_urls))
        .route("/api/indexnow/ping/blog", post(ping_blog_posts))
        .route("/api/indexnow/ping/blog/{slug}", post(ping_blog_post))
        .route("/api/indexnow/ping/pages", post(ping_site_pages))
        .route("/api/indexnow/ping/changed", post(ping_changed))
        .route("/api/indexnow/key", get(key_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ping_urls(
    State(state): State<AppState>,
    body: Result<Json<PingRequest>, JsonRejection>,
) -> Result<Json<PingResponse>, ApiError> {
    let Json(body) = body?;
    Ok(Json(state.notifier.ping(&body.urls).await.into()))
}

async fn ping_blog_post(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
) -> Json<PingResponse> {
    Json(state.notifier.ping_blog_post(&slug).await.into())
}

async fn ping_blog_posts(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<PingResponse>, ApiError> {
    let Json(body) = body?;
    Ok(Json(state.notifier.ping_blog_posts(&body.slugs).await.into()))
}

async fn ping_site_pages(State(state): State<AppState>) -> Json<PingResponse> {
    Json(state.notifier.ping_site_pages().await.into())
}

async fn ping_changed(State(state): State<AppState>) -> Json<PingResponse> {
    let changes = state.changes_file();
    Json(state.notifier.ping_all_changed_urls(&changes).await.into())
}

/// Materialize `<key>.txt` in the output directory and return the key.
async fn key_file(State(state): State<AppState>) -> Result<Response, ApiError> {
    let key = state.notifier.key_file_contents();
    if key.is_empty() {
        return Err(ApiError::internal("IndexNow key is not configured"));
    }

    state
        .notifier
        .config()
        .index_now
        .validate_key()
        .map_err(|e| ApiError::internal(e.to_string()))?;

    write_key_file(&state.output_dir, &state.notifier.key_file_name(), key)
        .await
        .map_err(|e| ApiError::internal(format!("failed to write key file: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], key.to_string()).into_response())
}

async fn write_key_file(dir: &Path, name: &str, key: &str) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(name), key).await?;
    tracing::debug!(file = name, "wrote IndexNow key file");
    Ok(())
}
