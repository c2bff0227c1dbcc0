//! HTTP handlers.
//!
//! Implements:
//! - GET /api/github/file - Read a file and its revision
//! - POST /api/github/commit - Commit with optional expected revision
//! - POST /api/wechat/draft - Save rendered HTML as a WeChat draft
//! - POST /api/wechat/import-to-github - Commit imported markdown under a derived path
//! - GET /health - Health check endpoint

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use neurapress_core::{
    derive_path, CommitRequest, CommitResult, DraftResult, FileRequest, PathSettings, RemoteFile,
};
use neurapress_github::GitHubClient;
use neurapress_wechat::WeChatClient;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{ApiError, Result};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHubClient>,
    pub wechat: Arc<WeChatClient>,
    pub paths: PathSettings,
}

/// Build the router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/github/file", get(read_file_handler))
        .route("/api/github/commit", post(commit_handler))
        .route("/api/wechat/draft", post(draft_handler))
        .route("/api/wechat/import-to-github", post(import_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Health check response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    pub github_configured: bool,
    pub wechat_configured: bool,
}

/// GET /health - Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        github_configured: state.github.settings().is_configured(),
        wechat_configured: state.wechat.settings().is_configured(),
    })
}

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    path: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    revision: Option<String>,
}

/// GET /api/github/file
pub async fn read_file_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Json<RemoteFile>> {
    let path = required(query.path).ok_or(ApiError::Validation("path is required"))?;
    let request = FileRequest {
        path,
        owner: required(query.owner),
        repository: required(query.repo),
        branch: required(query.git_ref),
        revision: required(query.revision),
    };

    let file = state.github.read_file(&request).await?;
    Ok(Json(file))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitBody {
    path: Option<String>,
    content: Option<String>,
    message: Option<String>,
    branch: Option<String>,
    #[serde(alias = "expectedSha")]
    expected_revision: Option<String>,
}

/// POST /api/github/commit
pub async fn commit_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommitResult>> {
    let body: CommitBody = serde_json::from_slice(&body)?;
    let (Some(path), Some(content)) = (required(body.path), required(body.content)) else {
        return Err(ApiError::Validation("path and content are required"));
    };

    let request = CommitRequest {
        path,
        content,
        message: required(body.message),
        branch: required(body.branch),
        expected_revision: required(body.expected_revision),
    };

    let result = state.github.write_file(&request).await?;
    info!("Committed {} ({})", result.path, result.commit_id);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct DraftBody {
    html: Option<String>,
    title: Option<String>,
}

/// POST /api/wechat/draft
pub async fn draft_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DraftResult>> {
    let body: DraftBody = serde_json::from_slice(&body)?;
    let html = body.html.ok_or(ApiError::Validation("html is required"))?;
    if html.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    let result = state
        .wechat
        .publish_draft(&html, body.title.as_deref())
        .await?;
    info!("Saved WeChat draft {}", result.draft_id);
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBody {
    markdown: Option<String>,
    title: Option<String>,
    commit_message: Option<String>,
    branch: Option<String>,
}

/// POST /api/wechat/import-to-github
pub async fn import_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CommitResult>> {
    let body: ImportBody = serde_json::from_slice(&body)?;
    let markdown = required(body.markdown).ok_or(ApiError::Validation("markdown is required"))?;
    let title = required(body.title);

    let path = derive_path(title.as_deref(), &state.paths);
    let message = required(body.commit_message).unwrap_or_else(|| {
        format!("Import WeChat: {}", title.as_deref().unwrap_or(&path))
    });

    let request = CommitRequest {
        path,
        content: markdown,
        message: Some(message),
        branch: required(body.branch),
        expected_revision: None,
    };

    let result = state.github.write_file(&request).await?;
    info!("Imported article to {} ({})", result.path, result.commit_id);
    Ok(Json(result))
}
