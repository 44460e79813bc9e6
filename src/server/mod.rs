use crate::config::BridgeConfig;
use crate::domain::{MirrorJob, PipelineEvent, StatusJob};
use crate::utils::error::Result;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub mirror_tx: mpsc::Sender<MirrorJob>,
    pub status_tx: mpsc::Sender<StatusJob>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/:repo/github", post(github_webhook))
        .route("/:repo/gitlab", post(gitlab_webhook))
        .with_state(state)
}

pub async fn serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Webhook server listening on {}", addr);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "OK"
}

/// `POST /:repo/github` — push and pull_request events queue a mirror
/// sync; everything else is acknowledged and ignored.
async fn github_webhook(
    State(state): State<AppState>,
    Path(repo): Path<String>,
    headers: HeaderMap,
    Json(_payload): Json<serde_json::Value>,
) -> Response {
    if state.config.repos.get(&repo).is_none() {
        return (StatusCode::NOT_FOUND, "Unknown repository").into_response();
    }

    let Some(event) = header_value(&headers, "x-github-event") else {
        return (StatusCode::BAD_REQUEST, "Missing x-github-event header").into_response();
    };

    match event.as_str() {
        "push" | "pull_request" => {
            tracing::info!("Handling GitHub {} event for '{}'", event, repo);
            if state
                .mirror_tx
                .send(MirrorJob { repo_name: repo })
                .await
                .is_err()
            {
                tracing::error!("Mirror worker is gone, dropping job");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Worker unavailable").into_response();
            }
        }
        other => tracing::info!("Ignoring GitHub event '{}' for '{}'", other, repo),
    }

    (StatusCode::OK, "OK").into_response()
}

/// `POST /:repo/gitlab` — Pipeline Hook events queue a status update.
async fn gitlab_webhook(
    State(state): State<AppState>,
    Path(repo): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    if state.config.repos.get(&repo).is_none() {
        return (StatusCode::NOT_FOUND, "Unknown repository").into_response();
    }

    let Some(event) = header_value(&headers, "x-gitlab-event") else {
        return (StatusCode::BAD_REQUEST, "Missing x-gitlab-event header").into_response();
    };

    match event.as_str() {
        "Pipeline Hook" => {
            tracing::info!("Handling GitLab pipeline event for '{}'", repo);
            let event: PipelineEvent = match serde_json::from_value(payload) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Malformed pipeline payload for '{}': {}", repo, e);
                    return (StatusCode::BAD_REQUEST, "Malformed pipeline payload")
                        .into_response();
                }
            };
            if state
                .status_tx
                .send(StatusJob {
                    repo_name: repo,
                    event,
                })
                .await
                .is_err()
            {
                tracing::error!("Status worker is gone, dropping job");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Worker unavailable").into_response();
            }
        }
        other => tracing::info!("Ignoring GitLab event '{}' for '{}'", other, repo),
    }

    (StatusCode::OK, "OK").into_response()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
