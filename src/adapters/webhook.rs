//! Webhook HTTP server.
//!
//! Accepts source-control push notifications, pulls the watched checkout,
//! and schedules a commit emissions job without blocking the response.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::adapters::git::SourceUpdater;
use crate::domain::models::ChangeSet;
use crate::services::job_queue::{JobQueue, JobRequest, SubmitError};

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Shared state for the webhook server.
#[derive(Clone)]
pub struct AppState {
    pub queue: JobQueue,
    pub updater: Arc<SourceUpdater>,
    pub repo_folder: PathBuf,
    pub pull_on_push: bool,
}

/// Build the webhook router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

/// A push event extracted from the webhook payload.
#[derive(Debug)]
struct PushEvent {
    repo_name: String,
    changeset: ChangeSet,
}

/// Extract the most recent commit's change lists and the repository name,
/// naming the first missing field on failure.
fn extract_push(payload: &Value) -> Result<PushEvent, String> {
    let commits = payload
        .get("commits")
        .and_then(Value::as_array)
        .ok_or("commits")?;
    let latest = commits.first().ok_or("commits")?;

    let repo_name = payload
        .get("repository")
        .ok_or("repository")?
        .get("name")
        .and_then(Value::as_str)
        .ok_or("repository.name")?
        .to_string();

    let paths = |key: &str| -> Vec<String> {
        latest
            .get(key)
            .and_then(Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    Ok(PushEvent {
        repo_name,
        changeset: ChangeSet::new(paths("modified"), paths("added")),
    })
}

async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, String), (StatusCode, Json<ErrorResponse>)> {
    let event = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if event != "push" {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "not a push event".to_string(),
                code: "NOT_PUSH".to_string(),
            }),
        ));
    }

    let push = extract_push(&payload).map_err(|missing| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("missing required field: {missing}"),
                code: "MISSING_FIELD".to_string(),
            }),
        )
    })?;

    info!(
        repo_name = %push.repo_name,
        modified = push.changeset.modified.len(),
        added = push.changeset.added.len(),
        "push event received"
    );

    // Update the checkout before the job reads from it. The response does
    // not depend on the outcome; a stale checkout is still measurable.
    if state.pull_on_push {
        state.updater.pull().await;
    }

    let request = JobRequest::new(
        state.repo_folder.clone(),
        push.changeset,
        push.repo_name,
    );

    match state.queue.submit(request) {
        Ok(()) => Ok((
            StatusCode::OK,
            "Webhook received. Processing emissions in the background.".to_string(),
        )),
        Err(e @ SubmitError::QueueFull) => {
            warn!("job queue full, rejecting push event");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: "QUEUE_FULL".to_string(),
                }),
            ))
        }
        Err(e @ SubmitError::Closed) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
                code: "QUEUE_CLOSED".to_string(),
            }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_commit_and_repo_name() {
        let payload = json!({
            "repository": {"name": "emission_monitor"},
            "commits": [
                {"modified": ["tests/test_foo.py"], "added": ["src/bar.py"]},
                {"modified": ["ignored.py"], "added": []}
            ]
        });

        let push = extract_push(&payload).unwrap();
        assert_eq!(push.repo_name, "emission_monitor");
        assert_eq!(push.changeset.modified, vec!["tests/test_foo.py"]);
        assert_eq!(push.changeset.added, vec!["src/bar.py"]);
    }

    #[test]
    fn missing_commits_names_the_field() {
        let payload = json!({"repository": {"name": "r"}});
        assert_eq!(extract_push(&payload).unwrap_err(), "commits");
    }

    #[test]
    fn empty_commits_names_the_field() {
        let payload = json!({"repository": {"name": "r"}, "commits": []});
        assert_eq!(extract_push(&payload).unwrap_err(), "commits");
    }

    #[test]
    fn missing_repository_name_names_the_field() {
        let payload = json!({"commits": [{}], "repository": {}});
        assert_eq!(extract_push(&payload).unwrap_err(), "repository.name");
    }

    #[test]
    fn absent_change_lists_default_to_empty() {
        let payload = json!({
            "repository": {"name": "r"},
            "commits": [{}]
        });
        let push = extract_push(&payload).unwrap();
        assert!(push.changeset.modified.is_empty());
        assert!(push.changeset.added.is_empty());
    }
}
