use anyhow::Result;
use hookbridge::config::{GithubConfig, GitlabConfig, RepoConfig};
use hookbridge::domain::{MirrorJob, StatusJob};
use hookbridge::{build_router, AppState, BridgeConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn demo_config() -> BridgeConfig {
    let mut repos = HashMap::new();
    repos.insert(
        "demo".to_string(),
        RepoConfig {
            path: "/repo/demo".to_string(),
            github: GithubConfig {
                repo: "acme/demo".to_string(),
                access_token: "gh_tok".to_string(),
                api_base: "https://api.github.com".to_string(),
                clone_url: None,
            },
            gitlab: GitlabConfig {
                host: "gitlab.example.org".to_string(),
                repo: "mirrors/demo".to_string(),
                access_token: "gl_tok".to_string(),
                api_base: None,
                push_url: None,
                job_descriptions: HashMap::new(),
            },
        },
    );
    BridgeConfig { repos }
}

/// Bind the router on an ephemeral port and return its base URL plus the
/// receiving ends of both job queues.
async fn spawn_server() -> Result<(
    String,
    mpsc::Receiver<MirrorJob>,
    mpsc::Receiver<StatusJob>,
)> {
    let (mirror_tx, mirror_rx) = mpsc::channel(8);
    let (status_tx, status_rx) = mpsc::channel(8);
    let state = AppState {
        config: Arc::new(demo_config()),
        mirror_tx,
        status_tx,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    Ok((format!("http://{}", addr), mirror_rx, status_rx))
}

fn pipeline_payload() -> serde_json::Value {
    serde_json::json!({
        "object_kind": "pipeline",
        "commit": { "id": "abc123" },
        "builds": [
            { "id": 7, "name": "build", "status": "success",
              "created_at": "2016-08-12 15:23:28 UTC" },
            { "id": 8, "name": "test", "status": "running" }
        ]
    })
}

#[tokio::test]
async fn test_github_push_enqueues_mirror_job() -> Result<()> {
    let (base, mut mirror_rx, _status_rx) = spawn_server().await?;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/demo/github", base))
        .header("x-github-event", "push")
        .json(&serde_json::json!({ "ref": "refs/heads/main" }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");

    let job = tokio::time::timeout(Duration::from_secs(1), mirror_rx.recv()).await?;
    assert_eq!(
        job,
        Some(MirrorJob {
            repo_name: "demo".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_github_pull_request_enqueues_mirror_job() -> Result<()> {
    let (base, mut mirror_rx, _status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/demo/github", base))
        .header("x-github-event", "pull_request")
        .json(&serde_json::json!({ "action": "opened" }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let job = tokio::time::timeout(Duration::from_secs(1), mirror_rx.recv()).await?;
    assert!(job.is_some());
    Ok(())
}

#[tokio::test]
async fn test_unhandled_github_event_is_acknowledged_but_not_queued() -> Result<()> {
    let (base, mut mirror_rx, _status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/demo/github", base))
        .header("x-github-event", "issues")
        .json(&serde_json::json!({}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let queued = tokio::time::timeout(Duration::from_millis(200), mirror_rx.recv()).await;
    assert!(queued.is_err(), "no job should be queued for issues events");
    Ok(())
}

#[tokio::test]
async fn test_unknown_repo_is_404() -> Result<()> {
    let (base, _mirror_rx, _status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/nope/github", base))
        .header("x-github-event", "push")
        .json(&serde_json::json!({}))
        .send()
        .await?;

    assert_eq!(response.status(), 404);
    Ok(())
}

#[tokio::test]
async fn test_missing_event_header_is_400() -> Result<()> {
    let (base, _mirror_rx, _status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/demo/github", base))
        .json(&serde_json::json!({}))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    Ok(())
}

#[tokio::test]
async fn test_gitlab_pipeline_hook_enqueues_status_job() -> Result<()> {
    let (base, _mirror_rx, mut status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/demo/gitlab", base))
        .header("x-gitlab-event", "Pipeline Hook")
        .json(&pipeline_payload())
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let job = tokio::time::timeout(Duration::from_secs(1), status_rx.recv())
        .await?
        .expect("status job expected");
    assert_eq!(job.repo_name, "demo");
    assert_eq!(job.event.commit.id, "abc123");
    assert_eq!(job.event.builds.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_malformed_pipeline_payload_is_400() -> Result<()> {
    let (base, _mirror_rx, mut status_rx) = spawn_server().await?;

    // valid JSON, but not a pipeline event shape
    let response = reqwest::Client::new()
        .post(format!("{}/demo/gitlab", base))
        .header("x-gitlab-event", "Pipeline Hook")
        .json(&serde_json::json!({ "commit": "not-an-object" }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let queued = tokio::time::timeout(Duration::from_millis(200), status_rx.recv()).await;
    assert!(queued.is_err());
    Ok(())
}

#[tokio::test]
async fn test_other_gitlab_events_are_ignored() -> Result<()> {
    let (base, _mirror_rx, mut status_rx) = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/demo/gitlab", base))
        .header("x-gitlab-event", "Push Hook")
        .json(&serde_json::json!({}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let queued = tokio::time::timeout(Duration::from_millis(200), status_rx.recv()).await;
    assert!(queued.is_err());
    Ok(())
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (base, _mirror_rx, _status_rx) = spawn_server().await?;

    let response = reqwest::get(format!("{}/health", base)).await?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}
