use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request for one mirror re-sync, queued by the GitHub webhook handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorJob {
    pub repo_name: String,
}

/// A GitLab pipeline event waiting to be reflected onto GitHub.
#[derive(Debug, Clone)]
pub struct StatusJob {
    pub repo_name: String,
    pub event: PipelineEvent,
}

/// The parts of a GitLab "Pipeline Hook" payload this service consumes.
/// Everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    #[serde(default)]
    pub object_kind: Option<String>,
    pub commit: CommitRef,
    pub builds: Vec<BuildInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildInfo {
    pub id: u64,
    pub name: String,
    pub status: String,
    #[serde(default, with = "gitlab_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "gitlab_timestamp")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// GitHub commit status states this bridge publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Pending,
    Success,
    Failure,
}

impl CommitState {
    /// Maps a GitLab job status onto a GitHub commit state. Statuses with
    /// no sensible mapping (canceled, skipped, manual, ...) yield `None`
    /// and the caller is expected to skip the update.
    pub fn from_gitlab(status: &str) -> Option<Self> {
        match status {
            "success" => Some(CommitState::Success),
            "pending" | "created" | "running" => Some(CommitState::Pending),
            "failed" => Some(CommitState::Failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitState::Pending => "pending",
            CommitState::Success => "success",
            CommitState::Failure => "failure",
        }
    }
}

/// GitLab webhooks carry timestamps like "2016-08-12 15:23:28 UTC" rather
/// than RFC 3339, so both forms are accepted here.
mod gitlab_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const GITLAB_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, GITLAB_FORMAT) {
            return Ok(Some(naive.and_utc()));
        }
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Ok(Some(ts.with_timezone(&Utc))),
            Err(e) => Err(serde::de::Error::custom(format!(
                "unrecognized timestamp '{}': {}",
                raw, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_state_mapping() {
        assert_eq!(
            CommitState::from_gitlab("success"),
            Some(CommitState::Success)
        );
        assert_eq!(
            CommitState::from_gitlab("running"),
            Some(CommitState::Pending)
        );
        assert_eq!(
            CommitState::from_gitlab("created"),
            Some(CommitState::Pending)
        );
        assert_eq!(
            CommitState::from_gitlab("failed"),
            Some(CommitState::Failure)
        );
        assert_eq!(CommitState::from_gitlab("canceled"), None);
        assert_eq!(CommitState::from_gitlab("skipped"), None);
    }

    #[test]
    fn test_pipeline_event_deserialization() {
        let payload = serde_json::json!({
            "object_kind": "pipeline",
            "commit": { "id": "abc123", "message": "ignored" },
            "builds": [
                {
                    "id": 7,
                    "name": "build",
                    "status": "success",
                    "created_at": "2016-08-12 15:23:28 UTC",
                    "finished_at": "2016-08-12T15:26:29.000Z",
                    "stage": "ignored-too"
                }
            ],
            "project": { "name": "also ignored" }
        });

        let event: PipelineEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.commit.id, "abc123");
        assert_eq!(event.builds.len(), 1);
        assert_eq!(event.builds[0].name, "build");
        assert!(event.builds[0].created_at.is_some());
        assert!(event.builds[0].finished_at.is_some());
    }

    #[test]
    fn test_build_without_timestamps() {
        let payload = serde_json::json!({
            "id": 9, "name": "lint", "status": "pending"
        });
        let build: BuildInfo = serde_json::from_value(payload).unwrap();
        assert!(build.created_at.is_none());
    }
}
