use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub description: String,
    pub actor: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ActivityTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    TaskCreated,
    TaskUpdated,
    TaskCompleted,
    CommentAdded,
    FileUploaded,
    UserJoined,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskUpdated => "task_updated",
            Self::TaskCompleted => "task_completed",
            Self::CommentAdded => "comment_added",
            Self::FileUploaded => "file_uploaded",
            Self::UserJoined => "user_joined",
        }
    }
}

/// What an activity was about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTarget {
    #[serde(rename = "type")]
    pub kind: TargetType,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Task,
    Project,
    User,
}
