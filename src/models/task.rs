use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};

use super::project::non_blank;
use super::{Priority, Stamped, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    pub reporter: User,
    /// Not validated against the project collection.
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_hours: Option<f32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task lifecycle. The board vocabulary (`todo`, `in-progress`, `review`,
/// `done`) is still accepted on input and folded into these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[serde(alias = "todo", alias = "in-progress", alias = "review")]
    Pending,
    Overdue,
    #[serde(alias = "done")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::Overdue, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let de: StrDeserializer<'_, ValueError> = s.into_deserializer();
        Self::deserialize(de)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub author: User,
    pub task_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub uploaded_by: User,
    pub created_at: DateTime<Utc>,
}

impl Stamped for Task {
    fn updated_at_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.updated_at
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee: Option<User>,
    pub project_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f32>,
    pub remaining_hours: Option<f32>,
    pub tags: Option<Vec<String>>,
}

impl CreateTaskRequest {
    pub fn into_task(self, id: String, reporter: User, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: non_blank(self.title).unwrap_or_else(|| "New task".to_string()),
            description: self.description,
            status: self.status.unwrap_or(TaskStatus::Pending),
            priority: self.priority.unwrap_or(Priority::Medium),
            assignee: self.assignee,
            reporter,
            project_id: self.project_id.unwrap_or_default(),
            due_date: self.due_date,
            estimated_hours: self.estimated_hours,
            remaining_hours: self.remaining_hours,
            tags: self.tags.unwrap_or_default(),
            attachments: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub assignee_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_vocabulary_folds_into_canonical_statuses() {
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!("review".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert_eq!("overdue".parse::<TaskStatus>().unwrap(), TaskStatus::Overdue);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_serializes_canonically() {
        let status: TaskStatus = serde_json::from_str("\"done\"").unwrap();
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"completed\"");
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
    }
}
