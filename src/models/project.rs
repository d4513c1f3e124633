use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Priority, Stamped, Task, User};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    /// Percent complete, 0..=100.
    pub progress: u8,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Embedded copies, not references into the user collection.
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Overdue,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl Project {
    pub fn validate(&self) -> ApiResult<()> {
        if self.progress > 100 {
            return Err(ApiError::BadRequest(
                "Progress must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }
}

impl Stamped for Project {
    fn updated_at_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.updated_at
    }
}

/// POST /projects body. Every field is optional; blanks fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub progress: Option<u8>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub members: Option<Vec<User>>,
}

impl CreateProjectRequest {
    pub fn into_project(self, id: String, now: DateTime<Utc>) -> Project {
        Project {
            id,
            name: non_blank(self.name).unwrap_or_else(|| "New project".to_string()),
            description: self.description.unwrap_or_default(),
            category: non_blank(self.category).unwrap_or_else(|| "Other".to_string()),
            status: self.status.unwrap_or(ProjectStatus::Active),
            priority: self.priority.unwrap_or(Priority::Medium),
            progress: self.progress.unwrap_or(0),
            start_date: self.start_date.unwrap_or_else(|| now.date_naive()),
            end_date: self.end_date,
            members: self.members.unwrap_or_default(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: String,
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_gets_defaults() {
        let now = Utc::now();
        let project = CreateProjectRequest::default().into_project("proj_1".into(), now);
        assert_eq!(project.name, "New project");
        assert_eq!(project.category, "Other");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.progress, 0);
        assert_eq!(project.start_date, now.date_naive());
        assert_eq!(project.created_at, project.updated_at);
        assert!(project.members.is_empty());
    }

    #[test]
    fn blank_name_falls_back() {
        let request = CreateProjectRequest {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(request.into_project("p".into(), Utc::now()).name, "New project");
    }

    #[test]
    fn progress_over_hundred_is_rejected() {
        let mut project = CreateProjectRequest::default().into_project("p".into(), Utc::now());
        project.progress = 101;
        assert!(project.validate().is_err());
    }
}
