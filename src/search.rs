// src/search.rs

use actix_web::{web, HttpResponse};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::models::{Project, Task, User};
use crate::pagination::{filter_value, matches_needle};
use crate::response::ok;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
    /// Comma-separated subset of `project,task,user`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Project,
    Task,
    User,
}

impl SearchKind {
    fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "project" => Some(Self::Project),
            "task" => Some(Self::Task),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

impl From<&Project> for SearchResult {
    fn from(project: &Project) -> Self {
        Self {
            kind: SearchKind::Project,
            id: project.id.clone(),
            title: project.name.clone(),
            description: Some(project.description.clone()),
            url: format!("/projects/{}", project.id),
        }
    }
}

impl From<&Task> for SearchResult {
    fn from(task: &Task) -> Self {
        Self {
            kind: SearchKind::Task,
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            url: format!("/tasks/{}", task.id),
        }
    }
}

impl From<&User> for SearchResult {
    fn from(user: &User) -> Self {
        Self {
            kind: SearchKind::User,
            id: user.id.clone(),
            title: user.name.clone(),
            description: Some(user.email.clone()),
            url: format!("/users/{}", user.id),
        }
    }
}

/// Kinds to search. Absent or blank means projects and tasks; unknown
/// tokens are dropped.
fn requested_kinds(raw: &Option<String>) -> Vec<SearchKind> {
    match filter_value(raw) {
        None => vec![SearchKind::Project, SearchKind::Task],
        Some(list) => list.split(',').filter_map(SearchKind::parse).collect(),
    }
}

/// Projects by name, tasks by title, users by name or email. Results are
/// grouped in that order, unranked.
pub fn run_search(
    needle: &str,
    kinds: &[SearchKind],
    projects: &[Project],
    tasks: &[Task],
    users: &[User],
) -> Vec<SearchResult> {
    let mut results = Vec::new();
    if kinds.contains(&SearchKind::Project) {
        results.extend(
            projects
                .iter()
                .filter(|p| matches_needle(&p.name, needle))
                .map(SearchResult::from),
        );
    }
    if kinds.contains(&SearchKind::Task) {
        results.extend(
            tasks
                .iter()
                .filter(|t| matches_needle(&t.title, needle))
                .map(SearchResult::from),
        );
    }
    if kinds.contains(&SearchKind::User) {
        results.extend(
            users
                .iter()
                .filter(|u| matches_needle(&u.name, needle) || matches_needle(&u.email, needle))
                .map(SearchResult::from),
        );
    }
    results
}

/// GET /search?query&type
pub async fn search(
    data: web::Data<AppState>,
    params: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let Some(needle) = filter_value(&params.query).map(str::to_lowercase) else {
        return Ok(ok(Vec::<SearchResult>::new()));
    };
    let kinds = requested_kinds(&params.kind);
    debug!("Searching {:?} for {:?}", kinds, needle);

    let results = run_search(
        &needle,
        &kinds,
        &data.projects.list(),
        &data.tasks.list(),
        &data.users.list(),
    );
    Ok(ok(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;
    use crate::test_support::test_app;
    use actix_web::test::{call_and_read_body_json, TestRequest};
    use chrono::Utc;
    use serde_json::{json, Value};

    #[test]
    fn kinds_from_type_parameter() {
        assert_eq!(
            requested_kinds(&None),
            [SearchKind::Project, SearchKind::Task]
        );
        assert_eq!(
            requested_kinds(&Some(" user , Task,bogus".to_string())),
            [SearchKind::User, SearchKind::Task]
        );
        assert!(requested_kinds(&Some("bogus".to_string())).is_empty());
    }

    #[test]
    fn design_matches_project_and_tasks() {
        let f = Fixtures::seed(Utc::now());
        let results = run_search(
            "design",
            &[SearchKind::Project, SearchKind::Task],
            &f.projects,
            &f.tasks,
            &f.users,
        );
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["task_1", "task_3", "task_4"]);
        assert!(results.iter().all(|r| r.kind == SearchKind::Task));
        assert_eq!(results[0].url, "/tasks/task_1");
    }

    #[test]
    fn users_match_on_email() {
        let f = Fixtures::seed(Utc::now());
        let results = run_search("lisi@", &[SearchKind::User], &f.projects, &f.tasks, &f.users);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "user_2");
        assert_eq!(results[0].title, "Li Si");
        assert_eq!(results[0].url, "/users/user_2");
    }

    #[actix_web::test]
    async fn endpoint_groups_projects_before_tasks() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let body: Value = call_and_read_body_json(
            &app,
            TestRequest::get()
                .uri("/api/search?query=System")
                .to_request(),
        )
        .await;
        let results = body["data"].as_array().unwrap();
        assert_eq!(results[0]["type"], json!("project"));
        assert_eq!(results[0]["id"], json!("proj_1"));
        assert_eq!(results[0]["url"], json!("/projects/proj_1"));
        assert_eq!(results[1]["type"], json!("task"));
        assert_eq!(results[1]["id"], json!("task_1"));
        assert_eq!(results.len(), 2);
    }

    #[actix_web::test]
    async fn empty_query_returns_empty_list() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        for uri in ["/api/search", "/api/search?query=", "/api/search?query=%20&type=user"] {
            let body: Value = call_and_read_body_json(
                &app,
                TestRequest::get().uri(uri).to_request(),
            )
            .await;
            assert_eq!(body["success"], json!(true));
            assert_eq!(body["data"], json!([]));
        }
    }
}
