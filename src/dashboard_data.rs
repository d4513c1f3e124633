// src/dashboard_data.rs

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::models::{Activity, Project, ProjectStatus, Task, TaskStatus, User};
use crate::response::ok;

/// Lower bound reported for `todayTotalTasks`.
const MIN_TODAY_TOTAL: usize = 5;
const RECENT_ACTIVITY_COUNT: usize = 5;
const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_completed_tasks: usize,
    pub today_total_tasks: usize,
    pub all_completed_tasks: usize,
    pub all_total_tasks: usize,
    pub completed_projects: usize,
    pub total_projects: usize,
    pub overdue_projects: usize,
    pub active_projects: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub team_members: usize,
    pub recent_activities: Vec<Activity>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: String,
    pub name: String,
    pub progress: u8,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: usize,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Aggregate counts over the whole data set, as of `today`.
pub fn compute_stats(
    projects: &[Project],
    tasks: &[Task],
    users: &[User],
    activities: &[Activity],
    today: NaiveDate,
) -> DashboardStats {
    let created_today: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_at.date_naive() == today)
        .collect();
    let all_completed_tasks = tasks.iter().filter(|t| is_completed(t)).count();
    let project_count =
        |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count();

    DashboardStats {
        today_completed_tasks: created_today.iter().filter(|t| is_completed(t)).count(),
        today_total_tasks: created_today.len().max(MIN_TODAY_TOTAL),
        all_completed_tasks,
        all_total_tasks: tasks.len(),
        completed_projects: project_count(ProjectStatus::Completed),
        total_projects: projects.len(),
        overdue_projects: projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Completed)
            .filter(|p| p.end_date.is_some_and(|end| end < today))
            .count(),
        active_projects: project_count(ProjectStatus::Active),
        completed_tasks: all_completed_tasks,
        pending_tasks: tasks.len() - all_completed_tasks,
        team_members: users.len(),
        recent_activities: activities.iter().take(RECENT_ACTIVITY_COUNT).cloned().collect(),
    }
}

fn is_completed(task: &Task) -> bool {
    task.status == TaskStatus::Completed
}

pub fn compute_project_progress(projects: &[Project]) -> Vec<ProjectProgress> {
    projects
        .iter()
        .map(|p| ProjectProgress {
            project_id: p.id.clone(),
            name: p.name.clone(),
            progress: p.progress,
        })
        .collect()
}

/// One entry per status, zero counts included.
pub fn compute_task_stats(tasks: &[Task]) -> Vec<StatusCount> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: tasks.iter().filter(|t| t.status == status).count(),
        })
        .collect()
}

/// Categories in order of first appearance; blank ones are counted as "Other".
pub fn compute_category_distribution(projects: &[Project]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for project in projects {
        let category = match project.category.trim() {
            "" => FALLBACK_CATEGORY,
            name => name,
        };
        match counts.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.count += 1,
            None => counts.push(CategoryCount {
                category: category.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Due today, overdue, or still pending past the due date.
pub fn select_today_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| {
            t.due_date == Some(today)
                || t.status == TaskStatus::Overdue
                || (t.status == TaskStatus::Pending && t.due_date.is_some_and(|due| due <= today))
        })
        .cloned()
        .collect()
}

/// GET /dashboard/stats
pub async fn stats(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(compute_stats(
        &data.projects.list(),
        &data.tasks.list(),
        &data.users.list(),
        &data.activities.list(),
        data.clock.today(),
    )))
}

/// GET /dashboard/project-progress
pub async fn project_progress(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(compute_project_progress(&data.projects.list())))
}

/// GET /dashboard/task-stats
pub async fn task_stats(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(compute_task_stats(&data.tasks.list())))
}

/// GET /dashboard/project-category-distribution
pub async fn category_distribution(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(compute_category_distribution(&data.projects.list())))
}

/// GET /dashboard/today-tasks
pub async fn today_tasks(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(select_today_tasks(&data.tasks.list(), data.clock.today())))
}
