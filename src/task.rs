// src/task.rs

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::app_state::AppState;
use crate::auth::resolve_current_user;
use crate::error::{ApiError, ApiResult};
use crate::extract::OptionalJson;
use crate::models::{
    merge_fields, AddCommentRequest, AssignTaskRequest, Comment, CreateTaskRequest, Stamped,
    Task, TaskStatus, UpdateStatusRequest,
};
use crate::pagination::{filter_value, matches_needle, paginate, ListQuery, DEFAULT_PAGE_SIZE};
use crate::response::ok;

/// GET /tasks?page&pageSize&projectId&status&search
///
/// `status` accepts either vocabulary; an unknown status matches nothing.
/// `search` covers title and description.
pub async fn list_tasks(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let mut tasks = data.tasks.list();
    if let Some(project_id) = filter_value(&query.project_id) {
        tasks.retain(|t| t.project_id == project_id);
    }
    if let Some(status) = filter_value(&query.status) {
        match status.parse::<TaskStatus>() {
            Ok(status) => tasks.retain(|t| t.status == status),
            Err(_) => tasks.clear(),
        }
    }
    if let Some(needle) = query.needle() {
        tasks.retain(|t| {
            matches_needle(&t.title, &needle)
                || t.description
                    .as_deref()
                    .is_some_and(|d| matches_needle(d, &needle))
        });
    }

    let (page, page_size) = query.page_params(DEFAULT_PAGE_SIZE);
    Ok(ok(paginate(&tasks, page, page_size)))
}

/// GET /tasks/today
/// The whole task list, unpaginated.
pub async fn today_tasks(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(data.tasks.list()))
}

/// POST /tasks
/// The reporter is always the first user.
pub async fn create_task(
    data: web::Data<AppState>,
    task_info: OptionalJson<CreateTaskRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    debug!("Received create_task request: {:?}", task_info);

    let reporter = data
        .users
        .list()
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("no users to act as reporter".to_string()))?;
    let task = task_info
        .into_inner()
        .into_task(data.ids.next("task"), reporter, Utc::now());

    let task = data.tasks.insert(task);
    info!("Task created {}", task.id);
    Ok(ok(task))
}

/// GET /tasks/{task_id}
pub async fn get_task(
    data: web::Data<AppState>,
    task_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(data.tasks.get(&task_id)?))
}

/// PUT /tasks/{task_id}
pub async fn update_task(
    data: web::Data<AppState>,
    task_id: web::Path<String>,
    patch: OptionalJson<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    let patch = Value::Object(patch.into_inner());

    let updated = data.tasks.update(&task_id, &mut |task: &mut Task| {
        let mut merged: Task = merge_fields(task, &patch)?;
        merged.touch();
        *task = merged;
        Ok(())
    })?;
    info!("Task updated {}", updated.id);
    Ok(ok(updated))
}

/// DELETE /tasks/{task_id}
pub async fn delete_task(
    data: web::Data<AppState>,
    task_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let removed = data.tasks.delete(&task_id)?;
    info!("Task deleted {}", removed.id);
    Ok(ok(()))
}

/// PATCH /tasks/{task_id}/status
/// Touches nothing but `status` and `updatedAt`.
pub async fn update_task_status(
    data: web::Data<AppState>,
    task_id: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let status = payload.status;
    let updated = data.tasks.update(&task_id, &mut |task: &mut Task| {
        task.status = status;
        task.touch();
        Ok(())
    })?;
    info!("Task {} moved to {}", updated.id, status);
    Ok(ok(updated))
}

/// PATCH /tasks/{task_id}/assign
pub async fn assign_task(
    data: web::Data<AppState>,
    task_id: web::Path<String>,
    payload: web::Json<AssignTaskRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let assignee = data.users.get(&payload.assignee_id)?;
    let updated = data.tasks.update(&task_id, &mut |task: &mut Task| {
        task.assignee = Some(assignee.clone());
        task.touch();
        Ok(())
    })?;
    info!("Task {} assigned to {}", updated.id, assignee.id);
    Ok(ok(updated))
}

/// POST /tasks/{task_id}/comments
/// The author is the bearer-token user, or the first user for anonymous calls.
pub async fn add_comment(
    req: HttpRequest,
    data: web::Data<AppState>,
    task_id: web::Path<String>,
    payload: OptionalJson<AddCommentRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Comment content is required".to_string()));
    }
    let author = resolve_current_user(&req, &data)?;
    let now = Utc::now();
    let comment = Comment {
        id: data.ids.next("comment"),
        content: content.to_string(),
        author,
        task_id: task_id.to_string(),
        created_at: now,
        updated_at: now,
    };

    data.tasks.update(&task_id, &mut |task: &mut Task| {
        task.comments.push(comment.clone());
        task.touch();
        Ok(())
    })?;
    info!("Comment {} added to task {}", comment.id, task_id);
    Ok(ok(comment))
}
