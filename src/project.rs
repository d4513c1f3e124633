// src/project.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extract::OptionalJson;
use crate::models::{merge_fields, AddMemberRequest, CreateProjectRequest, Project, Stamped};
use crate::pagination::{filter_value, matches_needle, paginate, ListQuery, DEFAULT_PAGE_SIZE};
use crate::response::ok;

/// GET /projects?page&pageSize&status&search
pub async fn list_projects(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let mut projects = data.projects.list();
    if let Some(status) = filter_value(&query.status) {
        projects.retain(|p| p.status.as_str() == status);
    }
    if let Some(needle) = query.needle() {
        projects.retain(|p| {
            matches_needle(&p.name, &needle) || matches_needle(&p.description, &needle)
        });
    }

    let (page, page_size) = query.page_params(DEFAULT_PAGE_SIZE);
    Ok(ok(paginate(&projects, page, page_size)))
}

/// POST /projects
pub async fn create_project(
    data: web::Data<AppState>,
    project_info: OptionalJson<CreateProjectRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    debug!("Received create_project request: {:?}", project_info);

    let project = project_info
        .into_inner()
        .into_project(data.ids.next("proj"), Utc::now());
    project.validate()?;

    let project = data.projects.insert(project);
    info!("Project created {}", project.id);
    Ok(ok(project))
}

/// GET /projects/{project_id}
pub async fn get_project(
    data: web::Data<AppState>,
    project_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(data.projects.get(&project_id)?))
}

/// PUT /projects/{project_id}
pub async fn update_project(
    data: web::Data<AppState>,
    project_id: web::Path<String>,
    patch: OptionalJson<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    let patch = Value::Object(patch.into_inner());

    let updated = data.projects.update(&project_id, &mut |project: &mut Project| {
        let mut merged: Project = merge_fields(project, &patch)?;
        merged.validate()?;
        merged.touch();
        *project = merged;
        Ok(())
    })?;
    info!("Project updated {}", updated.id);
    Ok(ok(updated))
}

/// DELETE /projects/{project_id}
pub async fn delete_project(
    data: web::Data<AppState>,
    project_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let removed = data.projects.delete(&project_id)?;
    info!("Project deleted {}", removed.id);
    Ok(ok(()))
}

/// POST /projects/{project_id}/members
pub async fn add_member(
    data: web::Data<AppState>,
    project_id: web::Path<String>,
    payload: web::Json<AddMemberRequest>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let user = data.users.get(&payload.user_id)?;
    let updated = data.projects.update(&project_id, &mut |project: &mut Project| {
        if project.has_member(&user.id) {
            return Err(ApiError::BadRequest("User already in project".to_string()));
        }
        project.members.push(user.clone());
        project.touch();
        Ok(())
    })?;

    info!("Added {} to project {}", user.id, updated.id);
    Ok(ok(updated))
}

/// DELETE /projects/{project_id}/members/{user_id}
pub async fn remove_member(
    data: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    let (project_id, user_id) = path.into_inner();

    let updated = data.projects.update(&project_id, &mut |project: &mut Project| {
        if !project.has_member(&user_id) {
            return Err(ApiError::not_found("Member"));
        }
        project.members.retain(|m| m.id != user_id);
        project.touch();
        Ok(())
    })?;

    info!("Removed {} from project {}", user_id, updated.id);
    Ok(ok(updated))
}
