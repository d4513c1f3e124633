// src/user_management.rs

use actix_web::{web, HttpResponse};
use log::info;
use serde_json::{Map, Value};

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::extract::OptionalJson;
use crate::models::{merge_fields, Stamped, User};
use crate::pagination::{matches_needle, paginate, ListQuery, DEFAULT_PAGE_SIZE};
use crate::response::ok;

/// GET /users?page&pageSize&search
/// `search` matches name or email.
pub async fn list_users(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let mut users = data.users.list();
    if let Some(needle) = query.needle() {
        users.retain(|u| matches_needle(&u.name, &needle) || matches_needle(&u.email, &needle));
    }

    let (page, page_size) = query.page_params(DEFAULT_PAGE_SIZE);
    Ok(ok(paginate(&users, page, page_size)))
}

/// GET /users/{user_id}
pub async fn get_user(
    data: web::Data<AppState>,
    user_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(data.users.get(&user_id)?))
}

/// PUT /users/{user_id}
pub async fn update_user(
    data: web::Data<AppState>,
    user_id: web::Path<String>,
    patch: OptionalJson<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    let patch = Value::Object(patch.into_inner());

    let updated = data.users.update(&user_id, &mut |user: &mut User| {
        let mut merged: User = merge_fields(user, &patch)?;
        merged.touch();
        *user = merged;
        Ok(())
    })?;
    info!("User {} updated", updated.id);
    Ok(ok(updated))
}
