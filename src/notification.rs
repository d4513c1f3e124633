// src/notification.rs

use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::pagination::{paginate, ListQuery, DEFAULT_PAGE_SIZE};
use crate::response::ok;

/// GET /notifications?page&pageSize
pub async fn list_notifications(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let notifications = data.notifications.list();
    let (page, page_size) = query.page_params(DEFAULT_PAGE_SIZE);
    Ok(ok(paginate(&notifications, page, page_size)))
}
