// src/activity.rs

use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::pagination::{filter_value, paginate, ListQuery, DEFAULT_PAGE_SIZE};
use crate::response::ok;

/// GET /activities?page&pageSize&type&projectId
pub async fn list_activities(
    data: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let mut activities = data.activities.list();
    if let Some(kind) = filter_value(&query.kind) {
        activities.retain(|a| a.kind.as_str() == kind);
    }
    if let Some(project_id) = filter_value(&query.project_id) {
        activities.retain(|a| a.project_id.as_deref() == Some(project_id));
    }

    let (page, page_size) = query.page_params(DEFAULT_PAGE_SIZE);
    Ok(ok(paginate(&activities, page, page_size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use actix_web::test;
    use serde_json::{json, Value};

    async fn ids_for(uri: &str) -> Vec<String> {
        let state = AppState::for_tests();
        let app = test_app!(state);
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri(uri).to_request())
                .await;
        body["data"]["list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn unfiltered_is_seed_order() {
        assert_eq!(
            ids_for("/api/activities").await,
            ["activity_1", "activity_2", "activity_3", "activity_4", "activity_5", "activity_6"]
        );
    }

    #[actix_web::test]
    async fn filters_by_type_and_project() {
        assert_eq!(ids_for("/api/activities?type=user_joined").await, ["activity_6"]);
        assert_eq!(
            ids_for("/api/activities?projectId=proj_2").await,
            ["activity_4"]
        );
        assert_eq!(
            ids_for("/api/activities?projectId=proj_1&type=task_created").await,
            ["activity_2"]
        );
        assert!(ids_for("/api/activities?type=nonsense").await.is_empty());
    }

    #[actix_web::test]
    async fn target_is_omitted_when_absent() {
        let state = AppState::for_tests();
        let app = test_app!(state);
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/activities?page=2&pageSize=5")
                .to_request(),
        )
        .await;
        let last = &body["data"]["list"][0];
        assert_eq!(last["type"], json!("user_joined"));
        assert!(last.get("target").is_none());
    }
}
