// src/chat.rs

use actix_web::{web, HttpResponse};

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::pagination::{paginate, ListQuery};
use crate::response::ok;

const MESSAGE_PAGE_SIZE: usize = 20;

/// GET /messages/channels
pub async fn list_channels(data: web::Data<AppState>) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;
    Ok(ok(data.channels.list()))
}

/// GET /messages/channels/{channel_id}/messages?page&pageSize
pub async fn list_channel_messages(
    data: web::Data<AppState>,
    channel_id: web::Path<String>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    data.simulate_latency().await;

    let channel = data.channels.get(&channel_id)?;
    let mut messages = data.messages.list();
    messages.retain(|m| m.channel_id == channel.id);

    let (page, page_size) = query.page_params(MESSAGE_PAGE_SIZE);
    Ok(ok(paginate(&messages, page, page_size)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn lists_both_channels() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/messages/channels").to_request(),
        )
        .await;
        assert_eq!(body["data"][0]["id"], json!("channel_1"));
        assert_eq!(body["data"][0]["type"], json!("group"));
        assert_eq!(body["data"][0]["unreadCount"], json!(2));
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn messages_are_scoped_to_channel() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/messages/channels/channel_1/messages")
                .to_request(),
        )
        .await;
        let data = &body["data"];
        assert_eq!(data["total"], json!(3));
        assert_eq!(data["pageSize"], json!(20));
        assert!(data["list"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["channelId"] == json!("channel_1")));

        let second_page: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/messages/channels/channel_1/messages?page=2&pageSize=2")
                .to_request(),
        )
        .await;
        assert_eq!(second_page["data"]["list"][0]["id"], json!("msg_3"));
        assert_eq!(second_page["data"]["totalPages"], json!(2));
    }

    #[actix_web::test]
    async fn unknown_channel_is_404() {
        let state = AppState::for_tests();
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/messages/channels/channel_9/messages")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], json!("Channel not found"));
    }
}
