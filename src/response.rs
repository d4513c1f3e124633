use actix_web::{http::StatusCode, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SUCCESS_MESSAGE: &str = "Success";

/// The envelope wrapped around every response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub code: u16,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: SUCCESS_MESSAGE.to_string(),
            code: StatusCode::OK.as_u16(),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            code: status.as_u16(),
            timestamp: Utc::now(),
        }
    }
}

/// One page of a filtered collection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub list: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// 200 with `data` wrapped in a success envelope.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unit_data_serializes_as_null() {
        let body = serde_json::to_value(ApiResponse::success(())).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!(null));
        assert_eq!(body["code"], json!(200));
        assert_eq!(body["message"], json!(SUCCESS_MESSAGE));
    }

    #[test]
    fn failure_carries_status_code() {
        let body =
            serde_json::to_value(ApiResponse::<()>::failure("gone", StatusCode::NOT_FOUND))
                .unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!(404));
        assert!(body["timestamp"].is_string());
    }
}
