// src/upload.rs

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::ApiResult;
use crate::extract::read_limited;
use crate::response::ok;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Size reported when the request carries no body.
const PLACEHOLDER_SIZE: usize = 1024 * 1024;
const MOCK_FILENAME: &str = "mock-file.jpg";

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// POST /upload
///
/// The body is read and discarded; the response describes a file that was
/// never stored. Bodies over [`MAX_UPLOAD_BYTES`] are refused with a 413.
pub async fn upload(data: web::Data<AppState>, payload: web::Payload) -> ApiResult<HttpResponse> {
    let body = read_limited(payload, MAX_UPLOAD_BYTES).await?;
    data.simulate_upload_latency().await;

    let size = match body.len() {
        0 => PLACEHOLDER_SIZE,
        n => n,
    };
    let result = UploadResult {
        url: format!(
            "https://example.com/uploads/mock-file-{}.jpg",
            Utc::now().timestamp_millis()
        ),
        filename: MOCK_FILENAME.to_string(),
        size,
    };
    info!("Accepted upload of {} bytes", size);
    Ok(ok(result))
}
