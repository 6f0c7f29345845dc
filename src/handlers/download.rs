use axum::{
    Json, http::header, response::{IntoResponse, Response},
};
use chrono::{DateTime, TimeZone};
use crate::error::AppError;
use crate::models::DownloadRequest;

pub const PYTHON_MIME: &str = "text/x-python";

// main_<YYYYMMDD_HHMMSS>.py
pub fn download_file_name<Tz: TimeZone>(at: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("main_{}.py", at.format("%Y%m%d_%H%M%S"))
}

/// Serves code the page already shows as a `.py` attachment.
///
/// The body is exactly the posted text. Nothing here touches the cache or the
/// completion API, so a download never costs an upstream call.
pub async fn download_handler(Json(payload): Json<DownloadRequest>) -> Result<Response, AppError> {
    if payload.code.is_empty() {
        return Err(AppError::NothingToDownload);
    }

    let file_name = download_file_name(chrono::Local::now());

    Ok((
        [
            (header::CONTENT_TYPE, PYTHON_MIME.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        payload.code,
    )
        .into_response())
}
