// Error types for the upload API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failures surfaced by `POST /upload`.
///
/// The three client variants map to 400 and carry fixed messages; the
/// server variants map to 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NoFilePart,
    NoSelectedFile,
    InvalidFileType,
    ImageProcessing,
    FileProcessing(String),
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile | Self::InvalidFileType => {
                StatusCode::BAD_REQUEST
            }
            Self::ImageProcessing | Self::FileProcessing(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NoFilePart => "No file part".to_string(),
            Self::NoSelectedFile => "No selected file".to_string(),
            Self::InvalidFileType => "Invalid file type".to_string(),
            Self::ImageProcessing => "Error processing image".to_string(),
            Self::FileProcessing(msg) => format!("Error processing file: {}", msg),
            Self::Unexpected(msg) => format!("Unexpected error: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors_are_400() {
        for (err, msg) in [
            (ApiError::NoFilePart, "No file part"),
            (ApiError::NoSelectedFile, "No selected file"),
            (ApiError::InvalidFileType, "Invalid file type"),
        ] {
            let (status, body) = body_json(err).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": msg }));
        }
    }

    #[tokio::test]
    async fn test_server_errors_are_500() {
        let (status, body) = body_json(ApiError::ImageProcessing).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error processing image");

        let (status, body) = body_json(ApiError::FileProcessing("stream closed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error processing file: stream closed");

        let (status, body) = body_json(ApiError::Unexpected("bad boundary".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unexpected error: bad boundary");
    }
}
