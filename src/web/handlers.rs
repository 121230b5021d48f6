// API handlers for the web server

use super::{
    AppState,
    error::ApiError,
    extract_upload::extract_upload,
    models::ClassificationResponse,
};
use axum::{Json, extract::{Multipart, State, multipart::MultipartRejection}};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// --- POST /upload ---
// Classifies an uploaded image and reports whether it shows a cat
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassificationResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let result = classify_upload(&state, multipart, request_id).await;
    match &result {
        Ok(response) => info!(
            "Upload classified: request_id={}, is_cat={}, top={:?}",
            request_id,
            response.is_cat,
            response.predictions.first().map(|p| p.class.as_str())
        ),
        Err(err) if err.status().is_client_error() => warn!(
            "Upload rejected: request_id={}, error={}",
            request_id,
            err.message()
        ),
        Err(err) => error!(
            "Upload failed: request_id={}, error={}",
            request_id,
            err.message()
        ),
    }

    result.map(Json)
}

async fn classify_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    request_id: Uuid,
) -> Result<ClassificationResponse, ApiError> {
    let upload = extract_upload(multipart).await?;
    debug!(
        "Upload received: request_id={}, file_name={}, bytes={}",
        request_id,
        upload.file_name,
        upload.bytes.len()
    );

    let classifier = state.classifier.clone();
    let predictions = tokio::task::spawn_blocking(move || classifier.classify(&upload.bytes))
        .await
        .map_err(|e| {
            error!("Classification task failed: request_id={}, {:?}", request_id, e);
            // A panic inside decode or the forward pass is an adapter failure
            if e.is_panic() {
                ApiError::ImageProcessing
            } else {
                ApiError::FileProcessing(e.to_string())
            }
        })?
        .map_err(|e| {
            error!("Error in classification: request_id={}, {:?}", request_id, e);
            ApiError::ImageProcessing
        })?;

    for (rank, pred) in predictions.iter().enumerate() {
        debug!(
            "Prediction: request_id={}, rank={}, class_id={}, class={}, probability={:.4}",
            request_id, rank, pred.class_id, pred.class_name, pred.probability
        );
    }

    Ok(ClassificationResponse::from(predictions))
}
