use axum::extract::{Multipart, multipart::MultipartRejection};
use tracing::debug;

use super::{error::ApiError, models::UploadedImage};

/// Multipart field that carries the image.
pub const FILE_FIELD: &str = "file";

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Accepts names whose text after the final `.` is an allowed extension,
/// ignoring case. Names without a `.` are rejected.
pub fn is_allowed_file_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Pulls the first file part named `file` out of the request and reads it.
///
/// A body that is not multipart, or a `file` field sent as a plain form
/// value, counts as a missing file part.
pub async fn extract_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadedImage, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Request is not a readable multipart form: {}", rejection);
        ApiError::NoFilePart
    })?;

    let mut skipped_fields = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unexpected(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            skipped_fields += 1;
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Ignoring '{}' field without a filename", FILE_FIELD);
            skipped_fields += 1;
            continue;
        };

        if skipped_fields > 0 {
            debug!("Skipped {} unrelated multipart fields", skipped_fields);
        }

        if file_name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }
        if !is_allowed_file_name(&file_name) {
            return Err(ApiError::InvalidFileType);
        }

        debug!(
            "Reading upload '{}' with content type {:?}",
            file_name,
            field.content_type()
        );

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::FileProcessing(e.to_string()))?
            .to_vec();

        return Ok(UploadedImage { file_name, bytes });
    }

    Err(ApiError::NoFilePart)
}
