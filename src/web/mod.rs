// Web server module
// Serves the upload page, the label list and the classification endpoint

mod app;
mod error;
mod extract_upload;
mod handlers;
mod listeners;
mod models;

pub use app::{StaticAssets, create_app};
pub use listeners::create_listener;

use crate::classifier::SharedClassifier;

// Default maximum size for upload requests
pub const MAX_UPLOAD_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100MB

/// State shared by every request. The classifier is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub classifier: SharedClassifier,
}
