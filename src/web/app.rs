use super::{AppState, handlers};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use std::path::PathBuf;
use tower_http::{
    cors::CorsLayer,
    services::ServeFile,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

/// Files served verbatim from disk.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub index_page: PathBuf,
    pub classes_file: PathBuf,
}

pub fn create_app(state: AppState, assets: StaticAssets, max_upload_bytes: usize) -> Router {
    Router::new()
        // Upload page
        .route_service("/", ServeFile::new(&assets.index_page))
        // Newline-separated list of every class the model knows
        .route_service("/imagenet_classes.txt", ServeFile::new(&assets.classes_file))
        // Classification
        .route("/upload", post(handlers::upload))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        // Provide the shared state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, ClassifyError, Prediction};
    use axum::{body::Body, http::{Request, StatusCode, header}};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct NeverCalled;

    impl Classifier for NeverCalled {
        fn classify(&self, _image_bytes: &[u8]) -> Result<Vec<Prediction>, ClassifyError> {
            unreachable!("static routes never classify")
        }
    }

    fn app_in(dir: &tempfile::TempDir) -> Router {
        create_app(
            AppState {
                classifier: Arc::new(NeverCalled),
            },
            StaticAssets {
                index_page: dir.path().join("index.html"),
                classes_file: dir.path().join("imagenet_classes.txt"),
            },
            1024,
        )
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_serves_index_page() {
        let dir = tempfile::tempdir().unwrap();
        let html = "<!doctype html><title>catscan</title>";
        std::fs::write(dir.path().join("index.html"), html).unwrap();

        let (status, content_type, body) = get(app_in(&dir), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body, html.as_bytes());
    }

    #[tokio::test]
    async fn test_serves_class_labels() {
        let dir = tempfile::tempdir().unwrap();
        let labels = "tench\ngoldfish\ngreat white shark\n";
        std::fs::write(dir.path().join("imagenet_classes.txt"), labels).unwrap();

        let (status, content_type, body) = get(app_in(&dir), "/imagenet_classes.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/plain"));
        assert_eq!(body, labels.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_asset_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = get(app_in(&dir), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = get(app_in(&dir), "/predict").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_requires_post() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _, _) = get(app_in(&dir), "/upload").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
