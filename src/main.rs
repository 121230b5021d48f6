// Main entry point for catscan-server.
// Loads the pretrained classifier once, configures the Axum router,
// and serves the upload API until a shutdown signal arrives.

mod classifier;
mod shutdown_signal;
mod web;

use clap::Parser;
use classifier::{ClassLabels, ModelPreset, OnnxClassifier};
use shutdown_signal::shutdown_signal;
use std::{path::PathBuf, sync::Arc};
use tracing::Level;
use web::{AppState, MAX_UPLOAD_SIZE_BYTES, StaticAssets, create_app, create_listener};

/// Command line arguments for catscan-server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// "*" listens on all interfaces (IPv6 dual-stack, falling back to IPv4).
    #[arg(long, env = "CATSCAN_HOST", default_value = "*")]
    host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "CATSCAN_PORT", default_value_t = 80)]
    port: u16,

    /// Pretrained ImageNet classifier in ONNX format.
    #[arg(long, env = "CATSCAN_MODEL", default_value = "mobilenet_v2.onnx")]
    model: PathBuf,

    /// Keras style class index mapping output positions to (id, name).
    #[arg(long, env = "CATSCAN_CLASS_INDEX", default_value = "imagenet_class_index.json")]
    class_index: PathBuf,

    /// Input layout and normalization the model was exported with.
    #[arg(long, env = "CATSCAN_PRESET", value_enum, default_value_t = ModelPreset::Keras)]
    preset: ModelPreset,

    /// HTML page served at "/".
    #[arg(long, env = "CATSCAN_INDEX_PAGE", default_value = "templates/index.html")]
    index_page: PathBuf,

    /// Label list served at "/imagenet_classes.txt".
    #[arg(long, env = "CATSCAN_CLASSES_FILE", default_value = "imagenet_classes.txt")]
    classes_file: PathBuf,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "CATSCAN_MAX_UPLOAD_BYTES", default_value_t = MAX_UPLOAD_SIZE_BYTES)]
    max_upload_bytes: usize,

    /// Most verbose level written to the logs.
    #[arg(long, env = "CATSCAN_LOG_LEVEL", default_value_t = Level::DEBUG)]
    log_level: Level,
}

#[tokio::main]
async fn main() {
    // Parse command line args and environment variables
    let config = AppConfig::parse();

    // Logs go to stdout with module path, file and line
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting catscan-server...");
    tracing::debug!("Configuration: {:?}", config);

    // --- Load class labels and model ---
    let labels = ClassLabels::load(&config.class_index).unwrap_or_else(|err| {
        tracing::error!(
            "FATAL: Failed to load class index {}: {}",
            config.class_index.display(),
            err
        );
        std::process::exit(1);
    });
    tracing::info!("Loaded {} class labels.", labels.len());

    let classifier = OnnxClassifier::load(&config.model, labels, config.preset)
        .unwrap_or_else(|err| {
            tracing::error!(
                "FATAL: Failed to load model {}: {:?}",
                config.model.display(),
                err
            );
            std::process::exit(1);
        });

    let state = AppState {
        classifier: Arc::new(classifier),
    };
    let assets = StaticAssets {
        index_page: config.index_page.clone(),
        classes_file: config.classes_file.clone(),
    };
    for path in [&assets.index_page, &assets.classes_file] {
        if !path.is_file() {
            tracing::warn!("Static asset {} not found; it will be served as 404.", path.display());
        }
    }

    let app = create_app(state, assets, config.max_upload_bytes);
    tracing::info!("Axum router configured.");

    // --- Start HTTP Server ---
    let listener = match create_listener(&config.host, config.port).await {
        Ok((addr, listener)) => {
            tracing::info!("Server successfully bound. Listening on {}", addr);
            listener
        }
        Err(e) => {
            tracing::error!("FATAL: Failed to bind server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server run error: {}", e);
    }

    tracing::info!("catscan-server has shut down.");
}
