#[cfg(feature = "accelerate")]
extern crate accelerate_src;
#[cfg(feature = "mkl")]
extern crate intel_mkl_src;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use classifier_server::model::TextClassifier;
use classifier_server::server::{create_router, AppState};
use classifier_server::{config, device};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "classifier-server")]
#[command(about = "Candle-based text classification server")]
struct Args {
    /// Port to serve on (0.0.0.0:port)
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Model identifier on the Hugging Face Hub (overrides MODEL_NAME)
    #[arg(long)]
    model_id: Option<String>,

    /// Folder containing config.json, tokenizer.json and model.safetensors
    /// (same structure as a huggingface snapshot)
    #[arg(long)]
    weight_path: Option<PathBuf>,

    /// Run on CPU even when an accelerator is available
    #[arg(long, default_value_t = false)]
    cpu: bool,
}

/// Wait for ctrl-c or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let model_id = config::resolve_model_id(args.model_id.as_deref());
    let device = device::select_device(args.cpu)?;

    // Bind before the slow model load so a port conflict fails fast.
    info!("Binding to port {}...", args.port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;

    info!("Loading model: {}", model_id);
    let classifier = match TextClassifier::load(&model_id, args.weight_path.as_deref(), &device) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("Error loading model: {}", e);
            return Err(e.into());
        }
    };
    info!("Model and tokenizer loaded successfully");

    let app = create_router(AppState::with_classifier(Arc::new(classifier)));

    info!("Server started at http://0.0.0.0:{}", args.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
