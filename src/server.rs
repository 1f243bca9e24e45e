//! HTTP surface: `/health`, with every other path running the analysis.

use crate::analyzer::{AnalyzeError, Analyzer};
use crate::models::Analysis;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AnalyzeError::Upload(crate::Error::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read image")
            }
            AnalyzeError::Upload(_) | AnalyzeError::Generation(_) => {
                (StatusCode::BAD_GATEWAY, "Failed to analyze image")
            }
            AnalyzeError::PromptRead(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read prompt")
            }
            AnalyzeError::Parse { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to parse JSON")
            }
        };
        error!("Analysis request failed ({}): {}", status, self);
        (status, message).into_response()
    }
}

async fn health_check() -> &'static str {
    info!("health check success");
    "OK"
}

async fn analyze(State(state): State<AppState>) -> Result<Json<Analysis>, AnalyzeError> {
    let analysis = state.analyzer.analyze().await?;
    Ok(Json(analysis))
}

/// Build the router. Any method is accepted; paths other than `/health`
/// fall through to the analysis.
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/health", any(health_check))
        .route("/", any(analyze))
        .fallback(analyze)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { analyzer })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, analyzer: Arc<Analyzer>) -> std::io::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
