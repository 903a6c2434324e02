mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    handlers::{health, send_media},
    middleware::cors::cors_headers,
    services::messaging::MessagingService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    // Initialize services
    let messaging_service = Arc::new(MessagingService::new(config.upstream_url.clone()));
    info!("Relaying media to {}", messaging_service.endpoint());

    let app_state = Arc::new(AppState {
        config: config.clone(),
        messaging_service,
    });

    let app = build_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Server starting on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/send-media", any(send_media::send_media))
        .layer(
            ServiceBuilder::new()
                .layer(cors_headers())
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
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

pub struct AppState {
    pub config: Config,
    pub messaging_service: Arc<MessagingService>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    fn state(max_body_size: usize) -> Arc<AppState> {
        Arc::new(AppState {
            config: Config {
                bind_address: "127.0.0.1:0".to_string(),
                upstream_url: "http://127.0.0.1:9/send/media".to_string(),
                max_body_size,
            },
            messaging_service: Arc::new(MessagingService::new(
                "http://127.0.0.1:9/send/media".to_string(),
            )),
        })
    }

    #[tokio::test]
    async fn test_health_endpoint_returns_json() {
        let req = Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let resp = build_router(state(1024)).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected_with_cors() {
        let req = Request::builder()
            .method("POST")
            .uri("/send-media")
            .header("token", "tok")
            .header("content-length", "2048")
            .body(Body::from(vec![b'a'; 2048]))
            .unwrap();

        let resp = build_router(state(1024)).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(resp.headers()["content-type"], "application/json");

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "error": "Corpo da requisição excede o limite de 1024 bytes" })
        );
    }
}
