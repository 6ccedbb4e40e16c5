//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::RoomManager;

use super::{
    handler::{get_room_detail, get_rooms, health_check, liveness, websocket_handler},
    hub::RoomHub,
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid frontend origin: '{0}'")]
    InvalidOrigin(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the CORS policy: a single allowed origin, GET and POST, credentials allowed.
pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer, ServerError> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|_| ServerError::InvalidOrigin(frontend_url.to_string()))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true))
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        // 死活確認（プレーンテキスト）
        .route("/", get(liveness))
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Collaboration relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(room_manager, "http://localhost:3000".to_string());
/// server.run("0.0.0.0".to_string(), 5000).await?;
/// ```
pub struct Server {
    /// RoomManager（ハブタスクに移される）
    room_manager: RoomManager,
    /// CORS で許可するフロントエンドのオリジン
    frontend_url: String,
}

impl Server {
    pub fn new(room_manager: RoomManager, frontend_url: String) -> Self {
        Self {
            room_manager,
            frontend_url,
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not a valid header value, if binding fails,
    /// or if the server fails while running.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("XOR relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Allowed origin: {}", self.frontend_url);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cors = cors_layer(&self.frontend_url)?;

        let (hub, hub_handle) = RoomHub::new(self.room_manager);
        let hub_task = tokio::spawn(hub.run());

        let app = build_router(Arc::new(AppState { hub: hub_handle }), cors);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        // WebSocket タスクがハンドルを保持している場合もあるので明示的に止める
        hub_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
