//! TICTAC Server - HTTP API for browser front-ends
//!
//! This crate provides the web backend:
//! - REST API for game sessions (moves, restart, mode toggle, delete)
//! - Pointer-to-cell mapping for canvas clicks
//! - Delayed restart after a finished game
//! - Stateless position analysis
//! - Static file serving for the front-end

pub mod geometry;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tictac_core::GameConfig;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use state::{ServerState, SessionId, DEFAULT_MAX_SESSIONS};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    pub game: GameConfig,
    /// Live sessions kept before idle ones are evicted
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "static".to_string(),
            game: GameConfig::default(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Sessions
        .route("/api/games", post(routes::games::create_game))
        .route(
            "/api/games/:id",
            get(routes::games::get_game).delete(routes::games::delete_game),
        )
        .route("/api/games/:id/move", post(routes::games::make_move))
        .route("/api/games/:id/restart", post(routes::games::restart_game))
        .route("/api/games/:id/mode", post(routes::games::change_mode))
        // Stateless engine access
        .route("/api/analyze", post(routes::analyze::analyze_position))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::with_capacity(
        config.game.clone(),
        config.max_sessions,
    ));
    let router = create_router(&config, state);

    tracing::info!("TICTAC Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!("Keeping at most {} sessions", config.max_sessions);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
