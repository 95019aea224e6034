use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub mod handlers;
pub mod render;
pub mod session;
pub mod state;

pub use session::{ProxySession, SessionProvider, StaticSession};
pub use state::AppState;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(HOME_PATH, get(handlers::index))
        .route(marc_core::handoff::DETAIL_PATH, get(handlers::article))
        .route(LOGIN_PATH, get(handlers::login))
        .route(LOGOUT_PATH, get(handlers::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves the portal until Ctrl+C or SIGTERM.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind(addr).await?;
    info!("🌐 Portal listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

pub mod prelude {
    pub use crate::{AppState, ProxySession, SessionProvider, StaticSession};
    pub use marc_core::{Error, NewsFeed, Result};
}
