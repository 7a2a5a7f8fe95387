//! HTTP server lifecycle.

use log::{info, warn};
use rusqlite::Connection;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::router::build_router;
use crate::state::AppState;

/// Serves the API on `config`'s address until Ctrl-C.
///
/// `conn` must come from `vaxtrack_core::open_db` (migrated, FKs on).
pub async fn serve(config: &ServerConfig, conn: Connection) -> std::io::Result<()> {
    let app = build_router(AppState::new(conn));
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("event=http_listen module=api status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_shutdown module=api status=ok addr={addr}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=http_shutdown module=api status=error error={err}");
        // Without a signal handler, run until the process is killed.
        std::future::pending::<()>().await;
    }
}
