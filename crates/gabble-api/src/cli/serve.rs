//! `gabble serve` -- run the chat server.

use tracing::info;

use crate::http::router::build_router;
use crate::state::AppState;

pub async fn run(addr: &str) -> anyhow::Result<()> {
    let state = AppState::new();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "chat server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
