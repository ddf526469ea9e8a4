//! Axum router for the chat protocol plus a health endpoint.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
///
/// The protocol itself is GET-only: the original clients drive every
/// command, including post, through URL query arguments.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/join", get(handlers::join))
        .route("/leave", get(handlers::leave))
        .route("/who", get(handlers::who))
        .route("/post", get(handlers::post))
        .route("/read", get(handlers::read))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - simple health check, JSON for monitoring tools.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
