mod handlers;
mod state;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;

pub fn build_router(config: Config) -> Router {
    let state = Arc::new(AppState { config });

    Router::new()
        .route("/api/next", get(handlers::next_events))
        .route("/api/day", get(handlers::day_events))
        .route("/api/places", get(handlers::place_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, config: Config) -> std::io::Result<()> {
    axum::serve(listener, build_router(config)).await
}

pub async fn start(host: &str, port: u16, config: Config) -> std::io::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!(%addr, "listening");
    eprintln!("  sunclock server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    serve(listener, config).await
}
