//! HTTP API: Axum server exposing markets, scoring and bet simulation.
//!
//! CORS enabled for browser clients.

pub mod routes;

use anyhow::Result;
use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use routes::AppState;

/// Start the API server.
///
/// Spawns a background task and returns immediately. Bind or serve
/// failures are logged; the agent loop keeps running without the API.
pub fn spawn_api(state: AppState, port: u16) {
    let app = build_router(state);

    tokio::spawn(async move {
        if let Err(e) = serve(app, port).await {
            error!(port, error = %e, "API server stopped");
        }
    });
}

async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(port, "API server listening on http://localhost:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-agent-id"),
            HeaderName::from_static("x-session-id"),
        ]);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/markets", get(routes::get_markets))
        .route("/api/markets/:id/odds", get(routes::get_market_odds))
        .route("/api/opportunities", get(routes::get_opportunities))
        .route("/api/evaluate", post(routes::evaluate))
        .route("/api/stake", get(routes::get_stake))
        .route("/api/bets/simulate", post(routes::simulate_bet))
        .route("/api/bets/history", get(routes::get_history))
        .route("/api/bets/:tx_hash/verify", get(routes::verify))
        .route("/api/coins/trending", get(routes::get_trending))
        .route("/api/coins/search", get(routes::search_coins))
        .route("/api/coins/:id/price", get(routes::get_coin_price))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
