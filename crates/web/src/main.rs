use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use game_review_core::{HttpOracle, OpeningBook, RestGameClient, ReviewController};

mod config;
mod error;
mod routes;

use routes::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    let oracle = HttpOracle::new(config.oracle()).expect("Failed to build oracle client");
    tracing::info!(url = %config.oracle_url, perspective = ?config.oracle_perspective, "Evaluation oracle configured");

    let mut games = RestGameClient::new(config.backend_url.clone()).expect("Failed to build backend client");
    if let Some(token) = config.backend_token.clone() {
        games = games.with_token(token);
    }

    let mut controller = ReviewController::new(Arc::new(oracle), config.analysis());
    if let Some(path) = &config.opening_book {
        let json = std::fs::read_to_string(path).expect("Failed to read opening book");
        let book = OpeningBook::from_json(&json).expect("Failed to parse opening book");
        tracing::info!(path = %path, lines = book.len(), "Custom opening book loaded");
        controller = controller.with_book(book);
    }

    let state = Arc::new(AppState {
        controller,
        games: Arc::new(games),
    });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app).await.expect("Server error");
}
