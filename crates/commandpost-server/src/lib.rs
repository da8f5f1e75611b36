//! Server bootstrap: configuration, tracing and the axum application.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use commandpost_db_memory::MemoryStore;
use commandpost_graphql::build_schema;
use commandpost_service::CommandService;

pub mod config;
pub mod observability;

pub use config::ServerConfig;

/// Builds the application router over a fresh in-memory store.
#[must_use]
pub fn build_app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(CommandService::new(store));
    let schema = build_schema(service);

    Router::new()
        .merge(commandpost_graphql::routes(schema))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}
