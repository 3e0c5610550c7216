//! Spice Ledger - Backend Server
//!
//! Multi-tenant ledger for spice traders: purchase lots and sales per user,
//! admin-maintained daily market prices, inventory valuation and an admin
//! dashboard, served over REST and GraphQL.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod services;

pub use config::Config;

use graphql::AppSchema;
use repositories::Repositories;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Repositories,
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        let schema = graphql::build_schema(repos.clone());
        Self {
            config: Arc::new(config),
            repos,
            schema,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Spice Ledger API v1.0"
}
