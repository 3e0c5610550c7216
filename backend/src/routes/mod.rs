//! Route definitions for the Spice Ledger API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    middleware::{auth_middleware, require_admin},
    AppState,
};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // GraphiQL explorer (public)
        .route("/graphql", get(handlers::graphiql))
        // Protected routes - everything an authenticated trader can reach
        .merge(protected_routes(state.clone()))
        // Protected routes - admin dashboard
        .nest("/admin", admin_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Catalog, ledger, inventory, price and GraphQL routes (protected)
///
/// Admin-only writes (products, grades, prices) are enforced by the services
/// so the GraphQL mutations share the same checks.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/grades",
            get(handlers::list_grades).post(handlers::create_grade),
        )
        .route("/lots", get(handlers::list_lots).post(handlers::add_lot))
        .route("/sales", get(handlers::list_sales).post(handlers::add_sale))
        .route("/inventory/current", get(handlers::get_current_inventory))
        .route("/inventory/on-date", get(handlers::get_inventory_on_date))
        .route("/inventory/day", get(handlers::get_day_details))
        .route("/prices", post(handlers::set_price))
        .route("/prices/:date", get(handlers::get_prices_for_date))
        .route(
            "/prices/:date/:product_id/:grade_id",
            get(handlers::get_price),
        )
        .route("/graphql", post(handlers::graphql_handler))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Admin routes (protected, admin role)
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::get_stats))
        .route("/dashboard", get(handlers::get_dashboard))
        // Layers run outside-in: authenticate first, then check the role
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
