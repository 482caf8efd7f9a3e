//! HTTP API server with observability for the order pipeline.
//!
//! Provides REST endpoints for catalog, stock, promotion, cart and order
//! management, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use checkout::CheckoutCoordinator;
use domain::{DiscountEngine, InventoryLedger, NotificationService};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::OrderHistoryView;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::observability::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::observability::health))
        .route("/products", post(routes::catalog::create_product))
        .route("/products/{id}", get(routes::catalog::get_product))
        .route("/products/{id}/price", put(routes::catalog::update_price))
        .route("/users", post(routes::catalog::create_user))
        .route("/users/{id}", put(routes::catalog::update_user))
        .route("/users/{id}/orders", get(routes::orders::list_for_user))
        .route("/users/{id}/spending", get(routes::orders::spending))
        .route(
            "/inventory/{product_id}",
            get(routes::inventory::get)
                .post(routes::inventory::add)
                .delete(routes::inventory::remove),
        )
        .route("/promotions", put(routes::promotions::set_policy))
        .route(
            "/promotions/{product_id}",
            put(routes::promotions::upsert).delete(routes::promotions::remove),
        )
        .route("/carts/{user_id}", get(routes::carts::get))
        .route("/carts/{user_id}/items", post(routes::carts::add_item))
        .route(
            "/carts/{user_id}/items/{product_id}",
            axum::routing::delete(routes::carts::remove_item),
        )
        .route("/carts/{user_id}/checkout", post(routes::carts::checkout))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with empty registries and a wired checkout coordinator.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let discounts = DiscountEngine::new();
    discounts.set_combination_enabled(config.combine_discounts);

    let checkout = CheckoutCoordinator::new(
        InventoryLedger::new(),
        discounts,
        NotificationService::new(),
        OrderHistoryView::new(),
    );

    Arc::new(AppState::new(checkout))
}
