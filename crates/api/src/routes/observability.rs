//! Liveness and Prometheus scrape endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;
use projections::ReadModel;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: usize,
    pub stocked_products: usize,
    pub recorded_orders: usize,
}

/// GET /health — liveness plus registry sizes.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let products = state.products.read().await.len();
    Json(HealthResponse {
        status: "ok",
        products,
        stocked_products: state.checkout.inventory().product_count(),
        recorded_orders: state.checkout.history().count(),
    })
}

/// GET /metrics — Prometheus text exposition of the checkout and reservation counters.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
