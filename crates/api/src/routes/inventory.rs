//! Stock management endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddStockRequest {
    pub quantity: i64,
}

#[derive(Serialize)]
pub struct StockResponse {
    pub product_id: String,
    pub quantity: i64,
    pub in_stock: bool,
}

/// GET /inventory/:product_id — current stock level.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<StockResponse>, ApiError> {
    let product = state.product(&product_id).await?;
    let ledger = state.checkout.inventory();

    Ok(Json(StockResponse {
        product_id,
        quantity: ledger.quantity_of(&product),
        in_stock: ledger.in_stock(&product),
    }))
}

/// POST /inventory/:product_id — add stock, registering the product with the ledger if new.
#[tracing::instrument(skip(state, req), fields(quantity = req.quantity))]
pub async fn add(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Json(req): Json<AddStockRequest>,
) -> Result<Json<StockResponse>, ApiError> {
    let product = state.product(&product_id).await?;
    let ledger = state.checkout.inventory();
    ledger.add_stock(&product, req.quantity)?;

    Ok(Json(StockResponse {
        product_id,
        quantity: ledger.quantity_of(&product),
        in_stock: ledger.in_stock(&product),
    }))
}

/// DELETE /inventory/:product_id — drop a product from the ledger.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product = state.product(&product_id).await?;
    state.checkout.inventory().remove_product(&product)?;
    Ok(StatusCode::NO_CONTENT)
}
