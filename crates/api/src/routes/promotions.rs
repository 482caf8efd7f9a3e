//! Promotion and discount policy endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PolicyRequest {
    pub combination_enabled: bool,
}

#[derive(Serialize)]
pub struct PolicyResponse {
    pub combination_enabled: bool,
}

#[derive(Deserialize)]
pub struct PromotionRequest {
    pub percentage: f64,
}

#[derive(Serialize)]
pub struct PromotionResponse {
    pub product_id: String,
    pub percentage: f64,
}

/// PUT /promotions — toggle whether promotional and tier discounts stack.
#[tracing::instrument(skip(state, req), fields(enabled = req.combination_enabled))]
pub async fn set_policy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PolicyRequest>,
) -> Json<PolicyResponse> {
    let discounts = state.checkout.discounts();
    discounts.set_combination_enabled(req.combination_enabled);
    Json(PolicyResponse {
        combination_enabled: discounts.combination_enabled(),
    })
}

/// PUT /promotions/:product_id — set or replace a product's promotion.
#[tracing::instrument(skip(state, req), fields(percentage = req.percentage))]
pub async fn upsert(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
    Json(req): Json<PromotionRequest>,
) -> Result<Json<PromotionResponse>, ApiError> {
    let discounts = state.checkout.discounts();
    discounts.add_promotion(&product_id, req.percentage)?;

    Ok(Json(PromotionResponse {
        percentage: discounts.promotion_for(&product_id)?,
        product_id,
    }))
}

/// DELETE /promotions/:product_id — remove a product's promotion.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.checkout.discounts().remove_promotion(&product_id)?;
    Ok(StatusCode::NO_CONTENT)
}
