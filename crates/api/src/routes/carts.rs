//! Shopping cart and checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::{CheckoutCoordinator, PricedLine, Receipt};
use common::OrderId;
use domain::Cart;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::orders::OrderResponse;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Deserialize, Default)]
pub struct CheckoutRequest {
    /// Caller-chosen order ID; generated when absent.
    pub order_id: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartResponse {
    pub user_id: String,
    pub lines: Vec<PricedLine>,
    /// Sum of list prices at current prices.
    pub total: f64,
    /// Sum of discounted line totals.
    pub amount_due: f64,
}

impl CartResponse {
    fn build(checkout: &CheckoutCoordinator, cart: &Cart) -> Self {
        let lines = checkout.quote(cart);
        let amount_due: f64 = lines.iter().map(|line| line.line_total).sum();
        Self {
            user_id: cart.owner().id().to_string(),
            lines,
            total: cart.total(),
            amount_due,
        }
    }
}

#[derive(Serialize)]
pub struct ReceiptResponse {
    pub order: OrderResponse,
    pub lines: Vec<PricedLine>,
    pub amount_due: f64,
    pub savings: f64,
}

impl From<Receipt> for ReceiptResponse {
    fn from(receipt: Receipt) -> Self {
        Self {
            order: OrderResponse::from(&receipt.order),
            savings: receipt.savings(),
            lines: receipt.lines,
            amount_due: receipt.amount_due,
        }
    }
}

// -- Handlers --

/// GET /carts/:user_id — the user's cart priced at current prices.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let user = state.user(&user_id).await?;
    let carts = state.carts.lock().await;
    let response = match carts.get(user.id()) {
        Some(cart) => CartResponse::build(&state.checkout, cart),
        None => CartResponse::build(&state.checkout, &Cart::new(user)),
    };
    Ok(Json(response))
}

/// POST /carts/:user_id/items — add a product, merging with an existing line.
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id, quantity = req.quantity))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let product = state.product(&req.product_id).await?;

    // Hold the users lock so a concurrent tier change cannot leave the cart bound to a stale user.
    let users = state.users.read().await;
    let user = users
        .get(user_id.as_str())
        .ok_or_else(|| ApiError::not_found("User", &user_id))?;
    let mut carts = state.carts.lock().await;
    let cart = carts
        .entry(user.id().clone())
        .or_insert_with(|| Cart::new(user.clone()));
    cart.add_line(&product, req.quantity)?;

    Ok(Json(CartResponse::build(&state.checkout, cart)))
}

/// DELETE /carts/:user_id/items/:product_id — remove a product's line.
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Result<Json<CartResponse>, ApiError> {
    let product = state.product(&product_id).await?;

    let users = state.users.read().await;
    let user = users
        .get(user_id.as_str())
        .ok_or_else(|| ApiError::not_found("User", &user_id))?;
    let mut carts = state.carts.lock().await;
    let cart = carts
        .entry(user.id().clone())
        .or_insert_with(|| Cart::new(user.clone()));
    cart.remove_line(&product)?;

    Ok(Json(CartResponse::build(&state.checkout, cart)))
}

/// POST /carts/:user_id/checkout — place an order for the cart's contents.
///
/// Responds 409 when stock cannot cover every line; the cart is left as it was.
#[tracing::instrument(skip(state, body))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ReceiptResponse>), ApiError> {
    let user = state.user(&user_id).await?;
    let req: CheckoutRequest = if body.is_empty() {
        CheckoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid checkout request: {e}")))?
    };
    let order_id = match req.order_id {
        Some(id) => OrderId::parse(id)?,
        None => OrderId::generate(),
    };

    let mut carts = state.carts.lock().await;
    let mut orders = state.orders.lock().await;
    if orders.contains_key(&order_id) {
        return Err(ApiError::BadRequest(format!(
            "Order {order_id} already exists"
        )));
    }

    let cart = carts
        .entry(user.id().clone())
        .or_insert_with(|| Cart::new(user));
    let receipt = match state.checkout.place_order(order_id.clone(), cart) {
        Ok(receipt) => receipt,
        Err(err) => {
            // The cancelled order is still reachable through history and status updates.
            if let Some(cancelled) = state.checkout.history().get_order(&order_id) {
                orders.insert(order_id, cancelled);
            }
            return Err(err.into());
        }
    };
    orders.insert(receipt.order.id().clone(), receipt.order.clone());

    Ok((StatusCode::CREATED, Json(ReceiptResponse::from(receipt))))
}
