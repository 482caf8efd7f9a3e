//! Order lookup, status update and order history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct HistoryFilter {
    pub status: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub lines: Vec<OrderLineResponse>,
    pub total: f64,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        let lines = order
            .lines()
            .map(|line| OrderLineResponse {
                product_id: line.product.id().to_string(),
                product_name: line.product.name().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.total_price(),
            })
            .collect();

        Self {
            id: order.id().to_string(),
            user_id: order.owner().id().to_string(),
            status: order.status(),
            lines,
            total: order.total(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct SpendingResponse {
    pub user_id: String,
    pub total_spending: f64,
}

// -- Handlers --

/// GET /orders/:id — load an order from the history view.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::parse(id)?;
    let order = state
        .checkout
        .history()
        .get_order(&order_id)
        .ok_or_else(|| ApiError::not_found("Order", order_id.as_str()))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// PUT /orders/:id/status — move an order to a new status and notify subscribers.
#[tracing::instrument(skip(state, req), fields(status = %req.status))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status: OrderStatus = req.status.parse()?;

    let mut orders = state.orders.lock().await;
    let order = orders
        .get_mut(id.as_str())
        .ok_or_else(|| ApiError::not_found("Order", &id))?;
    state.checkout.change_status(order, status);

    Ok(Json(OrderResponse::from(&*order)))
}

/// GET /users/:id/orders — a customer's orders, oldest first, optionally filtered by status.
#[tracing::instrument(skip(state, filter))]
pub async fn list_for_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(filter): Query<HistoryFilter>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let user_id = UserId::parse(user_id)?;
    let history = state.checkout.history();

    let orders = match filter.status {
        Some(status) => history.orders_for_by_status(&user_id, status.parse()?),
        None => history.orders_for(&user_id),
    };

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /users/:id/spending — sum of every order the customer placed.
#[tracing::instrument(skip(state))]
pub async fn spending(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SpendingResponse>, ApiError> {
    let user_id = UserId::parse(user_id)?;
    let total_spending = state.checkout.history().total_spending(&user_id);

    Ok(Json(SpendingResponse {
        user_id: user_id.to_string(),
        total_spending,
    }))
}
