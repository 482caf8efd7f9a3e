//! Product and user registration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{Cart, Product, Tier, User};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Deserialize)]
pub struct UpdatePriceRequest {
    pub price: f64,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Tier name, case-insensitive; Regular when absent.
    pub tier: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub tier: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            price: product.price(),
        }
    }
}

// -- Handlers --

/// POST /products — register a product.
#[tracing::instrument(skip(state, req), fields(product_id = %req.id))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = Product::new(req.id, req.name, req.price)?;

    let mut products = state.products.write().await;
    if products.contains_key(product.id()) {
        return Err(ApiError::BadRequest(format!(
            "Product {} already exists",
            product.id()
        )));
    }
    products.insert(product.id().clone(), product.clone());

    tracing::info!("product registered");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(&product))))
}

/// GET /products/:id — fetch a product with its current price.
#[tracing::instrument(skip(state))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.product(&id).await?;
    Ok(Json(ProductResponse::from(&product)))
}

/// PUT /products/:id/price — change a product's price.
///
/// Carts see the new price immediately; placed orders keep their captured total.
#[tracing::instrument(skip(state, req))]
pub async fn update_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.product(&id).await?;
    product.set_price(req.price)?;
    Ok(Json(ProductResponse::from(&product)))
}

/// POST /users — register a customer.
#[tracing::instrument(skip(state, req), fields(user_id = %req.id))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let tier = parse_tier(req.tier.as_deref())?.unwrap_or_default();
    let user = User::with_tier(req.id, req.username, req.email, tier)?;

    let mut users = state.users.write().await;
    if users.contains_key(user.id()) {
        return Err(ApiError::BadRequest(format!(
            "User {} already exists",
            user.id()
        )));
    }
    users.insert(user.id().clone(), user.clone());

    tracing::info!(tier = %user.tier(), "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/:id — change a customer's email and/or tier.
///
/// An open cart is rebound to the updated user so later pricing uses the new tier.
#[tracing::instrument(skip(state, req))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let tier = parse_tier(req.tier.as_deref())?;

    let mut users = state.users.write().await;
    let user = users
        .get_mut(id.as_str())
        .ok_or_else(|| ApiError::not_found("User", &id))?;

    let mut updated = user.clone();
    if let Some(email) = req.email {
        updated.set_email(email)?;
    }
    if let Some(tier) = tier {
        updated.set_tier(tier);
    }

    // Users lock is still held, so no cart can be created for the old user meanwhile.
    let mut carts = state.carts.lock().await;
    if let Some(cart) = carts.get_mut(updated.id()) {
        let mut rebound = Cart::new(updated.clone());
        for line in cart.lines() {
            rebound.add_line(&line.product, line.quantity)?;
        }
        *cart = rebound;
    }
    *user = updated.clone();

    Ok(Json(updated))
}

fn parse_tier(name: Option<&str>) -> Result<Option<Tier>, ApiError> {
    Ok(name.map(str::parse::<Tier>).transpose()?)
}
