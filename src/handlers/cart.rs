use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::cart_service::CartView;
use crate::auth::{AdminUser, AuthUser};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;
use super::products::ProductSummaryResponse;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub product_id: Uuid,
    /// Current catalog entry; absent when the product has since been deleted.
    pub product: Option<ProductSummaryResponse>,
    pub quantity: i32,
    /// Price captured when the line was last added.
    pub price: String,
    pub discount: String,
    pub discounted_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub products: Vec<CartLineResponse>,
    pub total_price: String,
    pub total_discount: String,
    pub final_price: String,
    pub tax: String,
    pub grand_total: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        let CartView { cart, products } = view;
        let mut summaries: HashMap<Uuid, ProductSummaryResponse> = products
            .into_iter()
            .map(|s| (s.id, ProductSummaryResponse::from(s)))
            .collect();
        let totals = &cart.totals;

        Self {
            id: cart.id,
            user_id: cart.user_id,
            total_price: totals.total_price.to_string(),
            total_discount: totals.total_discount.to_string(),
            final_price: totals.final_price().to_string(),
            tax: totals.tax().to_string(),
            grand_total: totals.grand_total().to_string(),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
            products: cart
                .lines
                .iter()
                .map(|line| CartLineResponse {
                    product_id: line.product_id,
                    product: summaries.remove(&line.product_id),
                    quantity: line.quantity,
                    price: line.price.to_string(),
                    discount: line.discount.to_string(),
                    discounted_price: line.discounted_price.to_string(),
                })
                .collect(),
        }
    }
}

fn cart_message(message: &str, view: CartView) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": message,
        "cart": CartResponse::from(view),
    }))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /cart/post
///
/// Adds a product or increments its quantity, refreshing the line's price
/// snapshot from the catalog.
#[utoipa::path(
    post,
    path = "/api/cart/post",
    request_body = CartLineRequest,
    responses(
        (status = 200, description = "Cart updated", body = CartResponse),
        (status = 400, description = "Cart limit reached or invalid quantity"),
        (status = 404, description = "Product not found"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let CartLineRequest { product_id, quantity } = body.into_inner();
    let carts = state.carts.clone();
    let view = blocking(move || carts.add_or_update_line(user.id, product_id, quantity)).await?;
    Ok(cart_message("Cart updated !!", view))
}

/// GET /cart/get
#[utoipa::path(
    get,
    path = "/api/cart/get",
    responses(
        (status = 200, description = "The caller's cart, or an empty placeholder", body = CartResponse),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let view = blocking(move || carts.get(user.id)).await?;
    Ok(match view {
        Some(view) => HttpResponse::Ok().json(CartResponse::from(view)),
        None => HttpResponse::Ok().json(json!({
            "message": "No item yet in cart",
            "cart": {
                "products": [],
                "totalPrice": "0",
                "totalDiscount": "0",
            },
        })),
    })
}

/// PATCH /cart/update
///
/// Overwrites a line's quantity; zero or less removes the line. The price
/// snapshot is left as is.
#[utoipa::path(
    patch,
    path = "/api/cart/update",
    request_body = CartLineRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 404, description = "Cart not found or product not in cart"),
    ),
    tag = "cart"
)]
pub async fn update_cart_line(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let CartLineRequest { product_id, quantity } = body.into_inner();
    let carts = state.carts.clone();
    let view = blocking(move || carts.set_line_quantity(user.id, product_id, quantity)).await?;
    Ok(cart_message("Quantity updated", view))
}

/// DELETE /cart/delete/{productId}
#[utoipa::path(
    delete,
    path = "/api/cart/delete/{productId}",
    params(("productId" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Line removed", body = CartResponse),
        (status = 404, description = "Cart not found or product not in cart"),
    ),
    tag = "cart"
)]
pub async fn remove_cart_line(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let carts = state.carts.clone();
    let view = blocking(move || carts.remove_line(user.id, product_id)).await?;
    Ok(cart_message("Product removed from cart", view))
}

/// GET /admin/carts
#[utoipa::path(
    get,
    path = "/api/admin/carts",
    responses(
        (status = 200, description = "Every user's cart", body = [CartResponse]),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "cart"
)]
pub async fn list_carts(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let carts = state.carts.clone();
    let views = blocking(move || carts.list_all()).await?;
    let carts: Vec<CartResponse> = views.into_iter().map(CartResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({
        "message": "All carts fetched successfully",
        "carts": carts,
    })))
}
