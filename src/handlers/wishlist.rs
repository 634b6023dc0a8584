use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::product::ProductSummary;
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;
use super::products::ProductSummaryResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub product_id: Uuid,
}

fn summaries(products: Vec<ProductSummary>) -> Vec<ProductSummaryResponse> {
    products.into_iter().map(ProductSummaryResponse::from).collect()
}

/// POST /wishlist/add
#[utoipa::path(
    post,
    path = "/api/wishlist/add",
    request_body = WishlistRequest,
    responses(
        (status = 200, description = "Product added", body = [ProductSummaryResponse]),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product already in wishlist"),
    ),
    tag = "wishlist"
)]
pub async fn add_to_wishlist(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<WishlistRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body.into_inner().product_id;
    let wishlists = state.wishlists.clone();
    let products = blocking(move || wishlists.add(user.id, product_id)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Product added to wishlist",
        "wishlist": summaries(products),
    })))
}

/// DELETE /wishlist/remove/{productId}
#[utoipa::path(
    delete,
    path = "/api/wishlist/remove/{productId}",
    params(("productId" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product removed", body = [ProductSummaryResponse]),
        (status = 404, description = "Wishlist not found"),
    ),
    tag = "wishlist"
)]
pub async fn remove_from_wishlist(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let wishlists = state.wishlists.clone();
    let products = blocking(move || wishlists.remove(user.id, product_id)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Product removed from wishlist",
        "wishlist": summaries(products),
    })))
}

/// GET /wishlist/get
#[utoipa::path(
    get,
    path = "/api/wishlist/get",
    responses((status = 200, description = "Wishlisted products", body = [ProductSummaryResponse])),
    tag = "wishlist"
)]
pub async fn get_wishlist(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let wishlists = state.wishlists.clone();
    let products = blocking(move || wishlists.get(user.id)).await?;
    Ok(HttpResponse::Ok().json(summaries(products)))
}
