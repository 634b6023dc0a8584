use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::catalog_service::CategoryCount;
use crate::auth::{AdminUser, AuthUser};
use crate::domain::errors::DomainError;
use crate::domain::product::{
    CategoryRef, Product, ProductDraft, ProductPatch, ProductSummary, StoneDetail,
};
use crate::errors::AppError;
use crate::state::AppState;

use super::{blocking, decimal};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoneDetailDto {
    pub stone_type: Option<String>,
    pub carat: Option<f64>,
    pub color: Option<String>,
    pub clarity: Option<String>,
}

impl From<StoneDetailDto> for StoneDetail {
    fn from(d: StoneDetailDto) -> Self {
        Self {
            stone_type: d.stone_type,
            carat: d.carat,
            color: d.color,
            clarity: d.clarity,
        }
    }
}

impl From<StoneDetail> for StoneDetailDto {
    fn from(d: StoneDetail) -> Self {
        Self {
            stone_type: d.stone_type,
            carat: d.carat,
            color: d.color,
            clarity: d.clarity,
        }
    }
}

/// Body of `POST /product/post`. Decimals may be strings or numbers.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>, example = "1000.00")]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>, example = "10")]
    pub discount: Option<BigDecimal>,
    pub quantity: Option<i32>,
    /// `in-stock`, `out-of-stock` or `preorder`.
    pub status: Option<String>,
    pub category: Option<Uuid>,
    pub description: Option<String>,
    pub overview: Option<String>,
    /// Relative paths returned by the upload service.
    #[serde(default)]
    pub images: Vec<String>,
    /// `Gold`, `Silver`, `Platinum`, `Diamond` or `Other`.
    pub material: Option<String>,
    pub purity: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>)]
    pub weight: Option<BigDecimal>,
    #[serde(default)]
    pub stone_details: Vec<StoneDetailDto>,
    pub size: Option<String>,
    /// `Men`, `Women`, `Unisex` or `Kids`.
    pub gender: Option<String>,
    pub occasion: Option<String>,
}

/// Body of `PUT /product/update/{id}`; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>)]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>)]
    pub discount: Option<BigDecimal>,
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub category: Option<Uuid>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub images: Option<Vec<String>>,
    pub material: Option<String>,
    pub purity: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>)]
    pub weight: Option<BigDecimal>,
    pub stone_details: Option<Vec<StoneDetailDto>>,
    pub size: Option<String>,
    pub gender: Option<String>,
    pub occasion: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RepriceRequest {
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>, example = "1200")]
    pub price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    #[schema(value_type = Option<String>, example = "15")]
    pub discount: Option<BigDecimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub price: String,
    pub discount: String,
    pub discounted_price: String,
    pub quantity: i32,
    pub status: String,
    pub stock_message: String,
    pub average_rating: String,
    pub num_reviews: i32,
    pub images: Vec<String>,
    pub material: String,
    pub purity: Option<String>,
    pub weight: Option<String>,
    pub stone_details: Vec<StoneDetailDto>,
    pub size: Option<String>,
    pub gender: String,
    pub occasion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            discounted_price: p.discounted_price().to_string(),
            stock_message: p.stock_message(),
            id: p.id,
            owner_id: p.owner_id,
            category_id: p.category_id,
            name: p.name,
            description: p.description,
            overview: p.overview,
            price: p.price.to_string(),
            discount: p.discount.to_string(),
            quantity: p.quantity,
            status: p.status.to_string(),
            average_rating: p.average_rating.to_string(),
            num_reviews: p.num_reviews,
            images: p.images,
            material: p.material.to_string(),
            purity: p.purity,
            weight: p.weight.map(|w| w.to_string()),
            stone_details: p.stone_details.into_iter().map(StoneDetailDto::from).collect(),
            size: p.size,
            gender: p.gender.to_string(),
            occasion: p.occasion,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRefResponse {
    pub id: Uuid,
    pub name: String,
}

/// Catalog entry as embedded in carts and wishlists.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub discount: String,
    pub images: Vec<String>,
    pub category: Option<CategoryRefResponse>,
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(s: ProductSummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            price: s.price.to_string(),
            discount: s.discount.to_string(),
            images: s.images,
            category: s.category.map(|CategoryRef { id, name }| CategoryRefResponse { id, name }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryCountResponse {
    /// Category id.
    pub category: Uuid,
    pub name: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountResponse {
    fn from(c: CategoryCount) -> Self {
        Self {
            category: c.category_id,
            name: c.name,
            count: c.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCountsResponse {
    pub category_count: Vec<CategoryCountResponse>,
}

fn parse_field<T>(raw: Option<String>) -> Result<Option<T>, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse())
        .transpose()
}

fn required_missing() -> DomainError {
    DomainError::invalid("Required product details missing!")
}

impl CreateProductRequest {
    fn into_draft(self) -> Result<ProductDraft, DomainError> {
        let name = self.name.filter(|n| !n.trim().is_empty()).ok_or_else(required_missing)?;
        let price = self.price.ok_or_else(required_missing)?;
        let category_id = self.category.ok_or_else(required_missing)?;
        let material = parse_field(self.material)?.ok_or_else(required_missing)?;

        Ok(ProductDraft {
            category_id,
            name,
            description: self.description,
            overview: self.overview,
            price,
            discount: self.discount.unwrap_or_else(|| BigDecimal::from(0)),
            quantity: self.quantity.unwrap_or(0),
            status: parse_field(self.status)?.unwrap_or_default(),
            images: self.images,
            material,
            purity: self.purity,
            weight: self.weight,
            stone_details: self.stone_details.into_iter().map(StoneDetail::from).collect(),
            size: self.size,
            gender: parse_field(self.gender)?.unwrap_or_default(),
            occasion: self.occasion,
        })
    }
}

impl UpdateProductRequest {
    fn into_patch(self) -> Result<ProductPatch, DomainError> {
        Ok(ProductPatch {
            category_id: self.category,
            name: self.name,
            description: self.description,
            overview: self.overview,
            price: self.price,
            discount: self.discount,
            quantity: self.quantity,
            status: parse_field(self.status)?,
            images: self.images,
            material: parse_field(self.material)?,
            purity: self.purity,
            weight: self.weight,
            stone_details: self
                .stone_details
                .map(|s| s.into_iter().map(StoneDetail::from).collect()),
            size: self.size,
            gender: parse_field(self.gender)?,
            occasion: self.occasion,
        })
    }
}

fn products_response(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /product/get
#[utoipa::path(
    get,
    path = "/api/product/get",
    responses(
        (status = 200, description = "Every product in the catalog", body = [ProductResponse]),
        (status = 401, description = "Missing identity"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let products = blocking(move || catalog.list_products(None)).await?;
    Ok(HttpResponse::Ok().json(products_response(products)))
}

/// GET /admin/products
///
/// Products created by the calling admin.
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "The caller's own products", body = [ProductResponse]),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "products"
)]
pub async fn list_own_products(
    state: web::Data<AppState>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let owner = admin.0.id;
    let products = blocking(move || catalog.list_products(Some(owner))).await?;
    Ok(HttpResponse::Ok().json(products_response(products)))
}

/// GET /product/{id}
#[utoipa::path(
    get,
    path = "/api/product/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let id = path.into_inner();
    let product = blocking(move || catalog.get_product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /product/post
#[utoipa::path(
    post,
    path = "/api/product/post",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Required product details missing"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Caller already has a product with this name"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let catalog = state.catalog.clone();
    let product = blocking(move || catalog.create_product(user.id, draft)).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Product created successfully!",
        "product": ProductResponse::from(product),
    })))
}

/// PUT /product/update/{id}
///
/// Partial update restricted to the product's owner.
#[utoipa::path(
    put,
    path = "/api/product/update/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Product not found or not owned by the caller"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let patch = body.into_inner().into_patch()?;
    let catalog = state.catalog.clone();
    let id = path.into_inner();
    let product = blocking(move || catalog.update_product(id, user.id, patch)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Product updated successfully!",
        "updatedProduct": ProductResponse::from(product),
    })))
}

/// PATCH /product/update/{id}
///
/// Changes price and/or discount only.
#[utoipa::path(
    patch,
    path = "/api/product/update/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = RepriceRequest,
    responses(
        (status = 200, description = "Product repriced", body = ProductResponse),
        (status = 400, description = "Neither price nor discount given, or out of range"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn reprice_product(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<RepriceRequest>,
) -> Result<HttpResponse, AppError> {
    let RepriceRequest { price, discount } = body.into_inner();
    let catalog = state.catalog.clone();
    let id = path.into_inner();
    let product = blocking(move || catalog.reprice_product(id, price, discount)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Product updated successfully",
        "product": ProductResponse::from(product),
    })))
}

/// DELETE /product/{id}
#[utoipa::path(
    delete,
    path = "/api/product/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found or not owned by the caller"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let id = path.into_inner();
    blocking(move || catalog.delete_product(id, user.id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Deleted successfully!" })))
}

/// GET /product/count
#[utoipa::path(
    get,
    path = "/api/product/count",
    responses(
        (status = 200, description = "Number of products per category", body = CategoryCountsResponse),
    ),
    tag = "products"
)]
pub async fn count_products(
    state: web::Data<AppState>,
    _user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let counts = blocking(move || catalog.count_by_category()).await?;
    Ok(HttpResponse::Ok().json(CategoryCountsResponse {
        category_count: counts.into_iter().map(CategoryCountResponse::from).collect(),
    }))
}
