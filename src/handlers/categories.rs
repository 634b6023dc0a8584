use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    /// Markup is stripped before storing.
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct ListCategoriesParams {
    /// Include soft-deleted categories. Defaults to false.
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            is_deleted: c.deleted,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// GET /category/get
#[utoipa::path(
    get,
    path = "/api/category/get",
    params(ListCategoriesParams),
    responses((status = 200, description = "Categories", body = [CategoryResponse])),
    tag = "categories"
)]
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<ListCategoriesParams>,
) -> Result<HttpResponse, AppError> {
    let include_deleted = query.into_inner().include_deleted;
    let catalog = state.catalog.clone();
    let categories = blocking(move || catalog.list_categories(include_deleted)).await?;
    let body: Vec<CategoryResponse> = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /category/post
#[utoipa::path(
    post,
    path = "/api/category/post",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Name missing"),
        (status = 409, description = "An active category with this name exists"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let CreateCategoryRequest { name, description } = body.into_inner();
    let name = name.ok_or_else(|| DomainError::invalid("Category name is required!"))?;
    let catalog = state.catalog.clone();
    let category =
        blocking(move || catalog.create_category(&name, description.as_deref())).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Category created successfully!",
        "category": CategoryResponse::from(category),
    })))
}

/// DELETE /category/{id}
///
/// Soft delete; repeating it is harmless.
#[utoipa::path(
    delete,
    path = "/api/category/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category flagged as deleted", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let id = path.into_inner();
    let category = blocking(move || catalog.delete_category(id)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Category soft deleted successfully",
        "category": CategoryResponse::from(category),
    })))
}
