use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::domain::order::Address;
use crate::domain::user::{Registration, Role, User};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;
use super::orders::AddressDto;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<AddressDto>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            full_name: r.full_name,
            email: r.email,
            phone: r.phone,
            address: r.address.map(Address::from),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleRequest {
    /// `user` or `admin`.
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub address: Option<AddressDto>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            phone: u.phone,
            role: u.role.to_string(),
            address: u.address.map(AddressDto::from),
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// POST /user/register
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or malformed field"),
        (status = 409, description = "Email or phone already registered"),
    ),
    tag = "users"
)]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let registration = Registration::from(body.into_inner());
    let users = state.users.clone();
    let user = blocking(move || users.register(registration, Role::User)).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": UserResponse::from(user),
    })))
}

/// POST /admin/user/register
///
/// Accounts created by an admin always get the `user` role.
#[utoipa::path(
    post,
    path = "/api/admin/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Email or phone already registered"),
    ),
    tag = "users"
)]
pub async fn admin_register(
    state: web::Data<AppState>,
    admin: AdminUser,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let registration = Registration::from(body.into_inner());
    let users = state.users.clone();
    let user = blocking(move || users.register(registration, Role::User)).await?;
    log::info!("user {} registered by admin {}", user.id, admin.0.id);
    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully by Admin",
        "user": UserResponse::from(user),
    })))
}

/// GET /user/profile
#[utoipa::path(
    get,
    path = "/api/user/profile",
    responses(
        (status = 200, description = "The caller's account", body = UserResponse),
        (status = 404, description = "No account for this identity"),
    ),
    tag = "users"
)]
pub async fn profile(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let users = state.users.clone();
    let found = blocking(move || users.get(user.id)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(found)))
}

/// GET /admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "All accounts", body = [UserResponse])),
    tag = "users"
)]
pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let users = state.users.clone();
    let all = blocking(move || users.list()).await?;
    let body: Vec<UserResponse> = all.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /admin/users/{id}
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn get_user(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let users = state.users.clone();
    let user = blocking(move || users.get(id)).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT /admin/users/{id}/status
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/status",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Active flag changed", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn set_status(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let active = body.into_inner().is_active;
    let users = state.users.clone();
    let user = blocking(move || users.set_active(id, active)).await?;
    let verb = if active { "activated" } else { "deactivated" };
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("User {verb} successfully"),
        "user": UserResponse::from(user),
    })))
}

/// PUT /admin/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 400, description = "Invalid role"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn set_role(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
    body: web::Json<RoleRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let role: Role = body.into_inner().role.trim().parse()?;
    let users = state.users.clone();
    let user = blocking(move || users.set_role(id, role)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("User role updated to {role}"),
        "user": UserResponse::from(user),
    })))
}

/// DELETE /admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found"),
    ),
    tag = "users"
)]
pub async fn delete_user(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let users = state.users.clone();
    blocking(move || users.delete(id)).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
