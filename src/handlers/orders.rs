use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AdminUser, AuthUser};
use crate::domain::order::{Address, Order, OrderLine, OrderUpdate, PaymentMethod};
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Missing fields deserialize as empty strings and are reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressDto {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<AddressDto> for Address {
    fn from(a: AddressDto) -> Self {
        Self {
            full_name: a.full_name,
            phone: a.phone,
            street: a.street,
            city: a.city,
            state: a.state,
            pincode: a.pincode,
        }
    }
}

impl From<Address> for AddressDto {
    fn from(a: Address) -> Self {
        Self {
            full_name: a.full_name,
            phone: a.phone,
            street: a.street,
            city: a.city,
            state: a.state,
            pincode: a.pincode,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub address: AddressDto,
    /// `COD` (default), `UPI`, `Card` or `NetBanking`; case-insensitive.
    pub payment_method: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub address: Option<AddressDto>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub material: Option<String>,
    pub purity: Option<String>,
    pub weight: Option<String>,
    pub size: Option<String>,
    pub price: String,
    pub discount: String,
    pub quantity: i32,
    pub discounted_price: String,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(l: OrderLine) -> Self {
        Self {
            product_id: l.product_id,
            name: l.name,
            material: l.material,
            purity: l.purity,
            weight: l.weight.map(|w| w.to_string()),
            size: l.size,
            price: l.price.to_string(),
            discount: l.discount.to_string(),
            quantity: l.quantity,
            discounted_price: l.discounted_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub products: Vec<OrderLineResponse>,
    /// Net of discount.
    pub total_price: String,
    pub total_discount: String,
    /// `totalPrice` plus tax.
    pub grand_total: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub address: AddressDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            grand_total: o.grand_total().to_string(),
            id: o.id,
            user_id: o.user_id,
            products: o.lines.into_iter().map(OrderLineResponse::from).collect(),
            total_price: o.total_price.to_string(),
            total_discount: o.total_discount.to_string(),
            status: o.status.to_string(),
            payment_status: o.payment_status.to_string(),
            payment_method: o.payment_method.to_string(),
            address: AddressDto::from(o.address),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

pub(crate) fn orders_response(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /order/post
///
/// Freezes the caller's cart into a pending order and empties the cart.
#[utoipa::path(
    post,
    path = "/api/order/post",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Cart is empty, or address/payment method invalid"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    user: AuthUser,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let PlaceOrderRequest {
        address,
        payment_method,
    } = body.into_inner();
    let payment_method = match payment_method.filter(|m| !m.trim().is_empty()) {
        Some(raw) => raw.parse::<PaymentMethod>()?,
        None => PaymentMethod::default(),
    };
    let orders = state.orders.clone();
    let order =
        blocking(move || orders.place_order(user.id, address.into(), payment_method)).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Order created successfully",
        "order": OrderResponse::from(order),
    })))
}

/// GET /order/get
///
/// The caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/order/get",
    responses((status = 200, description = "Orders of the caller", body = [OrderResponse])),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    let orders = state.orders.clone();
    let result = blocking(move || orders.list_for_user(user.id)).await?;
    Ok(HttpResponse::Ok().json(orders_response(result)))
}

/// GET /order/{id}
#[utoipa::path(
    get,
    path = "/api/order/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let orders = state.orders.clone();
    let order = blocking(move || orders.get_for_user(order_id, user.id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /order/update/{id}
///
/// Partial update; empty strings are treated as absent. No transition rules
/// are enforced.
#[utoipa::path(
    put,
    path = "/api/order/update/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid status, payment status or payment method"),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    _user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let update = OrderUpdate::parse(
        body.status.as_deref(),
        body.payment_status.as_deref(),
        body.payment_method.as_deref(),
        body.address.map(Address::from),
    )?;
    let order_id = path.into_inner();
    let orders = state.orders.clone();
    let order = blocking(move || orders.update(order_id, update)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Order updated successfully!",
        "order": OrderResponse::from(order),
    })))
}

/// PUT /order/cancel/{id}
///
/// Only the owner may cancel, and only while the order is pending or
/// processing. Payment is marked refunded.
#[utoipa::path(
    put,
    path = "/api/order/cancel/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found or cannot be cancelled"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let orders = state.orders.clone();
    let order = blocking(move || orders.cancel(order_id, user.id)).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Order cancelled successfully!",
        "order": OrderResponse::from(order),
    })))
}

/// GET /admin/orders
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "Every order, newest first", body = [OrderResponse]),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "orders"
)]
pub async fn list_all_orders(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let orders = state.orders.clone();
    let result = blocking(move || orders.list_all()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "All orders fetched successfully!",
        "count": result.len(),
        "orders": orders_response(result),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;

    #[test]
    fn missing_address_fields_are_reported_by_name() {
        let body: PlaceOrderRequest =
            serde_json::from_value(json!({ "address": { "fullName": "Asha" } })).expect("body");
        let address = Address::from(body.address);
        assert!(matches!(
            address.validate(),
            Err(DomainError::InvalidInput(ref m)) if m == "Address phone is required"
        ));
    }
}
