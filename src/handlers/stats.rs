use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::stats_service::{Dashboard, StatusCounts};
use crate::auth::AdminUser;
use crate::errors::AppError;
use crate::state::AppState;

use super::blocking;
use super::orders::{orders_response, OrderResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCountsResponse {
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

impl From<StatusCounts> for StatusCountsResponse {
    fn from(s: StatusCounts) -> Self {
        Self {
            processing: s.processing,
            shipped: s.shipped,
            delivered: s.delivered,
            cancelled: s.cancelled,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_count: i64,
    pub order_count: i64,
    pub product_count: i64,
    /// Sum of delivered orders' total price.
    pub total_revenue: String,
    pub total_sales: i64,
    pub status: StatusCountsResponse,
    pub recent_orders: Vec<OrderResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        Self {
            user_count: d.user_count,
            order_count: d.order_count,
            product_count: d.product_count,
            total_revenue: d.total_revenue.to_string(),
            total_sales: d.total_sales,
            status: d.status.into(),
            recent_orders: orders_response(d.recent_orders),
        }
    }
}

/// GET /stats
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard figures", body = DashboardResponse),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "stats"
)]
pub async fn dashboard(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let stats = state.stats.clone();
    let dashboard = blocking(move || stats.dashboard()).await?;
    Ok(HttpResponse::Ok().json(DashboardResponse::from(dashboard)))
}
