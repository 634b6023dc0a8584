use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{OrderRepository, ProductRepository, UserRepository};

const RECENT_ORDERS: i64 = 5;

#[derive(Debug, Clone)]
pub struct StatusCounts {
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user_count: i64,
    pub order_count: i64,
    pub product_count: i64,
    /// Σ total price of delivered orders.
    pub total_revenue: BigDecimal,
    /// Number of delivered orders.
    pub total_sales: i64,
    pub status: StatusCounts,
    pub recent_orders: Vec<Order>,
}

#[derive(Clone)]
pub struct StatsService {
    users: Arc<dyn UserRepository>,
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
}

impl StatsService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            users,
            orders,
            products,
        }
    }

    pub fn dashboard(&self) -> Result<Dashboard, DomainError> {
        let delivered = self.orders.count(Some(OrderStatus::Delivered))?;
        Ok(Dashboard {
            user_count: self.users.count()?,
            order_count: self.orders.count(None)?,
            product_count: self.products.count()?,
            total_revenue: self.orders.revenue(OrderStatus::Delivered)?,
            total_sales: delivered,
            status: StatusCounts {
                processing: self.orders.count(Some(OrderStatus::Processing))?,
                shipped: self.orders.count(Some(OrderStatus::Shipped))?,
                delivered,
                cancelled: self.orders.count(Some(OrderStatus::Cancelled))?,
            },
            recent_orders: self.orders.list(None, Some(RECENT_ORDERS))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use uuid::Uuid;

    use super::*;
    use crate::application::cart_service::CartService;
    use crate::application::order_service::OrderService;
    use crate::domain::order::tests::address;
    use crate::domain::order::{OrderUpdate, PaymentMethod};
    use crate::test_utils::{seed_product, MemoryStore};

    #[test]
    fn revenue_counts_only_delivered_orders() {
        let store = MemoryStore::shared();
        let carts = CartService::new(store.clone(), store.clone());
        let orders = OrderService::new(store.clone(), store.clone(), store.clone());
        let stats = StatsService::new(store.clone(), store.clone(), store.clone());
        let p = seed_product(&store, "Ring", "1000", "10");
        let user = Uuid::new_v4();

        let mut placed = Vec::new();
        for _ in 0..2 {
            carts.add_or_update_line(user, p.id, 1).expect("add");
            placed.push(orders.place_order(user, address(), PaymentMethod::Cod).expect("order"));
        }
        let delivered = OrderUpdate::parse(Some("delivered"), None, None, None).expect("valid");
        orders.update(placed[0].id, delivered).expect("deliver");

        let dashboard = stats.dashboard().expect("dashboard");
        assert_eq!(dashboard.order_count, 2);
        assert_eq!(dashboard.product_count, 1);
        assert_eq!(dashboard.total_sales, 1);
        assert_eq!(dashboard.status.delivered, 1);
        assert_eq!(dashboard.total_revenue, BigDecimal::from_str("900").expect("decimal"));
        assert_eq!(dashboard.recent_orders.len(), 2);
    }
}
