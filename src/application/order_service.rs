use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{Address, Order, OrderUpdate, PaymentMethod};
use crate::domain::ports::{CartRepository, OrderRepository, ProductRepository};

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            orders,
            carts,
            products,
        }
    }

    /// Freezes the user's cart into an order, then clears the cart.
    ///
    /// The two writes are not atomic: if clearing fails the order stands and
    /// the cart keeps its lines.
    pub fn place_order(
        &self,
        user_id: Uuid,
        address: Address,
        payment_method: PaymentMethod,
    ) -> Result<Order, DomainError> {
        let mut cart = match self.carts.find_by_user(user_id)? {
            Some(cart) if !cart.is_empty() => cart,
            _ => return Err(DomainError::EmptyCart),
        };

        let ids: Vec<Uuid> = cart.lines.iter().map(|l| l.product_id).collect();
        let products: HashMap<Uuid, _> = self
            .products
            .find_many(&ids)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let order = Order::from_cart(&cart, &products, address, payment_method)?;
        self.orders.insert(&order)?;
        log::info!(
            "order {} placed by {} with {} line(s), total {}",
            order.id,
            user_id,
            order.lines.len(),
            order.total_price
        );

        cart.clear();
        if let Err(e) = self.carts.save(&cart) {
            log::error!("order {} created but cart {} was not cleared: {}", order.id, cart.id, e);
            return Err(e);
        }
        Ok(order)
    }

    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.orders.list(Some(user_id), None)
    }

    pub fn list_all(&self) -> Result<Vec<Order>, DomainError> {
        self.orders.list(None, None)
    }

    pub fn get_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_by_id(id)?
            .filter(|o| o.user_id == user_id)
            .ok_or_else(|| DomainError::not_found("Order"))
    }

    /// Partial update of status, payment or address. Any status may follow any
    /// other here; only `cancel` checks the current status.
    pub fn update(&self, id: Uuid, update: OrderUpdate) -> Result<Order, DomainError> {
        let mut order = self
            .orders
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Order"))?;
        order.apply(update);
        self.orders.update(&order)?;
        log::info!(
            "order {} updated: status={} payment={} method={}",
            order.id,
            order.status,
            order.payment_status,
            order.payment_method
        );
        Ok(order)
    }

    pub fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        match self.orders.cancel(id, user_id)? {
            Some(order) => {
                log::info!("order {id} cancelled by {user_id}");
                Ok(order)
            }
            None => {
                log::debug!("order {id} not cancellable for {user_id}");
                Err(DomainError::NotCancellable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cart_service::CartService;
    use crate::domain::order::tests::address;
    use crate::domain::order::{OrderStatus, PaymentStatus};
    use crate::test_utils::{seed_product, MemoryStore};

    struct Fixture {
        store: Arc<MemoryStore>,
        carts: CartService,
        orders: OrderService,
    }

    fn fixture() -> Fixture {
        let store = MemoryStore::shared();
        Fixture {
            carts: CartService::new(store.clone(), store.clone()),
            orders: OrderService::new(store.clone(), store.clone(), store.clone()),
            store,
        }
    }

    #[test]
    fn place_order_freezes_lines_and_clears_cart() {
        let f = fixture();
        let user = Uuid::new_v4();
        let a = seed_product(&f.store, "Ring", "1000", "10");
        let b = seed_product(&f.store, "Chain", "300", "0");
        f.carts.add_or_update_line(user, a.id, 2).expect("add a");
        let before = f.carts.add_or_update_line(user, b.id, 1).expect("add b");

        let order = f
            .orders
            .place_order(user, address(), PaymentMethod::Cod)
            .expect("order");

        assert_eq!(order.lines.len(), 2);
        for (frozen, line) in order.lines.iter().zip(&before.cart.lines) {
            assert_eq!(frozen.discounted_price, line.discounted_price);
        }
        assert!(f.carts.get(user).expect("get").is_none());
        let stored = f.store.find_by_user(user).expect("query").expect("cart kept");
        assert!(stored.lines.is_empty());
        assert_eq!(f.orders.list_for_user(user).expect("list").len(), 1);
    }

    #[test]
    fn place_order_with_empty_cart_fails() {
        let f = fixture();
        assert!(matches!(
            f.orders.place_order(Uuid::new_v4(), address(), PaymentMethod::Cod),
            Err(DomainError::EmptyCart)
        ));
    }

    #[test]
    fn cancel_is_owner_and_status_scoped() {
        let f = fixture();
        let user = Uuid::new_v4();
        let p = seed_product(&f.store, "Ring", "10", "0");
        f.carts.add_or_update_line(user, p.id, 1).expect("add");
        let order = f
            .orders
            .place_order(user, address(), PaymentMethod::Upi)
            .expect("order");

        assert!(matches!(
            f.orders.cancel(order.id, Uuid::new_v4()),
            Err(DomainError::NotCancellable)
        ));

        let cancelled = f.orders.cancel(order.id, user).expect("cancel");
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

        assert!(matches!(
            f.orders.cancel(order.id, user),
            Err(DomainError::NotCancellable)
        ));
    }

    #[test]
    fn shipped_orders_cannot_be_cancelled() {
        let f = fixture();
        let user = Uuid::new_v4();
        let p = seed_product(&f.store, "Ring", "10", "0");
        f.carts.add_or_update_line(user, p.id, 1).expect("add");
        let order = f
            .orders
            .place_order(user, address(), PaymentMethod::Cod)
            .expect("order");

        let update = OrderUpdate::parse(Some("shipped"), Some("paid"), None, None).expect("valid");
        f.orders.update(order.id, update).expect("update");

        assert!(f.orders.cancel(order.id, user).is_err());
        let stored = f.orders.get_for_user(order.id, user).expect("get");
        assert_eq!(stored.status, OrderStatus::Shipped);
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn update_unknown_order_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.orders.update(Uuid::new_v4(), OrderUpdate::default()),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn orders_are_private_to_their_owner() {
        let f = fixture();
        let user = Uuid::new_v4();
        let p = seed_product(&f.store, "Ring", "10", "0");
        f.carts.add_or_update_line(user, p.id, 1).expect("add");
        let order = f
            .orders
            .place_order(user, address(), PaymentMethod::Cod)
            .expect("order");

        assert!(f.orders.get_for_user(order.id, Uuid::new_v4()).is_err());
        assert!(f.orders.list_for_user(Uuid::new_v4()).expect("list").is_empty());
    }
}
