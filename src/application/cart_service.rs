use std::sync::Arc;

use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, ProductRepository};
use crate::domain::product::ProductSummary;

/// A cart together with catalog summaries for its lines.
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: Cart,
    pub products: Vec<ProductSummary>,
}

#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { carts, products }
    }

    /// Creates the cart on first use.
    pub fn add_or_update_line(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let product = self
            .products
            .find_by_id(product_id)?
            .ok_or_else(|| DomainError::not_found("Product"))?;

        let mut cart = self
            .carts
            .find_by_user(user_id)?
            .unwrap_or_else(|| Cart::new(user_id));
        cart.add_or_update_line(&product, quantity)?;
        self.carts.save(&cart)?;

        log::info!("cart {} for user {}: added {} x {}", cart.id, user_id, quantity, product_id);
        self.view(cart)
    }

    pub fn set_line_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let mut cart = self.require(user_id)?;
        cart.set_line_quantity(product_id, quantity)?;
        self.carts.save(&cart)?;
        self.view(cart)
    }

    pub fn remove_line(&self, user_id: Uuid, product_id: Uuid) -> Result<CartView, DomainError> {
        let mut cart = self.require(user_id)?;
        cart.remove_line(product_id)?;
        self.carts.save(&cart)?;
        self.view(cart)
    }

    /// `None` when the user has no cart or an empty one.
    pub fn get(&self, user_id: Uuid) -> Result<Option<CartView>, DomainError> {
        match self.carts.find_by_user(user_id)? {
            Some(cart) if !cart.is_empty() => self.view(cart).map(Some),
            _ => Ok(None),
        }
    }

    pub fn list_all(&self) -> Result<Vec<CartView>, DomainError> {
        self.carts
            .list()?
            .into_iter()
            .map(|cart| self.view(cart))
            .collect()
    }

    fn require(&self, user_id: Uuid) -> Result<Cart, DomainError> {
        self.carts
            .find_by_user(user_id)?
            .ok_or_else(|| DomainError::not_found("Cart"))
    }

    fn view(&self, cart: Cart) -> Result<CartView, DomainError> {
        let ids: Vec<Uuid> = cart.lines.iter().map(|l| l.product_id).collect();
        let products = self.products.summaries(&ids)?;
        Ok(CartView { cart, products })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::test_utils::{seed_product, MemoryStore};

    fn service(store: &Arc<MemoryStore>) -> CartService {
        CartService::new(store.clone(), store.clone())
    }

    #[test]
    fn first_add_creates_cart_and_populates_summary() {
        let store = MemoryStore::shared();
        let product = seed_product(&store, "Pendant", "1000", "10");
        let user = Uuid::new_v4();

        let view = service(&store)
            .add_or_update_line(user, product.id, 2)
            .expect("add");

        assert_eq!(view.cart.user_id, user);
        assert_eq!(view.products.len(), 1);
        assert_eq!(view.products[0].name, "Pendant");
        assert_eq!(
            view.cart.totals.grand_total(),
            BigDecimal::from_str("1890").expect("decimal")
        );
        let stored = store.find_by_user(user).expect("query").expect("saved cart");
        assert_eq!(stored.lines.len(), 1);
    }

    #[test]
    fn unknown_product_is_not_found() {
        let store = MemoryStore::shared();
        let err = service(&store)
            .add_or_update_line(Uuid::new_v4(), Uuid::new_v4(), 1)
            .expect_err("missing product");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn update_without_cart_is_not_found() {
        let store = MemoryStore::shared();
        let err = service(&store)
            .set_line_quantity(Uuid::new_v4(), Uuid::new_v4(), 3)
            .expect_err("no cart");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn get_returns_none_for_empty_cart() {
        let store = MemoryStore::shared();
        let product = seed_product(&store, "Pendant", "10", "0");
        let user = Uuid::new_v4();
        let svc = service(&store);

        assert!(svc.get(user).expect("get").is_none());
        svc.add_or_update_line(user, product.id, 1).expect("add");
        svc.remove_line(user, product.id).expect("remove");
        assert!(svc.get(user).expect("get").is_none());
    }
}
