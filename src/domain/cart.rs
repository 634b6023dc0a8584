//! Per-user cart aggregate.
//!
//! Each line carries a price/discount snapshot taken from the catalog when the
//! line is added or re-added. Quantity-only updates keep the old snapshot.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::pricing::{discounted_price, PricedLine, Totals};
use super::product::Product;

/// Maximum number of distinct products in one cart.
pub const MAX_CART_LINES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub discounted_price: BigDecimal,
}

impl CartLine {
    fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            quantity,
            price: product.price.clone(),
            discount: product.discount.clone(),
            discounted_price: product.discounted_price(),
        }
    }

    fn refresh_snapshot(&mut self, product: &Product) {
        self.price = product.price.clone();
        self.discount = product.discount.clone();
        self.discounted_price = discounted_price(&self.price, &self.discount);
    }
}

impl PricedLine for CartLine {
    fn unit_price(&self) -> &BigDecimal {
        &self.price
    }

    fn discounted_unit_price(&self) -> &BigDecimal {
        &self.discounted_price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

#[derive(Debug, Clone)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Insertion ordered.
    pub lines: Vec<CartLine>,
    pub totals: Totals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            lines: Vec::new(),
            totals: Totals::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Adds `quantity` of `product`, or tops up the existing line and
    /// refreshes its snapshot.
    pub fn add_or_update_line(&mut self, product: &Product, quantity: i32) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::invalid("Quantity must be at least 1"));
        }

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| DomainError::invalid("Quantity too large"))?;
                line.refresh_snapshot(product);
            }
            None => {
                if self.lines.len() >= MAX_CART_LINES {
                    return Err(DomainError::CapacityExceeded(MAX_CART_LINES));
                }
                self.lines.push(CartLine::snapshot(product, quantity));
            }
        }

        self.recompute();
        Ok(())
    }

    /// Overwrites the quantity of an existing line; `quantity <= 0` removes it.
    pub fn set_line_quantity(&mut self, product_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        let index = self.position(product_id)?;
        if quantity <= 0 {
            self.lines.remove(index);
        } else if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        self.recompute();
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: Uuid) -> Result<(), DomainError> {
        let index = self.position(product_id)?;
        self.lines.remove(index);
        self.recompute();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.recompute();
    }

    fn position(&self, product_id: Uuid) -> Result<usize, DomainError> {
        self.lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or_else(|| DomainError::NotFound("Product not in cart".to_string()))
    }

    fn recompute(&mut self) {
        for line in &mut self.lines {
            line.discounted_price = discounted_price(&line.price, &line.discount);
        }
        self.totals = Totals::of(&self.lines);
        self.updated_at = Utc::now();
    }
}
