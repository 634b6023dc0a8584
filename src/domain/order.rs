//! Order aggregate: a frozen copy of a cart at checkout plus a mutable
//! status/payment lifecycle.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cart::Cart;
use super::errors::DomainError;
use super::pricing::{discounted_price, with_tax, PricedLine, Totals};
use super::product::{string_enum, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

string_enum!(OrderStatus, "status", {
    Pending => "pending",
    Processing => "processing",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
    Returned => "returned",
});

impl OrderStatus {
    /// Statuses from which the owner may still cancel.
    pub const CANCELLABLE: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Processing];

    pub fn is_cancellable(self) -> bool {
        Self::CANCELLABLE.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

string_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cod,
    Upi,
    Card,
    NetBanking,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cod,
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::NetBanking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Card",
            PaymentMethod::NetBanking => "NetBanking",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; stored and rendered in canonical spelling.
impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::invalid(format!("Invalid payment method '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl Address {
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("fullName", &self.full_name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];
        match fields.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((name, _)) => Err(DomainError::invalid(format!("Address {name} is required"))),
            None => Ok(()),
        }
    }
}

/// A cart line frozen together with descriptive product data.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub name: String,
    pub material: Option<String>,
    pub purity: Option<String>,
    pub weight: Option<BigDecimal>,
    pub size: Option<String>,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub quantity: i32,
    pub discounted_price: BigDecimal,
}

impl PricedLine for OrderLine {
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
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lines: Vec<OrderLine>,
    /// Σ(discounted price × quantity).
    pub total_price: BigDecimal,
    /// Σ((price − discounted price) × quantity).
    pub total_discount: BigDecimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied by back-office tooling. No transition rules are
/// enforced here; only `cancel` checks the current status.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub address: Option<Address>,
}

impl OrderUpdate {
    /// Parses the raw strings, ignoring empty ones.
    pub fn parse(
        status: Option<&str>,
        payment_status: Option<&str>,
        payment_method: Option<&str>,
        address: Option<Address>,
    ) -> Result<Self, DomainError> {
        fn field<T: FromStr<Err = DomainError>>(raw: Option<&str>) -> Result<Option<T>, DomainError> {
            raw.filter(|s| !s.is_empty()).map(str::parse).transpose()
        }

        if let Some(address) = &address {
            address.validate()?;
        }
        Ok(Self {
            status: field(status)?,
            payment_status: field(payment_status)?,
            payment_method: field(payment_method)?,
            address,
        })
    }
}

impl Order {
    /// Freezes `cart` into a new pending order. `products` must hold the
    /// catalog entries referenced by the cart for the descriptive fields.
    pub fn from_cart(
        cart: &Cart,
        products: &HashMap<Uuid, Product>,
        address: Address,
        payment_method: PaymentMethod,
    ) -> Result<Self, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        address.validate()?;

        let lines = cart
            .lines
            .iter()
            .map(|line| {
                let product = products
                    .get(&line.product_id)
                    .ok_or_else(|| DomainError::not_found("Product"))?;
                Ok(OrderLine {
                    product_id: line.product_id,
                    name: product.name.clone(),
                    material: Some(product.material.to_string()),
                    purity: product.purity.clone(),
                    weight: product.weight.clone(),
                    size: product.size.clone(),
                    price: line.price.clone(),
                    discount: line.discount.clone(),
                    quantity: line.quantity,
                    discounted_price: line.discounted_price.clone(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let now = Utc::now();
        let mut order = Self {
            id: Uuid::new_v4(),
            user_id: cart.user_id,
            lines,
            total_price: BigDecimal::from(0),
            total_discount: BigDecimal::from(0),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method,
            address,
            created_at: now,
            updated_at: now,
        };
        order.recompute_totals();
        Ok(order)
    }

    fn recompute_totals(&mut self) {
        for line in &mut self.lines {
            line.discounted_price = discounted_price(&line.price, &line.discount);
        }
        let totals = Totals::of(&self.lines);
        self.total_price = totals.final_price();
        self.total_discount = totals.total_discount;
    }

    /// `total_price` is already net of discount; only tax is added.
    pub fn grand_total(&self) -> BigDecimal {
        with_tax(&self.total_price)
    }

    pub fn apply(&mut self, update: OrderUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(payment_status) = update.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        self.updated_at = Utc::now();
    }

    /// Owner cancellation. Payment is marked refunded whether or not it was
    /// ever collected.
    ///
    /// `DieselOrderRepository::cancel` applies the same owner and status
    /// precondition as a conditional UPDATE; keep the two in step.
    pub fn cancel(&mut self, user_id: Uuid) -> Result<(), DomainError> {
        if self.user_id != user_id || !self.status.is_cancellable() {
            return Err(DomainError::NotCancellable);
        }
        self.status = OrderStatus::Cancelled;
        self.payment_status = PaymentStatus::Refunded;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::product::tests::{dec, draft};

    pub(crate) fn address() -> Address {
        Address {
            full_name: "Asha Rao".to_string(),
            phone: "9000000000".to_string(),
            street: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: "411001".to_string(),
        }
    }

    fn cart_with(products: &[(&Product, i32)]) -> Cart {
        let mut cart = Cart::new(Uuid::new_v4());
        for (p, qty) in products {
            cart.add_or_update_line(p, *qty).expect("add");
        }
        cart
    }

    fn catalog(products: &[&Product]) -> HashMap<Uuid, Product> {
        products.iter().map(|p| (p.id, (*p).clone())).collect()
    }

    #[test]
    fn freezes_every_cart_line() {
        let a = Product::create(Uuid::new_v4(), draft("Ring", "1000", "10")).expect("a");
        let b = Product::create(Uuid::new_v4(), draft("Chain", "250", "0")).expect("b");
        let cart = cart_with(&[(&a, 2), (&b, 1)]);

        let order = Order::from_cart(&cart, &catalog(&[&a, &b]), address(), PaymentMethod::Upi)
            .expect("order");

        assert_eq!(order.lines.len(), cart.lines.len());
        for (frozen, line) in order.lines.iter().zip(&cart.lines) {
            assert_eq!(frozen.product_id, line.product_id);
            assert_eq!(frozen.discounted_price, line.discounted_price);
            assert_eq!(frozen.quantity, line.quantity);
        }
        assert_eq!(order.lines[0].name, "Ring");
        assert_eq!(order.lines[0].material.as_deref(), Some("Gold"));
        assert_eq!(order.total_price, dec("2050"));
        assert_eq!(order.total_discount, dec("200"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.user_id, cart.user_id);
    }

    #[test]
    fn uses_cart_snapshot_not_live_price() {
        let mut p = Product::create(Uuid::new_v4(), draft("Ring", "100", "0")).expect("p");
        let cart = cart_with(&[(&p, 1)]);
        p.reprice(Some(dec("999")), None).expect("reprice");

        let order =
            Order::from_cart(&cart, &catalog(&[&p]), address(), PaymentMethod::Cod).expect("order");
        assert_eq!(order.lines[0].price, dec("100"));
        assert_eq!(order.total_price, dec("100"));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let cart = Cart::new(Uuid::new_v4());
        assert!(matches!(
            Order::from_cart(&cart, &HashMap::new(), address(), PaymentMethod::Cod),
            Err(DomainError::EmptyCart)
        ));
    }

    #[test]
    fn incomplete_address_is_rejected() {
        let p = Product::create(Uuid::new_v4(), draft("Ring", "1", "0")).expect("p");
        let cart = cart_with(&[(&p, 1)]);
        let mut addr = address();
        addr.city = " ".to_string();
        assert!(matches!(
            Order::from_cart(&cart, &catalog(&[&p]), addr, PaymentMethod::Cod),
            Err(DomainError::InvalidInput(_))
        ));
    }

    fn order_in(status: OrderStatus) -> Order {
        let p = Product::create(Uuid::new_v4(), draft("Ring", "1", "0")).expect("p");
        let cart = cart_with(&[(&p, 1)]);
        let mut order =
            Order::from_cart(&cart, &catalog(&[&p]), address(), PaymentMethod::Cod).expect("order");
        order.status = status;
        order
    }

    #[test]
    fn owner_can_cancel_pending_or_processing() {
        for status in OrderStatus::CANCELLABLE {
            let mut order = order_in(status);
            let owner = order.user_id;
            order.cancel(owner).expect("cancellable");
            assert_eq!(order.status, OrderStatus::Cancelled);
            assert_eq!(order.payment_status, PaymentStatus::Refunded);
        }
    }

    #[test]
    fn cancel_rejects_other_users_and_late_statuses() {
        let mut order = order_in(OrderStatus::Pending);
        assert!(matches!(
            order.cancel(Uuid::new_v4()),
            Err(DomainError::NotCancellable)
        ));

        for status in [
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
        ] {
            let mut order = order_in(status);
            let owner = order.user_id;
            assert!(order.cancel(owner).is_err(), "{status} must not cancel");
            assert_eq!(order.status, status);
        }
    }

    #[test]
    fn update_parses_and_applies_only_supplied_fields() {
        let mut order = order_in(OrderStatus::Pending);
        let update = OrderUpdate::parse(Some("shipped"), None, Some("card"), None).expect("valid");
        order.apply(update);

        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert_eq!(order.address, address());
    }

    #[test]
    fn update_allows_arbitrary_transitions() {
        let mut order = order_in(OrderStatus::Delivered);
        order.apply(OrderUpdate::parse(Some("pending"), None, None, None).expect("valid"));
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn update_rejects_unknown_enum_values() {
        assert!(OrderUpdate::parse(Some("lost"), None, None, None).is_err());
        assert!(OrderUpdate::parse(None, Some("maybe"), None, None).is_err());
        assert!(OrderUpdate::parse(None, None, Some("cheque"), None).is_err());
        assert!(OrderUpdate::parse(Some(""), None, None, None).is_ok());
    }
}
