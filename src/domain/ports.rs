use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::Cart;
use super::category::Category;
use super::errors::DomainError;
use super::order::{Order, OrderStatus};
use super::product::{Product, ProductSummary};
use super::user::User;

pub trait ProductRepository: Send + Sync + 'static {
    fn insert(&self, product: &Product) -> Result<(), DomainError>;
    fn update(&self, product: &Product) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError>;
    fn find_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> Result<Option<Product>, DomainError>;
    /// All products, or only those of `owner_id`.
    fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Product>, DomainError>;
    /// Returns `false` when nothing was deleted.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    /// Summaries with category names, in the order of `ids`; unknown ids are skipped.
    fn summaries(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError>;
    fn count_by_category(&self) -> Result<Vec<(Uuid, i64)>, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
}

pub trait CategoryRepository: Send + Sync + 'static {
    fn insert(&self, category: &Category) -> Result<(), DomainError>;
    fn update(&self, category: &Category) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError>;
    fn find_active_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;
    fn list(&self, include_deleted: bool) -> Result<Vec<Category>, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError>;
    /// Upserts the cart and replaces its lines.
    fn save(&self, cart: &Cart) -> Result<(), DomainError>;
    fn list(&self) -> Result<Vec<Cart>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn insert(&self, order: &Order) -> Result<(), DomainError>;
    /// Persists the mutable fields (status, payment, address).
    fn update(&self, order: &Order) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Newest first. `None` lists every user's orders.
    fn list(&self, user_id: Option<Uuid>, limit: Option<i64>) -> Result<Vec<Order>, DomainError>;
    /// Cancels in one conditional write; `None` when the order is missing,
    /// not owned by `user_id`, or no longer cancellable.
    fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Option<Order>, DomainError>;
    fn count(&self, status: Option<OrderStatus>) -> Result<i64, DomainError>;
    fn revenue(&self, status: OrderStatus) -> Result<BigDecimal, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn insert(&self, user: &User) -> Result<(), DomainError>;
    fn update(&self, user: &User) -> Result<(), DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;
    fn list(&self) -> Result<Vec<User>, DomainError>;
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    fn count(&self) -> Result<i64, DomainError>;
}

pub trait WishlistRepository: Send + Sync + 'static {
    /// `false` when the product was already present.
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError>;
    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError>;
    /// Insertion ordered.
    fn product_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError>;
}
