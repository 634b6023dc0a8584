//! In-memory repositories for service and HTTP tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{
    CartRepository, CategoryRepository, OrderRepository, ProductRepository, UserRepository,
    WishlistRepository,
};
use crate::domain::product::{
    CategoryRef, Gender, Material, Product, ProductDraft, ProductStatus, ProductSummary,
};
use crate::domain::user::User;
use crate::state::{AppState, Repositories};

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    categories: Vec<Category>,
    carts: Vec<Cart>,
    orders: Vec<Order>,
    users: Vec<User>,
    wishlists: HashMap<Uuid, Vec<Uuid>>,
}

/// Implements every repository port over one mutex-guarded set of tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DomainError> {
        self.tables
            .lock()
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

fn replace<T>(rows: &mut [T], row: &T, same: impl Fn(&T) -> bool) -> Result<(), DomainError>
where
    T: Clone,
{
    match rows.iter_mut().find(|r| same(r)) {
        Some(slot) => {
            *slot = row.clone();
            Ok(())
        }
        None => Err(DomainError::Internal("row vanished during update".to_string())),
    }
}

impl ProductRepository for MemoryStore {
    fn insert(&self, product: &Product) -> Result<(), DomainError> {
        self.tables()?.products.push(product.clone());
        Ok(())
    }

    fn update(&self, product: &Product) -> Result<(), DomainError> {
        replace(&mut self.tables()?.products, product, |p| p.id == product.id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.tables()?.products.iter().find(|p| p.id == id).cloned())
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .tables()?
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn find_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> Result<Option<Product>, DomainError> {
        Ok(self
            .tables()?
            .products
            .iter()
            .find(|p| p.owner_id == owner_id && p.name == name)
            .cloned())
    }

    fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .tables()?
            .products
            .iter()
            .filter(|p| owner_id.map_or(true, |o| p.owner_id == o))
            .cloned()
            .collect())
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables()?;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok(tables.products.len() != before)
    }

    fn summaries(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError> {
        let tables = self.tables()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.iter().find(|p| p.id == *id))
            .map(|p| {
                let category = tables
                    .categories
                    .iter()
                    .find(|c| c.id == p.category_id)
                    .map(|c| CategoryRef {
                        id: c.id,
                        name: c.name.clone(),
                    });
                p.summary(category)
            })
            .collect())
    }

    fn count_by_category(&self) -> Result<Vec<(Uuid, i64)>, DomainError> {
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for p in &self.tables()?.products {
            *counts.entry(p.category_id).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(self.tables()?.products.len() as i64)
    }
}

impl CategoryRepository for MemoryStore {
    fn insert(&self, category: &Category) -> Result<(), DomainError> {
        self.tables()?.categories.push(category.clone());
        Ok(())
    }

    fn update(&self, category: &Category) -> Result<(), DomainError> {
        replace(&mut self.tables()?.categories, category, |c| c.id == category.id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.tables()?.categories.iter().find(|c| c.id == id).cloned())
    }

    fn find_active_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .tables()?
            .categories
            .iter()
            .find(|c| !c.deleted && c.name == name)
            .cloned())
    }

    fn list(&self, include_deleted: bool) -> Result<Vec<Category>, DomainError> {
        Ok(self
            .tables()?
            .categories
            .iter()
            .filter(|c| include_deleted || !c.deleted)
            .cloned()
            .collect())
    }
}

impl CartRepository for MemoryStore {
    fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        Ok(self.tables()?.carts.iter().find(|c| c.user_id == user_id).cloned())
    }

    fn save(&self, cart: &Cart) -> Result<(), DomainError> {
        let mut tables = self.tables()?;
        match tables.carts.iter_mut().find(|c| c.id == cart.id) {
            Some(slot) => *slot = cart.clone(),
            None => tables.carts.push(cart.clone()),
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Cart>, DomainError> {
        Ok(self.tables()?.carts.clone())
    }
}

impl OrderRepository for MemoryStore {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        self.tables()?.orders.push(order.clone());
        Ok(())
    }

    fn update(&self, order: &Order) -> Result<(), DomainError> {
        replace(&mut self.tables()?.orders, order, |o| o.id == order.id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.tables()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, user_id: Option<Uuid>, limit: Option<i64>) -> Result<Vec<Order>, DomainError> {
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        Ok(self
            .tables()?
            .orders
            .iter()
            .rev()
            .filter(|o| user_id.map_or(true, |u| o.user_id == u))
            .take(limit)
            .cloned()
            .collect())
    }

    fn cancel(&self, id: Uuid, user_id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut tables = self.tables()?;
        let Some(order) = tables.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        match order.cancel(user_id) {
            Ok(()) => Ok(Some(order.clone())),
            Err(_) => Ok(None),
        }
    }

    fn count(&self, status: Option<OrderStatus>) -> Result<i64, DomainError> {
        Ok(self
            .tables()?
            .orders
            .iter()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .count() as i64)
    }

    fn revenue(&self, status: OrderStatus) -> Result<BigDecimal, DomainError> {
        Ok(self
            .tables()?
            .orders
            .iter()
            .filter(|o| o.status == status)
            .fold(BigDecimal::from(0), |acc, o| acc + &o.total_price))
    }
}

impl UserRepository for MemoryStore {
    fn insert(&self, user: &User) -> Result<(), DomainError> {
        self.tables()?.users.push(user.clone());
        Ok(())
    }

    fn update(&self, user: &User) -> Result<(), DomainError> {
        replace(&mut self.tables()?.users, user, |u| u.id == user.id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.tables()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.tables()?.users.iter().find(|u| u.email == email).cloned())
    }

    fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError> {
        Ok(self.tables()?.users.iter().find(|u| u.phone == phone).cloned())
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.tables()?.users.clone())
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() != before)
    }

    fn count(&self) -> Result<i64, DomainError> {
        Ok(self.tables()?.users.len() as i64)
    }
}

impl WishlistRepository for MemoryStore {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables()?;
        let ids = tables.wishlists.entry(user_id).or_default();
        if ids.contains(&product_id) {
            return Ok(false);
        }
        ids.push(product_id);
        Ok(true)
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables()?;
        let Some(ids) = tables.wishlists.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = ids.len();
        ids.retain(|id| *id != product_id);
        Ok(ids.len() != before)
    }

    fn product_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        Ok(self
            .tables()?
            .wishlists
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Application state wired to one shared in-memory store.
pub fn memory_state() -> (Arc<MemoryStore>, AppState) {
    let store = MemoryStore::shared();
    let state = AppState::new(Repositories {
        products: store.clone(),
        categories: store.clone(),
        carts: store.clone(),
        orders: store.clone(),
        users: store.clone(),
        wishlists: store.clone(),
    });
    (store, state)
}

/// Gold, in stock, quantity 5.
pub fn product_draft(category_id: Uuid, name: &str, price: &str, discount: &str) -> ProductDraft {
    ProductDraft {
        category_id,
        name: name.to_string(),
        description: None,
        overview: None,
        price: BigDecimal::from_str(price).expect("valid price"),
        discount: BigDecimal::from_str(discount).expect("valid discount"),
        quantity: 5,
        status: ProductStatus::InStock,
        images: vec![format!("/uploads/{}.png", name.to_lowercase())],
        material: Material::Gold,
        purity: Some("22K".to_string()),
        weight: None,
        stone_details: vec![],
        size: Some("M".to_string()),
        gender: Gender::Unisex,
        occasion: None,
    }
}

/// Inserts a product under a fresh category.
pub fn seed_product(store: &MemoryStore, name: &str, price: &str, discount: &str) -> Product {
    let category = Category::create("Jewellery", None).expect("valid category");
    CategoryRepository::insert(store, &category).expect("insert category");
    let product = Product::create(Uuid::new_v4(), product_draft(category.id, name, price, discount))
        .expect("valid product");
    ProductRepository::insert(store, &product).expect("insert product");
    product
}
