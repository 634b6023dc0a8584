use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLine};
use crate::domain::pricing::Totals;
use crate::domain::product::Product;
use crate::domain::user::User;
use crate::schema::{cart_lines, carts, categories, order_lines, orders, products, users, wishlist_items};

// ── JSON column helpers ──────────────────────────────────────────────────────

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}

pub(crate) fn from_json<T: DeserializeOwned>(value: Value) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}

/// Enum columns are written by this service only; an unknown value means the
/// row was tampered with.
fn parse_column<T>(raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|e: DomainError| DomainError::Internal(format!("corrupt enum column: {e}")))
}

fn position(index: usize) -> Result<i32, DomainError> {
    i32::try_from(index).map_err(|e| DomainError::Internal(e.to_string()))
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub address: Option<Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Result<Self, DomainError> {
        Ok(Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role.as_str().to_string(),
            address: user.address.as_ref().map(to_json).transpose()?,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    pub fn into_domain(self) -> Result<User, DomainError> {
        Ok(User {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            role: parse_column(&self.role)?,
            address: self.address.map(from_json).transpose()?,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            description: c.description.clone(),
            is_deleted: c.deleted,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub quantity: i32,
    pub status: String,
    pub average_rating: BigDecimal,
    pub num_reviews: i32,
    pub images: Value,
    pub material: String,
    pub purity: Option<String>,
    pub weight: Option<BigDecimal>,
    pub stone_details: Value,
    pub size: Option<String>,
    pub gender: String,
    pub occasion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRow {
    pub fn from_domain(p: &Product) -> Result<Self, DomainError> {
        Ok(Self {
            id: p.id,
            owner_id: p.owner_id,
            category_id: p.category_id,
            name: p.name.clone(),
            description: p.description.clone(),
            overview: p.overview.clone(),
            price: p.price.clone(),
            discount: p.discount.clone(),
            quantity: p.quantity,
            status: p.status.as_str().to_string(),
            average_rating: p.average_rating.clone(),
            num_reviews: p.num_reviews,
            images: to_json(&p.images)?,
            material: p.material.as_str().to_string(),
            purity: p.purity.clone(),
            weight: p.weight.clone(),
            stone_details: to_json(&p.stone_details)?,
            size: p.size.clone(),
            gender: p.gender.as_str().to_string(),
            occasion: p.occasion.clone(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
    }

    pub fn into_domain(self) -> Result<Product, DomainError> {
        Ok(Product {
            id: self.id,
            owner_id: self.owner_id,
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            overview: self.overview,
            price: self.price,
            discount: self.discount,
            quantity: self.quantity,
            status: parse_column(&self.status)?,
            average_rating: self.average_rating,
            num_reviews: self.num_reviews,
            images: from_json(self.images)?,
            material: parse_column(&self.material)?,
            purity: self.purity,
            weight: self.weight,
            stone_details: from_json(self.stone_details)?,
            size: self.size,
            gender: parse_column(&self.gender)?,
            occasion: self.occasion,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ── Carts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_price: BigDecimal,
    pub total_discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, Associations)]
#[diesel(table_name = cart_lines)]
#[diesel(belongs_to(CartRow, foreign_key = cart_id))]
#[diesel(primary_key(cart_id, position))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub cart_id: Uuid,
    pub position: i32,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
    pub discount: BigDecimal,
    pub discounted_price: BigDecimal,
}

impl CartRow {
    pub fn from_domain(cart: &Cart) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            total_price: cart.totals.total_price.clone(),
            total_discount: cart.totals.total_discount.clone(),
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        }
    }

    pub fn into_domain(self, lines: Vec<CartLineRow>) -> Cart {
        Cart {
            id: self.id,
            user_id: self.user_id,
            lines: lines
                .into_iter()
                .map(|l| CartLine {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price,
                    discount: l.discount,
                    discounted_price: l.discounted_price,
                })
                .collect(),
            totals: Totals {
                total_price: self.total_price,
                total_discount: self.total_discount,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl CartLineRow {
    pub fn from_domain(cart: &Cart) -> Result<Vec<Self>, DomainError> {
        cart.lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                Ok(Self {
                    cart_id: cart.id,
                    position: position(i)?,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price.clone(),
                    discount: l.discount.clone(),
                    discounted_price: l.discounted_price.clone(),
                })
            })
            .collect()
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub address: Value,
    pub total_price: BigDecimal,
    pub total_discount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields an order may change after creation.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
pub struct OrderChangeset {
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub address: Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(primary_key(order_id, position))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub order_id: Uuid,
    pub position: i32,
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

impl OrderRow {
    pub fn from_domain(order: &Order) -> Result<Self, DomainError> {
        Ok(Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            address: to_json(&order.address)?,
            total_price: order.total_price.clone(),
            total_discount: order.total_discount.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        })
    }

    pub fn into_domain(self, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            lines: lines
                .into_iter()
                .map(|l| OrderLine {
                    product_id: l.product_id,
                    name: l.name,
                    material: l.material,
                    purity: l.purity,
                    weight: l.weight,
                    size: l.size,
                    price: l.price,
                    discount: l.discount,
                    quantity: l.quantity,
                    discounted_price: l.discounted_price,
                })
                .collect(),
            total_price: self.total_price,
            total_discount: self.total_discount,
            status: parse_column(&self.status)?,
            payment_status: parse_column(&self.payment_status)?,
            payment_method: parse_column(&self.payment_method)?,
            address: from_json(self.address)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrderChangeset {
    pub fn from_domain(order: &Order) -> Result<Self, DomainError> {
        Ok(Self {
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            address: to_json(&order.address)?,
            updated_at: order.updated_at,
        })
    }
}

impl OrderLineRow {
    pub fn from_domain(order: &Order) -> Result<Vec<Self>, DomainError> {
        order
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                Ok(Self {
                    order_id: order.id,
                    position: position(i)?,
                    product_id: l.product_id,
                    name: l.name.clone(),
                    material: l.material.clone(),
                    purity: l.purity.clone(),
                    weight: l.weight.clone(),
                    size: l.size.clone(),
                    price: l.price.clone(),
                    discount: l.discount.clone(),
                    quantity: l.quantity,
                    discounted_price: l.discounted_price.clone(),
                })
            })
            .collect()
    }
}

// ── Wishlist ─────────────────────────────────────────────────────────────────

#[derive(Debug, Insertable)]
#[diesel(table_name = wishlist_items)]
pub struct NewWishlistItemRow {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;

    use super::*;

    fn cart_row() -> CartRow {
        let now = Utc::now();
        CartRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            total_price: BigDecimal::from(0),
            total_discount: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        }
    }

    fn order_row() -> OrderRow {
        let now = Utc::now();
        OrderRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: "pending".to_string(),
            payment_status: "pending".to_string(),
            payment_method: "COD".to_string(),
            address: Value::Null,
            total_price: BigDecimal::from(0),
            total_discount: BigDecimal::from(0),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn cart_lines_load_by_parent_key() {
        let cart = cart_row();
        let query = CartLineRow::belonging_to(&cart)
            .select(CartLineRow::as_select())
            .order(cart_lines::position.asc());
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains(r#""cart_lines"."cart_id" = $1"#), "{sql}");

        let rows = vec![cart_row(), cart_row()];
        let sql = debug_query::<Pg, _>(&CartLineRow::belonging_to(&rows)).to_string();
        assert!(sql.contains(r#""cart_lines"."cart_id" = ANY($1)"#), "{sql}");
    }

    #[test]
    fn order_lines_load_by_parent_key() {
        let order = order_row();
        let sql = debug_query::<Pg, _>(&OrderLineRow::belonging_to(&order)).to_string();
        assert!(sql.contains(r#""order_lines"."order_id" = $1"#), "{sql}");

        let rows = vec![order_row()];
        let sql = debug_query::<Pg, _>(&OrderLineRow::belonging_to(&rows)).to_string();
        assert!(sql.contains(r#""order_lines"."order_id" = ANY($1)"#), "{sql}");
    }
}
