use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_lines, carts};

use super::models::{CartLineRow, CartRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn find_by_user(&self, user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        let mut conn = self.pool.get()?;

        let cart = carts::table
            .filter(carts::user_id.eq(user_id))
            .select(CartRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let lines = CartLineRow::belonging_to(&cart)
            .select(CartLineRow::as_select())
            .order(cart_lines::position.asc())
            .load(&mut conn)?;

        Ok(Some(cart.into_domain(lines)))
    }

    fn save(&self, cart: &Cart) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let row = CartRow::from_domain(cart);
        let lines = CartLineRow::from_domain(cart)?;

        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(carts::table)
                .values(&row)
                .on_conflict(carts::id)
                .do_update()
                .set((
                    carts::total_price.eq(&row.total_price),
                    carts::total_discount.eq(&row.total_discount),
                    carts::updated_at.eq(row.updated_at),
                ))
                .execute(conn)?;

            diesel::delete(cart_lines::table.filter(cart_lines::cart_id.eq(row.id))).execute(conn)?;
            if !lines.is_empty() {
                diesel::insert_into(cart_lines::table)
                    .values(&lines)
                    .execute(conn)?;
            }
            Ok(())
        })
    }

    fn list(&self) -> Result<Vec<Cart>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = carts::table
            .select(CartRow::as_select())
            .order(carts::created_at.asc())
            .load(&mut conn)?;
        let lines = CartLineRow::belonging_to(&rows)
            .select(CartLineRow::as_select())
            .order(cart_lines::position.asc())
            .load(&mut conn)?;

        Ok(lines
            .grouped_by(&rows)
            .into_iter()
            .zip(rows)
            .map(|(lines, cart)| cart.into_domain(lines))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::DieselCartRepository;
    use crate::domain::cart::Cart;
    use crate::domain::category::Category;
    use crate::domain::ports::{CartRepository, CategoryRepository, ProductRepository};
    use crate::domain::product::Product;
    use crate::infrastructure::category_repo::DieselCategoryRepository;
    use crate::infrastructure::product_repo::DieselProductRepository;
    use crate::infrastructure::testing::setup_db;
    use crate::test_utils::product_draft;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn save_replaces_lines_and_keeps_their_order() {
        let (_container, pool) = setup_db().await;
        let categories = DieselCategoryRepository::new(pool.clone());
        let products = DieselProductRepository::new(pool.clone());
        let repo = DieselCartRepository::new(pool);

        let category = Category::create("Pendants", None).expect("valid category");
        categories.insert(&category).expect("insert category");
        let owner = Uuid::new_v4();
        let first = Product::create(owner, product_draft(category.id, "Locket", "1000", "10"))
            .expect("valid product");
        let second = Product::create(owner, product_draft(category.id, "Charm", "250", "0"))
            .expect("valid product");
        products.insert(&first).expect("insert product");
        products.insert(&second).expect("insert product");

        let user = Uuid::new_v4();
        let mut cart = Cart::new(user);
        cart.add_or_update_line(&first, 2).expect("add");
        cart.add_or_update_line(&second, 1).expect("add");
        repo.save(&cart).expect("save failed");

        cart.remove_line(first.id).expect("remove");
        repo.save(&cart).expect("second save failed");

        let found = repo
            .find_by_user(user)
            .expect("find failed")
            .expect("cart should exist");
        assert_eq!(found.id, cart.id);
        assert_eq!(found.lines.len(), 1);
        assert_eq!(found.lines[0].product_id, second.id);
        assert_eq!(found.totals, cart.totals);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn list_groups_lines_per_cart() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCartRepository::new(pool);

        repo.save(&Cart::new(Uuid::new_v4())).expect("save failed");
        repo.save(&Cart::new(Uuid::new_v4())).expect("save failed");

        let carts = repo.list().expect("list failed");
        assert_eq!(carts.len(), 2);
        assert!(carts.iter().all(Cart::is_empty));
    }
}
