use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::WishlistRepository;
use crate::schema::wishlist_items;

use super::models::NewWishlistItemRow;

pub struct DieselWishlistRepository {
    pool: DbPool,
}

impl DieselWishlistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WishlistRepository for DieselWishlistRepository {
    fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let inserted = diesel::insert_into(wishlist_items::table)
            .values(&NewWishlistItemRow {
                user_id,
                product_id,
                created_at: Utc::now(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;
        Ok(inserted > 0)
    }

    fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(wishlist_items::table.find((user_id, product_id)))
            .execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn product_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(wishlist_items::table
            .filter(wishlist_items::user_id.eq(user_id))
            .order(wishlist_items::created_at.asc())
            .select(wishlist_items::product_id)
            .load(&mut conn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::DieselWishlistRepository;
    use crate::domain::ports::WishlistRepository;
    use crate::infrastructure::testing::setup_db;
    use uuid::Uuid;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn add_is_idempotent_and_remove_reports_membership() {
        let (_container, pool) = setup_db().await;
        let repo = DieselWishlistRepository::new(pool);
        let user = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(repo.add(user, a).expect("add failed"));
        assert!(repo.add(user, b).expect("add failed"));
        assert!(!repo.add(user, a).expect("add failed"));
        assert_eq!(repo.product_ids(user).expect("list failed"), vec![a, b]);

        assert!(repo.remove(user, a).expect("remove failed"));
        assert!(!repo.remove(user, a).expect("remove failed"));
        assert_eq!(repo.product_ids(user).expect("list failed"), vec![b]);
    }
}
