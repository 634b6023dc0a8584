use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::ports::CategoryRepository;
use crate::schema::categories;

use super::models::CategoryRow;

pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CategoryRepository for DieselCategoryRepository {
    fn insert(&self, category: &Category) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(categories::table)
            .values(&CategoryRow::from(category))
            .execute(&mut conn)?;
        Ok(())
    }

    fn update(&self, category: &Category) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::update(categories::table.find(category.id))
            .set(&CategoryRow::from(category))
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Category::from))
    }

    fn find_active_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(categories::table
            .filter(categories::name.eq(name))
            .filter(categories::is_deleted.eq(false))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Category::from))
    }

    fn list(&self, include_deleted: bool) -> Result<Vec<Category>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = categories::table
            .select(CategoryRow::as_select())
            .order(categories::created_at.asc())
            .into_boxed();
        if !include_deleted {
            query = query.filter(categories::is_deleted.eq(false));
        }
        let rows: Vec<CategoryRow> = query.load(&mut conn)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }
}
