use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{CategoryRef, Product, ProductSummary};
use crate::schema::{categories, products};

use super::models::ProductRow;

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, DomainError> {
    rows.into_iter().map(ProductRow::into_domain).collect()
}

impl ProductRepository for DieselProductRepository {
    fn insert(&self, product: &Product) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(products::table)
            .values(&ProductRow::from_domain(product)?)
            .execute(&mut conn)?;
        Ok(())
    }

    fn update(&self, product: &Product) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::update(products::table.find(product.id))
            .set(&ProductRow::from_domain(product)?)
            .execute(&mut conn)?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(ProductRow::into_domain)
            .transpose()
    }

    fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)?;
        into_products(rows)
    }

    fn find_by_owner_and_name(&self, owner_id: Uuid, name: &str) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        products::table
            .filter(products::owner_id.eq(owner_id))
            .filter(products::name.eq(name))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(ProductRow::into_domain)
            .transpose()
    }

    fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(products::owner_id.eq(owner_id));
        }
        into_products(query.load(&mut conn)?)
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn summaries(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows: Vec<(ProductRow, Option<(Uuid, String)>)> = products::table
            .left_join(categories::table)
            .filter(products::id.eq_any(ids))
            .select((
                ProductRow::as_select(),
                (categories::id, categories::name).nullable(),
            ))
            .load(&mut conn)?;

        let mut by_id = HashMap::with_capacity(rows.len());
        for (row, category) in rows {
            let category = category.map(|(id, name)| CategoryRef { id, name });
            let product = row.into_domain()?;
            by_id.insert(product.id, product.summary(category));
        }
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    fn count_by_category(&self) -> Result<Vec<(Uuid, i64)>, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(products::table
            .group_by(products::category_id)
            .select((products::category_id, count_star()))
            .load(&mut conn)?)
    }

    fn count(&self) -> Result<i64, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(products::table.count().get_result(&mut conn)?)
    }
}
