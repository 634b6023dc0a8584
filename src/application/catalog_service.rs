use std::collections::HashMap;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::domain::product::{Product, ProductDraft, ProductPatch};

#[derive(Debug, Clone)]
pub struct CategoryCount {
    pub category_id: Uuid,
    pub name: String,
    pub count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>, categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub fn create_product(&self, owner_id: Uuid, draft: ProductDraft) -> Result<Product, DomainError> {
        self.require_active_category(draft.category_id)?;
        if self
            .products
            .find_by_owner_and_name(owner_id, draft.name.trim())?
            .is_some()
        {
            return Err(DomainError::Conflict("Product already created!".to_string()));
        }

        let product = Product::create(owner_id, draft)?;
        self.products.insert(&product)?;
        log::info!("product {} '{}' created by {}", product.id, product.name, owner_id);
        Ok(product)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.products
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Product"))
    }

    pub fn list_products(&self, owner_id: Option<Uuid>) -> Result<Vec<Product>, DomainError> {
        self.products.list(owner_id)
    }

    /// Owner-scoped partial update.
    pub fn update_product(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ProductPatch,
    ) -> Result<Product, DomainError> {
        let mut product = self.owned(id, owner_id)?;
        if let Some(category_id) = patch.category_id {
            self.require_active_category(category_id)?;
        }
        product.apply(patch)?;
        self.products.update(&product)?;
        Ok(product)
    }

    /// Adjusts price and/or discount. Existing cart lines keep their snapshot
    /// until they are touched again.
    pub fn reprice_product(
        &self,
        id: Uuid,
        price: Option<BigDecimal>,
        discount: Option<BigDecimal>,
    ) -> Result<Product, DomainError> {
        let mut product = self.get_product(id)?;
        product.reprice(price, discount)?;
        self.products.update(&product)?;
        log::info!(
            "product {} repriced to {} ({}% off)",
            product.id,
            product.price,
            product.discount
        );
        Ok(product)
    }

    pub fn delete_product(&self, id: Uuid, owner_id: Uuid) -> Result<(), DomainError> {
        self.owned(id, owner_id)?;
        if !self.products.delete(id)? {
            return Err(DomainError::not_found("Product"));
        }
        log::info!("product {id} deleted by {owner_id}");
        Ok(())
    }

    pub fn count_by_category(&self) -> Result<Vec<CategoryCount>, DomainError> {
        let counts: HashMap<Uuid, i64> = self.products.count_by_category()?.into_iter().collect();
        Ok(self
            .categories
            .list(true)?
            .into_iter()
            .map(|c| CategoryCount {
                count: counts.get(&c.id).copied().unwrap_or(0),
                category_id: c.id,
                name: c.name,
            })
            .collect())
    }

    pub fn create_category(&self, name: &str, description: Option<&str>) -> Result<Category, DomainError> {
        let category = Category::create(name, description)?;
        if self.categories.find_active_by_name(&category.name)?.is_some() {
            return Err(DomainError::Conflict("Category already exists!".to_string()));
        }
        self.categories.insert(&category)?;
        log::info!("category {} '{}' created", category.id, category.name);
        Ok(category)
    }

    pub fn list_categories(&self, include_deleted: bool) -> Result<Vec<Category>, DomainError> {
        self.categories.list(include_deleted)
    }

    pub fn delete_category(&self, id: Uuid) -> Result<Category, DomainError> {
        let mut category = self
            .categories
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("Category"))?;
        category.mark_deleted();
        self.categories.update(&category)?;
        Ok(category)
    }

    fn owned(&self, id: Uuid, owner_id: Uuid) -> Result<Product, DomainError> {
        self.products
            .find_by_id(id)?
            .filter(|p| p.owner_id == owner_id)
            .ok_or_else(|| DomainError::NotFound("Product not found or unauthorized!".to_string()))
    }

    fn require_active_category(&self, id: Uuid) -> Result<(), DomainError> {
        match self.categories.find_by_id(id)? {
            Some(c) if !c.deleted => Ok(()),
            _ => Err(DomainError::not_found("Category")),
        }
    }
}
