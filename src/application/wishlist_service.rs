use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{ProductRepository, WishlistRepository};
use crate::domain::product::ProductSummary;

#[derive(Clone)]
pub struct WishlistService {
    wishlists: Arc<dyn WishlistRepository>,
    products: Arc<dyn ProductRepository>,
}

impl WishlistService {
    pub fn new(wishlists: Arc<dyn WishlistRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self {
            wishlists,
            products,
        }
    }

    pub fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<ProductSummary>, DomainError> {
        if self.products.find_by_id(product_id)?.is_none() {
            return Err(DomainError::not_found("Product"));
        }
        if !self.wishlists.add(user_id, product_id)? {
            return Err(DomainError::Conflict("Product already in wishlist".to_string()));
        }
        self.get(user_id)
    }

    /// Removing a product that is not listed is a no-op; a user without any
    /// wishlist entries gets `NotFound`.
    pub fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<Vec<ProductSummary>, DomainError> {
        if self.wishlists.product_ids(user_id)?.is_empty() {
            return Err(DomainError::not_found("Wishlist"));
        }
        self.wishlists.remove(user_id, product_id)?;
        self.get(user_id)
    }

    /// Products deleted from the catalog drop out of the result.
    pub fn get(&self, user_id: Uuid) -> Result<Vec<ProductSummary>, DomainError> {
        let ids = self.wishlists.product_ids(user_id)?;
        self.products.summaries(&ids)
    }
}
