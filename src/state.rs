use std::sync::Arc;

use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::application::stats_service::StatsService;
use crate::application::user_service::UserService;
use crate::application::wishlist_service::WishlistService;
use crate::db::DbPool;
use crate::domain::ports::{
    CartRepository, CategoryRepository, OrderRepository, ProductRepository, UserRepository,
    WishlistRepository,
};
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::category_repo::DieselCategoryRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::product_repo::DieselProductRepository;
use crate::infrastructure::user_repo::DieselUserRepository;
use crate::infrastructure::wishlist_repo::DieselWishlistRepository;

/// Shared by every worker; services are cheap to clone into `web::block`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub carts: CartService,
    pub orders: OrderService,
    pub users: UserService,
    pub wishlists: WishlistService,
    pub stats: StatsService,
}

/// One handle per repository port.
pub struct Repositories {
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
    pub wishlists: Arc<dyn WishlistRepository>,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        Self {
            catalog: CatalogService::new(repos.products.clone(), repos.categories),
            carts: CartService::new(repos.carts.clone(), repos.products.clone()),
            orders: OrderService::new(repos.orders.clone(), repos.carts, repos.products.clone()),
            users: UserService::new(repos.users.clone()),
            wishlists: WishlistService::new(repos.wishlists, repos.products.clone()),
            stats: StatsService::new(repos.users, repos.orders, repos.products),
        }
    }

    pub fn postgres(pool: DbPool) -> Self {
        Self::new(Repositories {
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
            carts: Arc::new(DieselCartRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            wishlists: Arc::new(DieselWishlistRepository::new(pool)),
        })
    }
}
