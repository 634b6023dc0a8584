pub mod cart_service;
pub mod catalog_service;
pub mod order_service;
pub mod stats_service;
pub mod user_service;
pub mod wishlist_service;
