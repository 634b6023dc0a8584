pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use state::AppState;

use handlers::{cart, categories, orders, products, stats, users, wishlist};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("applied {} pending migrations", applied.len());
    Ok(())
}

/// Registers extractor configs, every route and the Swagger UI.
///
/// Literal segments are registered before the `{id}` routes sharing their
/// prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        .app_data(handlers::path_config())
        .app_data(handlers::query_config())
        .route("/", web::get().to(handlers::health))
        .service(
            web::scope("/api")
                // products
                .route("/product/get", web::get().to(products::list_products))
                .route("/product/count", web::get().to(products::count_products))
                .route("/product/post", web::post().to(products::create_product))
                .service(
                    web::resource("/product/update/{id}")
                        .route(web::put().to(products::update_product))
                        .route(web::patch().to(products::reprice_product)),
                )
                .service(
                    web::resource("/product/{id}")
                        .route(web::get().to(products::get_product))
                        .route(web::delete().to(products::delete_product)),
                )
                // categories
                .route("/category/get", web::get().to(categories::list_categories))
                .route("/category/post", web::post().to(categories::create_category))
                .route("/category/{id}", web::delete().to(categories::delete_category))
                // cart
                .route("/cart/post", web::post().to(cart::add_to_cart))
                .route("/cart/get", web::get().to(cart::get_cart))
                .route("/cart/update", web::patch().to(cart::update_cart_line))
                .route("/cart/delete/{productId}", web::delete().to(cart::remove_cart_line))
                // orders
                .route("/order/post", web::post().to(orders::create_order))
                .route("/order/get", web::get().to(orders::list_orders))
                .route("/order/update/{id}", web::put().to(orders::update_order))
                .route("/order/cancel/{id}", web::put().to(orders::cancel_order))
                .route("/order/{id}", web::get().to(orders::get_order))
                // users
                .route("/user/register", web::post().to(users::register))
                .route("/user/profile", web::get().to(users::profile))
                // wishlist
                .route("/wishlist/add", web::post().to(wishlist::add_to_wishlist))
                .route(
                    "/wishlist/remove/{productId}",
                    web::delete().to(wishlist::remove_from_wishlist),
                )
                .route("/wishlist/get", web::get().to(wishlist::get_wishlist))
                // admin
                .route("/stats", web::get().to(stats::dashboard))
                .route("/admin/products", web::get().to(products::list_own_products))
                .route("/admin/carts", web::get().to(cart::list_carts))
                .route("/admin/orders", web::get().to(orders::list_all_orders))
                .route("/admin/user/register", web::post().to(users::admin_register))
                .route("/admin/users", web::get().to(users::list_users))
                .route("/admin/users/{id}/status", web::put().to(users::set_status))
                .route("/admin/users/{id}/role", web::put().to(users::set_role))
                .service(
                    web::resource("/admin/users/{id}")
                        .route(web::get().to(users::get_user))
                        .route(web::delete().to(users::delete_user)),
                ),
        )
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
