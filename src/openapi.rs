use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Jewellery storefront backend"),
    paths(
        handlers::health,
        handlers::products::list_products,
        handlers::products::list_own_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::reprice_product,
        handlers::products::delete_product,
        handlers::products::count_products,
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::delete_category,
        handlers::cart::add_to_cart,
        handlers::cart::get_cart,
        handlers::cart::update_cart_line,
        handlers::cart::remove_cart_line,
        handlers::cart::list_carts,
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_order,
        handlers::orders::cancel_order,
        handlers::orders::list_all_orders,
        handlers::users::register,
        handlers::users::admin_register,
        handlers::users::profile,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::set_status,
        handlers::users::set_role,
        handlers::users::delete_user,
        handlers::wishlist::add_to_wishlist,
        handlers::wishlist::remove_from_wishlist,
        handlers::wishlist::get_wishlist,
        handlers::stats::dashboard,
    ),
    components(schemas(
        handlers::products::StoneDetailDto,
        handlers::products::CreateProductRequest,
        handlers::products::UpdateProductRequest,
        handlers::products::RepriceRequest,
        handlers::products::ProductResponse,
        handlers::products::CategoryRefResponse,
        handlers::products::ProductSummaryResponse,
        handlers::products::CategoryCountResponse,
        handlers::products::CategoryCountsResponse,
        handlers::categories::CreateCategoryRequest,
        handlers::categories::CategoryResponse,
        handlers::cart::CartLineRequest,
        handlers::cart::CartLineResponse,
        handlers::cart::CartResponse,
        handlers::orders::AddressDto,
        handlers::orders::PlaceOrderRequest,
        handlers::orders::UpdateOrderRequest,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderResponse,
        handlers::users::RegisterRequest,
        handlers::users::StatusRequest,
        handlers::users::RoleRequest,
        handlers::users::UserResponse,
        handlers::wishlist::WishlistRequest,
        handlers::stats::StatusCountsResponse,
        handlers::stats::DashboardResponse,
    )),
    tags(
        (name = "health"),
        (name = "products", description = "Catalog entries"),
        (name = "categories"),
        (name = "cart", description = "Per-user shopping cart"),
        (name = "orders"),
        (name = "users", description = "Account records"),
        (name = "wishlist"),
        (name = "stats", description = "Admin dashboard"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_under_api_prefix() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/product/count"));
        assert!(paths.contains_key("/api/order/cancel/{id}"));
        assert!(paths.contains_key("/api/stats"));
        assert!(paths.keys().all(|p| p == "/" || p.starts_with("/api/")));
    }
}
