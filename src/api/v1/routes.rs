/*
 * Responsibility
 * - URL layout of the shop API
 * - Collection roots answer with and without a trailing slash
 * - Groups that are protected on every method get the access middleware here;
 *   mixed public/protected paths rely on the CurrentUser extractor instead
 */
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{create_user, login_for_access_token, read_current_user},
    categories::{create_category, delete_category, list_categories, update_category},
    permissions::{deactivate_user, toggle_role},
    products::{
        create_product, delete_product, get_product, list_products, list_products_by_category,
        update_product,
    },
    reviews::{create_review, delete_review, list_product_reviews, list_reviews},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/read_current_user", get(read_current_user))
        .route("/permission", patch(toggle_role))
        .route("/permission/", patch(toggle_role))
        .route("/permission/delete", delete(deactivate_user));

    Router::new()
        .route("/auth", post(create_user))
        .route("/auth/", post(create_user))
        .route("/auth/token", post(login_for_access_token))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/", get(list_categories).post(create_category))
        .route(
            "/categories/{slug}",
            put(update_category).delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route("/products/detail/{product_slug}", get(get_product))
        .route(
            "/products/{slug}",
            get(list_products_by_category)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/review", get(list_reviews).post(create_review))
        .route("/review/", get(list_reviews).post(create_review))
        .route(
            "/review/{key}",
            get(list_product_reviews).delete(delete_review),
        )
        .merge(access::apply(protected, state))
}
