/*
 * Responsibility
 * - /products handlers
 * - Reads are public; writes need admin or supplier, and updates/deletes by
 *   a supplier only touch that supplier's own products
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::products::{ProductRequest, ProductResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    repos::{
        category_repo::{self, CategoryRow},
        product_repo::{self, ProductFields, ProductRow},
    },
    services::{
        auth::{Principal, Role, authorize_or_owner, require},
        slug::slugify,
    },
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = product_repo::list_available(&state.db).await?;

    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

/// Available products of a category and its direct subcategories.
///
/// A soft-deleted category is treated as absent, and so are its products
/// when it appears as a subcategory.
pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_slug): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let category = category_repo::get_by_slug(&state.db, &category_slug)
        .await?
        .filter(|c| c.is_active)
        .ok_or(AppError::not_found("category"))?;

    let children = category_repo::children(&state.db, category.id).await?;
    let ids = listing_category_ids(&category, &children);

    let rows = product_repo::list_available_in(&state.db, &ids).await?;

    Ok(Json(rows.into_iter().map(ProductResponse::from).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_slug): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get_available_by_slug(&state.db, &product_slug)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    require(&principal, &[Role::Admin, Role::Supplier])?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    ensure_category_exists(&state, req.category).await?;

    let name = req.name.trim();
    let slug = slugify(name);
    let row = product_repo::create(&state.db, &fields(&req, name, &slug), principal.id).await?;
    tracing::info!(product_id = row.id, supplier_id = principal.id, "product created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    require(&principal, &[Role::Admin, Role::Supplier])?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let product = find_owned_product(&state, &principal, &slug).await?;
    ensure_category_exists(&state, req.category).await?;

    let name = req.name.trim();
    let new_slug = slugify(name);
    let row = product_repo::update(&state.db, product.id, &fields(&req, name, &new_slug))
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    require(&principal, &[Role::Admin, Role::Supplier])?;

    let product = find_owned_product(&state, &principal, &slug).await?;

    if product_repo::deactivate(&state.db, product.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}

fn listing_category_ids(category: &CategoryRow, children: &[CategoryRow]) -> Vec<i64> {
    std::iter::once(category.id)
        .chain(children.iter().filter(|c| c.is_active).map(|c| c.id))
        .collect()
}

fn fields<'a>(req: &'a ProductRequest, name: &'a str, slug: &'a str) -> ProductFields<'a> {
    ProductFields {
        name,
        slug,
        description: &req.description,
        price: req.price,
        image_url: &req.image_url,
        stock: req.stock,
        category_id: req.category,
    }
}

/// 404 when the product is missing, then 403 unless admin or owning supplier.
async fn find_owned_product(
    state: &AppState,
    principal: &Principal,
    slug: &str,
) -> Result<ProductRow, AppError> {
    let product = active_product(product_repo::get_by_slug(&state.db, slug).await?)?;

    if !authorize_or_owner(principal, &[Role::Admin], |p| owns(p, &product)) {
        return Err(AppError::Forbidden("you are not authorized to use this method"));
    }

    Ok(product)
}

/// Soft-deleted products are 404 to every caller.
pub(crate) fn active_product(row: Option<ProductRow>) -> Result<ProductRow, AppError> {
    row.filter(|p| p.is_active)
        .ok_or(AppError::not_found("product"))
}

fn owns(principal: &Principal, product: &ProductRow) -> bool {
    principal.is_supplier && product.supplier_id == Some(principal.id)
}

async fn ensure_category_exists(state: &AppState, category_id: i64) -> Result<(), AppError> {
    match category_repo::get_by_id(&state.db, category_id).await? {
        Some(category) if category.is_active => Ok(()),
        _ => Err(AppError::not_found("category")),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::routes;
    use crate::state::testing::{bearer, principal, state_with_users};

    const BODY: &str = r#"{
        "name": "Kettle",
        "description": "1.7l",
        "price": 2500,
        "image_url": "https://img.example/kettle.png",
        "stock": 3,
        "category": 1
    }"#;

    fn request(method: &str, uri: &str, auth: Option<String>, body: &str) -> Request<Body> {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            req = req.header(header::AUTHORIZATION, auth);
        }
        req.body(Body::from(body.to_string())).unwrap()
    }

    fn product(supplier_id: Option<i64>) -> ProductRow {
        ProductRow {
            id: 10,
            name: "Kettle".into(),
            slug: "kettle".into(),
            description: "1.7l".into(),
            price: 2500,
            image_url: String::new(),
            stock: 3,
            rating: 0.0,
            category_id: 1,
            supplier_id,
            is_active: true,
        }
    }

    fn category(id: i64, is_active: bool, parent_id: Option<i64>) -> CategoryRow {
        CategoryRow {
            id,
            name: format!("c{id}"),
            slug: format!("c{id}"),
            is_active,
            parent_id,
        }
    }

    #[test]
    fn soft_deleted_product_is_not_found() {
        let mut deleted = product(Some(5));
        deleted.is_active = false;

        let err = active_product(Some(deleted)).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            active_product(None).unwrap_err().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(active_product(Some(product(Some(5)))).unwrap().id, 10);
    }

    #[test]
    fn listing_skips_inactive_subcategories() {
        let parent = category(1, true, None);
        let children = [
            category(2, true, Some(1)),
            category(3, false, Some(1)),
            category(4, true, Some(1)),
        ];

        assert_eq!(listing_category_ids(&parent, &children), vec![1, 2, 4]);
        assert_eq!(listing_category_ids(&parent, &[]), vec![1]);
    }

    #[test]
    fn only_the_supplying_supplier_owns_a_product() {
        let supplier = principal(5, false, true, false);
        let other_supplier = principal(6, false, true, false);
        let customer = principal(5, false, false, true);

        assert!(owns(&supplier, &product(Some(5))));
        assert!(!owns(&other_supplier, &product(Some(5))));
        assert!(!owns(&customer, &product(Some(5))));
        assert!(!owns(&supplier, &product(None)));
    }

    #[tokio::test]
    async fn writes_need_a_token() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);

        for (method, uri) in [
            ("POST", "/products"),
            ("PUT", "/products/kettle"),
            ("DELETE", "/products/kettle"),
        ] {
            let res = app
                .clone()
                .oneshot(request(method, uri, None, BODY))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn customers_cannot_write_products() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let customer = bearer(&principal(3, false, false, true));

        for (method, uri) in [
            ("POST", "/products/"),
            ("PUT", "/products/kettle"),
            ("DELETE", "/products/kettle"),
        ] {
            let res = app
                .clone()
                .oneshot(request(method, uri, Some(customer.clone()), BODY))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn punctuation_only_name_is_400() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let supplier = bearer(&principal(2, false, true, false));
        let body = BODY.replace("\"Kettle\"", "\"!!!\"");

        let res = app
            .oneshot(request("POST", "/products", Some(supplier), &body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn negative_price_is_rejected_before_storage() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let supplier = bearer(&principal(2, false, true, false));
        let body = BODY.replace("2500", "-1");

        let res = app
            .oneshot(request("POST", "/products", Some(supplier), &body))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
