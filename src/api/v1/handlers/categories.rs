/*
 * Responsibility
 * - /categories handlers
 * - Reads are public; mutations are admin-only
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::categories::{CategoryRequest, CategoryResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    repos::category_repo,
    services::{
        auth::{Role, require},
        slug::slugify,
    },
    state::AppState,
};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = category_repo::list_active(&state.db).await?;

    Ok(Json(rows.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    require(&principal, &[Role::Admin])?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    ensure_parent_exists(&state, req.parent_id).await?;

    let name = req.name.trim();
    let row = category_repo::create(&state.db, name, &slugify(name), req.parent_id).await?;
    tracing::info!(category_id = row.id, "category created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    require(&principal, &[Role::Admin])?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    let category = category_repo::get_by_slug(&state.db, &slug)
        .await?
        .filter(|c| c.is_active)
        .ok_or(AppError::not_found("category"))?;
    reject_self_parent(category.id, req.parent_id)?;
    ensure_parent_exists(&state, req.parent_id).await?;

    let name = req.name.trim();
    let row = category_repo::update(&state.db, &slug, name, &slugify(name), req.parent_id)
        .await?
        .ok_or(AppError::not_found("category"))?;

    Ok(Json(row.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    require(&principal, &[Role::Admin])?;

    if category_repo::deactivate(&state.db, &slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("category"))
    }
}

fn reject_self_parent(category_id: i64, parent_id: Option<i64>) -> Result<(), AppError> {
    if parent_id == Some(category_id) {
        return Err(AppError::bad_request(
            "VALIDATION_ERROR",
            "a category cannot be its own parent",
        ));
    }
    Ok(())
}

async fn ensure_parent_exists(state: &AppState, parent_id: Option<i64>) -> Result<(), AppError> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };

    match category_repo::get_by_id(&state.db, parent_id).await? {
        Some(parent) if parent.is_active => Ok(()),
        _ => Err(AppError::not_found("parent category")),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::reject_self_parent;
    use crate::api::v1::routes;
    use crate::state::testing::{bearer, principal, state_with_users};

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

    #[test]
    fn category_cannot_parent_itself() {
        let err = reject_self_parent(4, Some(4)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        assert!(reject_self_parent(4, Some(1)).is_ok());
        assert!(reject_self_parent(4, None).is_ok());
    }

    #[tokio::test]
    async fn mutations_need_a_token() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);

        for (method, uri) in [
            ("POST", "/categories/"),
            ("PUT", "/categories/kitchen"),
            ("DELETE", "/categories/kitchen"),
        ] {
            let res = app
                .clone()
                .oneshot(request(method, uri, None, r#"{"name":"Kitchen"}"#))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn non_admins_are_forbidden() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let supplier = bearer(&principal(2, false, true, false));
        let customer = bearer(&principal(3, false, false, true));

        for auth in [supplier, customer] {
            let res = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/categories",
                    Some(auth.clone()),
                    r#"{"name":"Kitchen"}"#,
                ))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::FORBIDDEN);

            let res = app
                .clone()
                .oneshot(request("DELETE", "/categories/kitchen", Some(auth), ""))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
        }
    }

    #[tokio::test]
    async fn names_without_a_slug_are_rejected_for_admins() {
        let (state, _) = state_with_users(vec![]);
        let app = routes(state.clone()).with_state(state);
        let admin = bearer(&principal(1, true, false, false));

        for (method, uri, body) in [
            ("POST", "/categories", r#"{"name":"   "}"#),
            ("POST", "/categories/", r#"{"name":"!!!"}"#),
            ("PUT", "/categories/kitchen", r#"{"name":"***"}"#),
        ] {
            let res = app
                .clone()
                .oneshot(request(method, uri, Some(admin.clone()), body))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{method} {body}");

            let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
    }
}
