/*
 * Responsibility
 * - /review handlers
 * - Customers write reviews as themselves; only admins remove them
 * - Product rating upkeep happens in review_repo, inside the write transaction
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::reviews::{CreateReviewRequest, ReviewResponse},
        extractors::CurrentUser,
        handlers::products::active_product,
    },
    error::AppError,
    repos::{product_repo, review_repo},
    services::auth::{Role, require},
    state::AppState,
};

pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let rows = review_repo::list_visible(&state.db).await?;

    Ok(Json(rows.into_iter().map(ReviewResponse::from).collect()))
}

pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_slug): Path<String>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    let product = active_product(product_repo::get_by_slug(&state.db, &product_slug).await?)?;

    let rows = review_repo::list_for_product(&state.db, product.id).await?;

    Ok(Json(rows.into_iter().map(ReviewResponse::from).collect()))
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    require(&principal, &[Role::Customer])?;
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION_ERROR", msg))?;

    active_product(product_repo::get_by_id(&state.db, req.product_id).await?)?;

    let comment = req
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let row = review_repo::create(
        &state.db,
        principal.id,
        req.product_id,
        comment,
        req.rate_grade,
    )
    .await?;
    tracing::info!(review_id = row.id, product_id = row.product_id, "review created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(review_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require(&principal, &[Role::Admin])?;

    if review_repo::deactivate(&state.db, review_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("review"))
    }
}
