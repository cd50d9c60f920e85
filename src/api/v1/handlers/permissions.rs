/*
 * Responsibility
 * - /permission handlers (admin only; the router also puts these behind
 *   the access middleware)
 * - Role switching and account deactivation go through UserStore
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::permissions::{UserIdQuery, UserRolesResponse},
        extractors::CurrentUser,
    },
    error::AppError,
    services::auth::{Role, require},
    state::AppState,
};

/// Switch a user between supplier and customer.
pub async fn toggle_role(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<UserRolesResponse>, AppError> {
    require(&principal, &[Role::Admin])?;

    let mut user = state
        .users
        .find_user_by_id(query.user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    let is_supplier = !user.is_supplier;
    let is_customer = !is_supplier;
    if !state
        .users
        .set_roles(user.id, is_supplier, is_customer)
        .await?
    {
        return Err(AppError::not_found("user"));
    }
    tracing::info!(
        user_id = user.id,
        admin_id = principal.id,
        is_supplier,
        "user role switched"
    );

    user.is_supplier = is_supplier;
    user.is_customer = is_customer;
    Ok(Json(user.into()))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Query(query): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    require(&principal, &[Role::Admin])?;

    let user = state
        .users
        .find_user_by_id(query.user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    if user.is_admin {
        return Err(AppError::Forbidden("admin accounts cannot be deactivated"));
    }

    if !state.users.set_active(user.id, false).await? {
        return Err(AppError::not_found("user"));
    }
    tracing::info!(user_id = user.id, admin_id = principal.id, "user deactivated");

    Ok(StatusCode::NO_CONTENT)
}
