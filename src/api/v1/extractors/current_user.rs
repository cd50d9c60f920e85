/*
 * Responsibility
 * - Hand the authenticated Principal to a handler
 * - Reuses the principal the access middleware stored; otherwise runs the
 *   same bearer check itself (routes mixing public and protected methods)
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::access::authenticate_headers;
use crate::services::auth::Principal;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(CurrentUser(principal.clone()));
        }

        let principal = authenticate_headers(&state.gate, &parts.headers)?;
        parts.extensions.insert(principal.clone());

        Ok(CurrentUser(principal))
    }
}
