//! Bearer token check -> `Principal` in request extensions.
//!
//! Handlers read it back with the `CurrentUser` extractor. Paths that mix public
//! and protected methods skip the layer; there the extractor runs the same check.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthError, AuthGate, Principal};
use crate::state::AppState;

/// Require authentication on every route of `router`.
///
/// `route_layer` keeps unmatched paths as 404 instead of 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = authenticate_headers(&state.gate, req.headers())?;

    // middleware -> extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Run the gate on the `Authorization` header, logging the internal reason on failure.
pub fn authenticate_headers(gate: &AuthGate, headers: &HeaderMap) -> Result<Principal, AppError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    gate.authenticate(raw).map_err(|err| {
        if let AuthError::Unauthenticated(reason) = &err {
            tracing::warn!(reason = reason.as_str(), "request rejected");
        }
        AppError::from(err)
    })
}
