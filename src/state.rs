/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone is cheap: the pool and services are Arc/handle types
 * - No per-request mutable state lives here
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::repos::user_repo::UserStore;
use crate::services::auth::{AuthGate, LoginService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub users: Arc<dyn UserStore>,
    pub gate: AuthGate,
    pub login: Arc<LoginService>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        users: Arc<dyn UserStore>,
        gate: AuthGate,
        login: Arc<LoginService>,
    ) -> Self {
        Self {
            db,
            users,
            gate,
            login,
        }
    }
}
