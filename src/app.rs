/*
 * Responsibility
 * - Load config, set up tracing and the panic hook
 * - Connect the pool, run migrations, build services into AppState
 * - Assemble the Router (routes + CORS + HTTP layers) and serve
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::{health, welcome};
use crate::config::Config;
use crate::middleware::{cors, http};
use crate::repos::user_repo::PgUserStore;
use crate::services::auth::{AuthGate, LoginService, PasswordHasher, TokenService};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,shop_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly; production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting shop API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!()
        .run(&db)
        .await
        .context("failed to run migrations")?;

    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret_key,
        config.jwt_algorithm,
    )?);
    let users = Arc::new(PgUserStore::new(db.clone()));
    let ttl = Duration::seconds(i64::try_from(config.access_token_ttl_seconds)?);
    let login = LoginService::new(users.clone(), tokens.clone(), PasswordHasher::new(), ttl)?;

    Ok(AppState::new(
        db,
        users,
        AuthGate::new(tokens),
        Arc::new(login),
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .merge(api::v1::routes(state.clone()))
        .with_state(state);

    let router = cors::apply(router, config);
    http::apply(router, config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
