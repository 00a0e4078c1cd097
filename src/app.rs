/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (PgPool, TokenVerifier, IdentityLookup) → Router 組み立て
 * - Middleware の適用 (bearer gate / CORS / request-id / trace)
 * - axum::serve() で起動 (ConnectInfo で接続元アドレスを AuthCtx に渡す)
 */
use std::{net::SocketAddr, panic, process};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware;
use crate::services::auth::{build_identity_lookup, build_token_verifier};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,hotel_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
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
        config = ?config,
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Pool connects lazily; identity lookups surface connection failures per request.
    let db = PgPoolOptions::new()
        .acquire_timeout(config.identity_lookup_timeout)
        .connect_lazy(&config.database_url)
        .context("invalid DATABASE_URL")?;

    Ok(AppState::new(
        build_token_verifier(config),
        build_identity_lookup(config, db),
        config.lookup_failure_policy,
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(state.clone()))
        .fallback(|| async { AppError::not_found("route") })
        .with_state(state);

    let router = middleware::cors::apply(
        router,
        config.app_env,
        &config.cors_allowed_origins,
    );
    middleware::http::apply(
        router,
        config.request_body_limit_bytes,
        config.request_timeout,
    )
}
