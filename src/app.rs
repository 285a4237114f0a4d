/*
 * Responsibility
 * - tracing + panic hook
 * - Config loading -> dependency wiring -> Router assembly
 * - Middleware (id token auth, HTTP layers)
 * - axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::v1::handlers::health::health;
use crate::error::AppError;
use crate::{api, config::Config, middleware, services::auth::build_identity_resolver, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,id_token_gateway=debug,tower_http=debug cargo run
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
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

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
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = AppState::new(build_identity_resolver(&config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Full router: `/health` open, `/api/v1/*` behind ID token authentication.
pub fn build_router(state: AppState) -> Router {
    let v1 = middleware::auth::id_token::apply(api::v1::routes(), state.clone());

    let router = Router::new()
        .route("/health", axum::routing::get(health))
        .nest("/api/v1", v1)
        .fallback(|| async { AppError::NotFound { resource: "route" } })
        .with_state(state);

    middleware::http::apply(router)
}
