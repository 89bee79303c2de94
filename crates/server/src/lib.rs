//! Reunion social-network API server.
//!
//! Users authenticate against seeded accounts, then follow/unfollow each
//! other, publish and delete posts, like/unlike, and comment. Identity
//! travels as a stateless signed token; reads and writes go through two
//! separately-credentialed Postgres pools.

pub mod config;
pub mod core;
pub mod follows;
pub mod handlers;
pub mod models;
pub mod posts;
pub mod store;
pub mod users;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{AppState, ServerConfig};
use crate::core::auth::middleware::mw_require_auth;
use crate::store::Store;

/// Build the full application router for the given state.
///
/// Public surface: authentication and the single-post lookup. Everything
/// else under /api sits behind the auth gate.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/authenticate", post(handlers::authenticate))
        .route("/api/posts/{id}", get(handlers::get_post))
        .route("/health", get(health_check));

    let protected = Router::new()
        .route("/api/follow/{id}", post(handlers::follow))
        .route("/api/unfollow/{id}", post(handlers::unfollow))
        .route("/api/user", get(handlers::get_profile))
        .route("/api/posts", post(handlers::create_post))
        .route("/api/posts/", post(handlers::create_post))
        .route("/api/posts/{id}", delete(handlers::delete_post))
        .route("/api/like/{id}", post(handlers::like))
        .route("/api/unlike/{id}", post(handlers::unlike))
        .route("/api/comment/{id}", post(handlers::comment))
        .route("/api/all_posts", get(handlers::list_all_posts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    public
        .merge(protected)
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== Reunion Server ===");

    let config = ServerConfig::default();

    let store = Store::connect(&config.store).await?;
    if config.store.create_schema {
        store.init_schema().await?;
    }

    let state = AppState::new(&config, store);
    let app = app(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "Listening to requests on http://localhost:{}",
        config.listen_port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The listener has drained; release both pools before exit.
    state.store.close().await;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK - Reunion Server"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
