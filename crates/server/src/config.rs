//! Server configuration and shared application state.

use std::sync::Arc;

use sqlx::postgres::PgConnectOptions;

use crate::core::auth::TokenCodec;
use crate::follows::FollowManager;
use crate::posts::PostManager;
use crate::store::Store;
use crate::users::UserManager;

/// Connection settings for the split read/write Postgres roles.
#[derive(Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub read_user: String,
    pub read_password: String,
    pub write_user: String,
    pub write_password: String,
    /// Per-pool cap on concurrent connections.
    pub max_connections: u32,
    /// Create missing tables on startup.
    pub create_schema: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("PGPORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5432),
            database: std::env::var("PGDATABASE").unwrap_or_else(|_| "reunion".to_string()),
            read_user: std::env::var("POSTGRES_READ_USER")
                .unwrap_or_else(|_| "reunion_read".to_string()),
            read_password: std::env::var("POSTGRES_READ_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            write_user: std::env::var("POSTGRES_WRITE_USER")
                .unwrap_or_else(|_| "reunion_write".to_string()),
            write_password: std::env::var("POSTGRES_WRITE_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            max_connections: std::env::var("PG_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            create_schema: std::env::var("SKIP_SCHEMA_INIT").is_err(),
        }
    }
}

impl StoreConfig {
    /// Connection options for one of the two roles.
    pub fn connect_options(&self, user: &str, password: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(user)
            .password(password)
    }
}

/// Top-level server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    pub listen_port: u16,
    pub jwt_secret: String,
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(9000),
            // The fallback ships in the binary; set JWT_SECRET in any
            // real deployment.
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "REUNIONSECRET1234".to_string()),
            store: StoreConfig::default(),
        }
    }
}

/// App state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub tokens: Arc<TokenCodec>,
    pub users: Arc<UserManager>,
    pub posts: Arc<PostManager>,
    pub follows: Arc<FollowManager>,
}

impl AppState {
    pub fn new(config: &ServerConfig, store: Store) -> Self {
        let store = Arc::new(store);
        Self {
            tokens: Arc::new(TokenCodec::new(&config.jwt_secret)),
            users: Arc::new(UserManager::new(store.clone())),
            posts: Arc::new(PostManager::new(store.clone())),
            follows: Arc::new(FollowManager::new(store.clone())),
            store,
        }
    }
}
