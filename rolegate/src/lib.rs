//! # rolegate: cookie sessions and role-based access control
//!
//! `rolegate` is a small HTTP service that demonstrates session authentication with a signed
//! cookie and a single-role authorization model. Users sign up with a name and an optional email,
//! log in by naming themselves, and receive a session cookie; an admin-only endpoint checks the
//! cookie and the user's role.
//!
//! ## Request Flow
//!
//! A request to a protected route first resolves its session. The session cookie carries the user
//! id and an HMAC signature (see [`auth::session`]); a cookie that fails verification is ignored, and
//! a verified id is looked up in the user store. Handlers that take a [`CurrentUser`] reject
//! requests without a resolvable session with `401`, and role checks in [`auth::permissions`]
//! turn a mismatched role into `403`.
//!
//! ## Bootstrap
//!
//! The first user to sign up into an empty store becomes an `ADMIN` unless it asks to be a `USER`.
//! Every later signup is a `USER`. The count and the insert happen atomically in the store, so
//! concurrent first signups produce exactly one admin.
//!
//! ## Storage
//!
//! Users live behind the [`db::store::UserStore`] trait. With an external PostgreSQL database
//! configured, migrations in `migrations/` run at startup and uniqueness of emails is enforced by
//! the `users_email_key` constraint. Without one, an in-memory store is used.
//!
//! ## Configuration
//!
//! See [`config`]: a YAML file, `ROLEGATE_`-prefixed environment variables and `DATABASE_URL`.
//!
//! [`CurrentUser`]: api::models::users::CurrentUser

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod telemetry;
#[cfg(test)]
mod test;
#[cfg(test)]
pub mod test_utils;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    http::{self, HeaderValue},
    routing::{get, post},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    config::{Config, CorsOrigin, DatabaseConfig, PoolSettings},
    db::store::{InMemoryUserStore, PostgresUserStore, UserStore},
    openapi::ApiDoc,
};

pub use types::UserId;

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .users(Arc::new(InMemoryUserStore::new()))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub config: Config,
}

/// Get the rolegate database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn connect_database(url: &str, pool: &PoolSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .acquire_timeout(pool.acquire_timeout)
        .connect(url)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Build the configured user store. Returns the pool too when the store is PostgreSQL, so it can be
/// closed on shutdown.
#[instrument(skip_all)]
async fn setup_user_store(config: &Config) -> anyhow::Result<(Arc<dyn UserStore>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::Memory => {
            info!("Using in-memory user store; users are lost on restart");
            let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
            Ok((store, None))
        }
        DatabaseConfig::External { url, pool } => {
            info!("Connecting to external database");
            let pool = connect_database(url, pool).await?;
            let store: Arc<dyn UserStore> = Arc::new(PostgresUserStore::new(pool.clone()));
            Ok((store, Some(pool)))
        }
    }
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config
        .allowed_origins
        .iter()
        .any(|origin| matches!(origin, CorsOrigin::Wildcard))
    {
        AllowOrigin::any()
    } else {
        let origins = cors_config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin {
                CorsOrigin::Wildcard => None,
                // Url serialises with a trailing slash, which browsers never send in Origin
                CorsOrigin::Url(url) => Some(url.as_str().trim_end_matches('/').parse::<HeaderValue>()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(cors_config.allow_credentials)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router: auth and admin routes, health check, API docs, CORS and tracing.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let api_routes = Router::new()
        .route("/auth/signup", post(api::handlers::auth::signup))
        .route("/auth/login", post(api::handlers::auth::login))
        .route("/auth/logout", post(api::handlers::auth::logout))
        .route("/auth/me", get(api::handlers::auth::me))
        .route("/admin", get(api::handlers::admin::get_admin))
        .with_state(state);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .merge(api_routes)
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!(bind = %config.bind_address(), database = config.database_kind(), "Starting rolegate");

        let (users, pool) = setup_user_store(&config).await?;
        let app_state = AppState::builder().users(users).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("rolegate listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
