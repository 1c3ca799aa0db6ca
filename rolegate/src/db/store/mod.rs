//! The user store behind the HTTP handlers.
//!
//! Handlers hold an `Arc<dyn UserStore>` so the same router runs against PostgreSQL in production
//! and against process memory in development and tests.
//!
//! Implementations must enforce two things:
//! - at most one user per non-null email, reported as [`DbError::UniqueViolation`]
//! - [`UserStore::create_bootstrapped`] counts and inserts atomically, so only one concurrent
//!   signup can observe an empty store
//!
//! [`DbError::UniqueViolation`]: crate::db::errors::DbError::UniqueViolation

use crate::{
    db::{
        errors::Result,
        models::users::{BootstrapCreateDBRequest, UserCreateDBRequest, UserDBResponse},
    },
    types::UserId,
};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user with an explicit role (defaulting to `USER`)
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    /// Insert a signup, with the role decided by the bootstrap policy under the store's lock
    async fn create_bootstrapped(&self, request: &BootstrapCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Exact email match when `email` is given, otherwise the earliest-created user with `name`
    async fn get_by_email_or_name(&self, email: Option<&str>, name: Option<&str>) -> Result<Option<UserDBResponse>>;

    async fn count(&self) -> Result<i64>;
}
