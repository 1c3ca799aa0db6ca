//! Repository implementations for database access.
//!
//! Repositories wrap a SQLx connection or transaction and return domain models from
//! [`crate::db::models`]. They implement the [`Repository`] trait.
//!
//! # Common Pattern
//!
//! ```ignore
//! use rolegate::db::handlers::{Users, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Users::new(&mut conn);
//!
//!     let user = repo.get_by_email("user@example.com").await?;
//!     Ok(())
//! }
//! ```

pub mod repository;
pub mod users;

pub use repository::Repository;
pub use users::Users;
