//! Database layer for data persistence and access.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │  Arc<dyn UserStore>
//!        ↓
//! ┌─────────────┐        ┌──────────────┐
//! │    Store    │ ─────→ │ Repositories │  (db::handlers, PostgreSQL only)
//! └──────┬──────┘        └──────┬───────┘
//!        │ in memory            ↓
//!        ↓               ┌─────────────┐
//!   Vec<User>            │  PostgreSQL │
//!                        └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: The [`store::UserStore`] seam and its PostgreSQL and in-memory implementations
//! - [`handlers`]: Repository implementations over a PostgreSQL connection
//! - [`models`]: Database record structures
//! - [`errors`]: Database-specific error types
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded with `sqlx::migrate!`. They run on startup
//! when an external database is configured.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
