//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - **Authentication** (`/auth/*`): Signup, login, logout and the current session
//! - **Admin** (`/admin`): Requires the `ADMIN` role
//!
//! All endpoints are documented with `utoipa`. The rendered reference is served at `/docs`.

pub mod handlers;
pub mod models;
