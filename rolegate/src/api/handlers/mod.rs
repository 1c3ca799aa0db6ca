//! HTTP request handlers.
//!
//! - [`auth`]: Signup, login, logout and the current session
//! - [`admin`]: The admin-only resource

pub mod admin;
pub mod auth;
