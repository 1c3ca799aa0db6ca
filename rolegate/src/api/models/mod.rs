//! API request and response data models.
//!
//! These structures define the public JSON contract. API models are distinct from database
//! models, and all of them carry `utoipa` annotations for the generated OpenAPI document.
//!
//! - [`users`]: Roles and the public user shape
//! - [`auth`]: Signup, login and logout payloads
//! - [`admin`]: The admin endpoint body

pub mod admin;
pub mod auth;
pub mod users;
