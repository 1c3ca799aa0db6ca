//! Authentication and authorization.
//!
//! Users authenticate with a signed session cookie set by login. There are no passwords:
//! a login names the user by email or name, and the server answers with a cookie whose value is
//! the user id signed with the configured `secret_key`.
//!
//! # Authorization
//!
//! Each user holds exactly one role, `ADMIN` or `USER`. Protected routes require one role and
//! compare it by equality (see [`permissions`]). The first user to sign up becomes an admin unless
//! it asks otherwise (see [`bootstrap`]).
//!
//! # Modules
//!
//! - [`bootstrap`]: Role assignment for new signups
//! - [`current_user`]: Extractor for the authenticated user
//! - [`permissions`]: Role checks
//! - [`session`]: Session token signing and cookie formatting

pub mod bootstrap;
pub mod current_user;
pub mod permissions;
pub mod session;
