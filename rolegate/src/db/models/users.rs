//! Database models for users.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub name: String,
    pub email: Option<String>,
    /// Defaults to [`Role::User`] when not set
    pub role: Option<Role>,
}

/// Database request for a signup: the stored role is decided by the bootstrap policy at insert
/// time, from the requested role and whether the user table is empty.
#[derive(Debug, Clone)]
pub struct BootstrapCreateDBRequest {
    pub name: String,
    pub email: Option<String>,
    pub requested_role: Option<Role>,
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
