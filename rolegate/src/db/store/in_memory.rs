//! In-memory user store.
//!
//! Users are kept in insertion order behind an async lock. It's suitable for development and
//! tests; users are lost on restart.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{
    api::models::users::Role,
    auth::bootstrap::{SystemState, assign_role},
    db::{
        errors::{DbError, Result},
        models::users::{BootstrapCreateDBRequest, UserCreateDBRequest, UserDBResponse},
    },
    types::UserId,
};

use super::UserStore;

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<UserDBResponse>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Append a user, enforcing the same email uniqueness as the `users_email_key` constraint
fn insert(users: &mut Vec<UserDBResponse>, name: &str, email: Option<&str>, role: Role) -> Result<UserDBResponse> {
    if let Some(email) = email
        && users.iter().any(|u| u.email.as_deref() == Some(email))
    {
        return Err(DbError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
            table: Some("users".to_string()),
            message: format!("duplicate key value violates unique constraint \"users_email_key\" ({email})"),
        });
    }

    let user = UserDBResponse {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.map(str::to_string),
        role,
        created_at: Utc::now(),
    };
    users.push(user.clone());
    Ok(user)
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut users = self.users.write().await;
        insert(
            &mut users,
            &request.name,
            request.email.as_deref(),
            request.role.unwrap_or(Role::User),
        )
    }

    async fn create_bootstrapped(&self, request: &BootstrapCreateDBRequest) -> Result<UserDBResponse> {
        // The write guard is held across the count and the insert
        let mut users = self.users.write().await;
        let state = SystemState::from_user_count(users.len() as i64);
        let role = assign_role(state, request.requested_role);
        debug!(?state, %role, "Assigned signup role");

        insert(&mut users, &request.name, request.email.as_deref(), role)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email_or_name(&self, email: Option<&str>, name: Option<&str>) -> Result<Option<UserDBResponse>> {
        let users = self.users.read().await;
        let found = match (email, name) {
            (Some(email), _) => users.iter().find(|u| u.email.as_deref() == Some(email)),
            // Insertion order is creation order, so the first match is the earliest
            (None, Some(name)) => users.iter().find(|u| u.name == name),
            (None, None) => None,
        };
        Ok(found.cloned())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}
