//! PostgreSQL-backed user store.

use sqlx::PgPool;

use crate::{
    db::{
        errors::Result,
        handlers::{Repository, Users},
        models::users::{BootstrapCreateDBRequest, UserCreateDBRequest, UserDBResponse},
    },
    types::UserId,
};

use super::UserStore;

/// Runs each operation on a pooled connection through the [`Users`] repository.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create(request).await
    }

    async fn create_bootstrapped(&self, request: &BootstrapCreateDBRequest) -> Result<UserDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).create_bootstrapped(request).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_id(id).await
    }

    async fn get_by_email_or_name(&self, email: Option<&str>, name: Option<&str>) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_by_email_or_name(email, name).await
    }

    async fn count(&self) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;

    #[sqlx::test]
    #[test_log::test]
    async fn test_store_round_trip(pool: PgPool) {
        let store = PostgresUserStore::new(pool);
        assert_eq!(store.count().await.unwrap(), 0);

        let admin = store
            .create_bootstrapped(&BootstrapCreateDBRequest {
                name: "admin".to_string(),
                email: Some("admin@example.com".to_string()),
                requested_role: None,
            })
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);

        let found = store
            .get_by_email_or_name(Some("admin@example.com"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
