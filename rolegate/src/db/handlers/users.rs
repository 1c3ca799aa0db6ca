//! Database repository for users.

use crate::types::{UserId, abbrev_uuid};
use crate::{
    api::models::users::Role,
    auth::bootstrap::{SystemState, assign_role},
    db::{
        errors::Result,
        handlers::repository::Repository,
        models::users::{BootstrapCreateDBRequest, UserCreateDBRequest, UserDBResponse},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, PgConnection};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Advisory lock key serialising bootstrap signups ("rolegate" in ASCII)
const BOOTSTRAP_LOCK_KEY: i64 = 0x726f_6c65_6761_7465;

const USER_COLUMNS: &str = "id, name, email, role, created_at";

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDBResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

async fn insert_user(
    conn: &mut PgConnection,
    name: &str,
    email: Option<&str>,
    role: Role,
) -> Result<UserDBResponse> {
    // Always generate a new ID for users
    let user_id = Uuid::new_v4();

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, name, email, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(role)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user.into())
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        insert_user(
            &mut *self.db,
            &request.name,
            request.email.as_deref(),
            request.role.unwrap_or(Role::User),
        )
        .await
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user.map(Into::into))
    }
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user.map(Into::into))
    }

    /// Names are not unique; the earliest-created user with the name wins, then the lowest id.
    #[instrument(skip(self), err)]
    pub async fn get_first_by_name(&mut self, name: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = $1 ORDER BY created_at ASC, id ASC LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user.map(Into::into))
    }

    /// Email wins when supplied; otherwise fall back to the name.
    pub async fn get_by_email_or_name(&mut self, email: Option<&str>, name: Option<&str>) -> Result<Option<UserDBResponse>> {
        match (email, name) {
            (Some(email), _) => self.get_by_email(email).await,
            (None, Some(name)) => self.get_first_by_name(name).await,
            (None, None) => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.db)
            .await?;
        Ok(count)
    }

    /// Insert a signup, deciding its role from the current user count.
    ///
    /// The count and the insert run in one transaction holding a transaction-scoped advisory lock,
    /// so concurrent signups into an empty table are serialised and only the first one sees
    /// [`SystemState::Empty`].
    #[instrument(skip(self, request), fields(name = %request.name), err)]
    pub async fn create_bootstrapped(&mut self, request: &BootstrapCreateDBRequest) -> Result<UserDBResponse> {
        let mut tx = self.db.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOTSTRAP_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        let state = SystemState::from_user_count(count);
        let role = assign_role(state, request.requested_role);
        debug!(?state, %role, "Assigned signup role");

        let user = insert_user(&mut *tx, &request.name, request.email.as_deref(), role).await?;

        tx.commit().await?;
        Ok(user)
    }
}
