//! App User Repository Implementation
//!
//! Account-level lookups against the `app_user` base table, roles
//! included. Used by the auth service regardless of account subtype.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{AppUser, AppUserRepository, Role};
use crate::shared::error::AppError;

use super::fetch_roles;

/// Database row matching the `app_user` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AppUserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppUserRow {
    /// Convert database row to the domain account with the given roles.
    pub(crate) fn into_app_user(self, roles: Vec<Role>) -> AppUser {
        AppUser {
            id: self.id,
            username: self.username,
            password_hash: self.password,
            enabled: self.enabled,
            email: self.email,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL account repository implementation.
#[derive(Clone)]
pub struct PgAppUserRepository {
    pool: PgPool,
}

impl PgAppUserRepository {
    /// Create a new PgAppUserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: Option<AppUserRow>) -> Result<Option<AppUser>, AppError> {
        match row {
            Some(row) => {
                let roles = fetch_roles(&self.pool, row.id).await?;
                Ok(Some(row.into_app_user(roles)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AppUserRepository for PgAppUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, AppError> {
        let row = sqlx::query_as::<_, AppUserRow>(
            r#"
            SELECT id, username, password, enabled, email, created_at, updated_at
            FROM app_user
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError> {
        let row = sqlx::query_as::<_, AppUserRow>(
            r#"
            SELECT id, username, password, enabled, email, created_at, updated_at
            FROM app_user
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }
}
