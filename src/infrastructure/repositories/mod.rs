//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits, plus the
//! account helpers shared by the subtype repositories (joined-table
//! inheritance: every subtype write touches `app_user` as well).

pub mod app_user_repository;
pub mod appointment_repository;
pub mod client_repository;
pub mod pet_repository;
pub mod report_repository;
pub mod session_repository;
pub mod vet_entity_repository;
pub mod vet_repository;

pub use app_user_repository::PgAppUserRepository;
pub use appointment_repository::PgAppointmentRepository;
pub use client_repository::PgClientRepository;
pub use pet_repository::PgPetRepository;
pub use report_repository::PgReportRepository;
pub use session_repository::PgSessionRepository;
pub use vet_entity_repository::PgVetEntityRepository;
pub use vet_repository::PgVetRepository;

use sqlx::{PgExecutor, Postgres, Transaction};

use crate::domain::{NewAppUser, Role};
use crate::shared::error::AppError;

/// Role row used when hydrating account roles.
#[derive(Debug, sqlx::FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}

/// Load the roles linked to an account.
pub(crate) async fn fetch_roles<'e, E>(executor: E, user_id: i64) -> Result<Vec<Role>, AppError>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT r.id, r.name
        FROM role r
        JOIN users_roles ur ON ur.role_id = r.id
        WHERE ur.app_user_id = $1
        ORDER BY r.id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Role {
            id: r.id,
            name: r.name,
        })
        .collect())
}

/// Insert the base account row, returning the generated id.
///
/// Unique violations (duplicate username) surface as `AppError::Conflict`.
pub(crate) async fn insert_app_user(
    tx: &mut Transaction<'_, Postgres>,
    account: &NewAppUser,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO app_user (username, password, enabled, email)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(&account.username)
    .bind(&account.password_hash)
    .bind(account.enabled)
    .bind(&account.email)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Username already registered"))
}

/// Link the account to its roles by role name.
pub(crate) async fn link_roles(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    role_names: &[String],
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO users_roles (app_user_id, role_id)
        SELECT $1, id FROM role WHERE name = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(role_names)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Update the mutable base account columns (email, enabled).
pub(crate) async fn update_app_user(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    email: &Option<String>,
    enabled: bool,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE app_user
        SET email = $2, enabled = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(enabled)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Account with id {} not found",
            user_id
        )));
    }

    Ok(())
}

/// Translate a unique violation into a conflict, keeping other database
/// errors intact.
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}
