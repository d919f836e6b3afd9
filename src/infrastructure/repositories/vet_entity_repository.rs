//! Vet Entity Repository Implementation
//!
//! PostgreSQL implementation of the VetEntityRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{AppUser, NewVetEntity, Page, Role, VetEntity, VetEntityRepository};
use crate::shared::error::AppError;

use super::{conflict_on_unique, fetch_roles, insert_app_user, link_roles, update_app_user};

const SELECT_VET_ENTITY: &str = r#"
    SELECT u.id, u.username, u.password, u.enabled, u.email, u.created_at, u.updated_at,
           e.cif, e.name, e.address, e.phone_number
    FROM vet_entity e
    JOIN app_user u ON u.id = e.id
"#;

/// Database row matching `vet_entity` joined with `app_user`.
#[derive(Debug, sqlx::FromRow)]
struct VetEntityRow {
    id: i64,
    username: String,
    password: String,
    enabled: bool,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cif: String,
    name: String,
    address: Option<String>,
    phone_number: Option<String>,
}

impl VetEntityRow {
    /// Convert database row to the domain VetEntity entity.
    fn into_vet_entity(self, roles: Vec<Role>) -> VetEntity {
        VetEntity {
            account: AppUser {
                id: self.id,
                username: self.username,
                password_hash: self.password,
                enabled: self.enabled,
                email: self.email,
                roles,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            cif: self.cif,
            name: self.name,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

/// PostgreSQL vet entity repository implementation.
#[derive(Clone)]
pub struct PgVetEntityRepository {
    pool: PgPool,
}

impl PgVetEntityRepository {
    /// Create a new PgVetEntityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: i64) -> Result<VetEntity, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vet entity with id {} not found", id)))
    }
}

#[async_trait]
impl VetEntityRepository for PgVetEntityRepository {
    /// Find a vet entity by its account id.
    async fn find_by_id(&self, id: i64) -> Result<Option<VetEntity>, AppError> {
        let row = sqlx::query_as::<_, VetEntityRow>(&format!("{SELECT_VET_ENTITY} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let roles = fetch_roles(&self.pool, row.id).await?;
                Ok(Some(row.into_vet_entity(roles)))
            }
            None => Ok(None),
        }
    }

    /// Case-insensitive name fragment search.
    async fn find_by_name_containing(
        &self,
        name: &str,
        page: Page,
    ) -> Result<Vec<VetEntity>, AppError> {
        let rows = sqlx::query_as::<_, VetEntityRow>(&format!(
            r#"
            {SELECT_VET_ENTITY}
            WHERE e.name ILIKE '%' || $1 || '%'
            ORDER BY e.name
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(name)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| r.into_vet_entity(Vec::new()))
            .collect())
    }

    /// Whether a vet entity with the given id exists.
    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM vet_entity WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result)
    }

    /// Create the account and clinic rows plus role links transactionally.
    async fn create(&self, vet_entity: &NewVetEntity) -> Result<VetEntity, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = insert_app_user(&mut tx, &vet_entity.account).await?;
        link_roles(&mut tx, id, &vet_entity.account.roles).await?;

        sqlx::query(
            r#"
            INSERT INTO vet_entity (id, cif, name, address, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&vet_entity.cif)
        .bind(&vet_entity.name)
        .bind(&vet_entity.address)
        .bind(&vet_entity.phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Vet entity with this CIF or phone already registered"))?;

        tx.commit().await?;

        self.get(id).await
    }

    /// Update account fields and the clinic profile.
    async fn update(&self, vet_entity: &VetEntity) -> Result<VetEntity, AppError> {
        let mut tx = self.pool.begin().await?;

        update_app_user(
            &mut tx,
            vet_entity.account.id,
            &vet_entity.account.email,
            vet_entity.account.enabled,
        )
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE vet_entity
            SET name = $2, address = $3, phone_number = $4
            WHERE id = $1
            "#,
        )
        .bind(vet_entity.account.id)
        .bind(&vet_entity.name)
        .bind(&vet_entity.address)
        .bind(&vet_entity.phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Vet entity with this phone already registered"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Vet entity with id {} not found",
                vet_entity.account.id
            )));
        }

        tx.commit().await?;

        self.get(vet_entity.account.id).await
    }
}
