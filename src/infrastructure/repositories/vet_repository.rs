//! Vet Repository Implementation
//!
//! PostgreSQL implementation of the VetRepository trait. Vet rows are
//! read joined with their `app_user` base row and the employing clinic's
//! profile.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{AppUser, NewVet, Page, Role, Vet, VetEntitySummary, VetRepository};
use crate::shared::error::AppError;

use super::{conflict_on_unique, fetch_roles, insert_app_user, link_roles, update_app_user};

const SELECT_VET: &str = r#"
    SELECT u.id, u.username, u.password, u.enabled, u.email, u.created_at, u.updated_at,
           v.national_id_document, v.registration_number, v.name,
           ve.id AS vet_entity_id, ve.cif AS vet_entity_cif, ve.name AS vet_entity_name,
           ve.address AS vet_entity_address, ve.phone_number AS vet_entity_phone_number
    FROM vet v
    JOIN app_user u ON u.id = v.id
    LEFT JOIN vet_entity ve ON ve.id = v.vet_entity_id
"#;

/// Database row matching `vet` joined with `app_user` and the optional
/// clinic profile.
#[derive(Debug, sqlx::FromRow)]
struct VetRow {
    id: i64,
    username: String,
    password: String,
    enabled: bool,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    national_id_document: String,
    registration_number: String,
    name: String,
    vet_entity_id: Option<i64>,
    vet_entity_cif: Option<String>,
    vet_entity_name: Option<String>,
    vet_entity_address: Option<String>,
    vet_entity_phone_number: Option<String>,
}

impl VetRow {
    /// Convert database row to the domain Vet entity.
    fn into_vet(self, roles: Vec<Role>) -> Vet {
        let vet_entity = self.vet_entity_id.map(|id| VetEntitySummary {
            id,
            cif: self.vet_entity_cif.unwrap_or_default(),
            name: self.vet_entity_name.unwrap_or_default(),
            address: self.vet_entity_address,
            phone_number: self.vet_entity_phone_number,
        });

        Vet {
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
            national_id_document: self.national_id_document,
            registration_number: self.registration_number,
            name: self.name,
            vet_entity,
        }
    }
}

/// PostgreSQL vet repository implementation.
#[derive(Clone)]
pub struct PgVetRepository {
    pool: PgPool,
}

impl PgVetRepository {
    /// Create a new PgVetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: Option<VetRow>) -> Result<Option<Vet>, AppError> {
        match row {
            Some(row) => {
                let roles = fetch_roles(&self.pool, row.id).await?;
                Ok(Some(row.into_vet(roles)))
            }
            None => Ok(None),
        }
    }

    async fn get(&self, id: i64) -> Result<Vet, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vet with id {} not found", id)))
    }
}

#[async_trait]
impl VetRepository for PgVetRepository {
    /// Find a vet by its account id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Vet>, AppError> {
        let row = sqlx::query_as::<_, VetRow>(&format!("{SELECT_VET} WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.hydrate(row).await
    }

    /// Find the vet assigned to an appointment.
    async fn find_by_appointment_id(&self, appointment_id: i64) -> Result<Option<Vet>, AppError> {
        let row = sqlx::query_as::<_, VetRow>(&format!(
            r#"
            {SELECT_VET}
            JOIN appointment a ON a.vet_id = v.id
            WHERE a.id = $1
            "#
        ))
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    /// All vets employed by a clinic.
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, AppError> {
        let rows = sqlx::query_as::<_, VetRow>(&format!(
            r#"
            {SELECT_VET}
            WHERE v.vet_entity_id = $1
            ORDER BY v.name
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(vet_entity_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_vet(Vec::new())).collect())
    }

    /// Case-insensitive name fragment search within a clinic.
    async fn find_by_name_and_vet_entity_id(
        &self,
        name: &str,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, AppError> {
        let rows = sqlx::query_as::<_, VetRow>(&format!(
            r#"
            {SELECT_VET}
            WHERE v.name ILIKE '%' || $1 || '%' AND v.vet_entity_id = $2
            ORDER BY v.name
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(name)
        .bind(vet_entity_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_vet(Vec::new())).collect())
    }

    /// Whether a vet with the given id exists.
    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM vet WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result)
    }

    /// Create the account and vet rows plus role links transactionally.
    async fn create(&self, vet: &NewVet) -> Result<Vet, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = insert_app_user(&mut tx, &vet.account).await?;
        link_roles(&mut tx, id, &vet.account.roles).await?;

        sqlx::query(
            r#"
            INSERT INTO vet (id, national_id_document, registration_number, name, vet_entity_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&vet.national_id_document)
        .bind(&vet.registration_number)
        .bind(&vet.name)
        .bind(vet.vet_entity_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            conflict_on_unique(e, "Vet with this NIF/NIE or registration number already registered")
        })?;

        tx.commit().await?;

        self.get(id).await
    }

    /// Update account fields and the employing clinic.
    async fn update(&self, vet: &Vet) -> Result<Vet, AppError> {
        let mut tx = self.pool.begin().await?;

        update_app_user(&mut tx, vet.account.id, &vet.account.email, vet.account.enabled).await?;

        let result = sqlx::query(
            r#"
            UPDATE vet
            SET vet_entity_id = $2
            WHERE id = $1
            "#,
        )
        .bind(vet.account.id)
        .bind(vet.vet_entity.as_ref().map(|e| e.id))
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Vet with id {} not found",
                vet.account.id
            )));
        }

        tx.commit().await?;

        self.get(vet.account.id).await
    }
}
