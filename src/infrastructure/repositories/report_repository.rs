//! Report Repository Implementation
//!
//! PostgreSQL implementation of the ReportRepository trait. Listings
//! join the pet and the issuing vet (with its clinic profile) so reports
//! come back fully shaped, newest first.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::{
    NewReport, Page, Pet, PetSpecies, Report, ReportRepository, VetEntitySummary, VetSummary,
};
use crate::shared::error::AppError;

const SELECT_REPORT: &str = r#"
    SELECT r.id, r.reason, r.diagnosis, r.treatment, r.report_date,
           p.id AS pet_id, p.chip_number, p.species, p.breed, p.name AS pet_name,
           p.birthdate AS pet_birthdate, p.alive, p.castrated,
           v.id AS vet_id, v.name AS vet_name,
           ve.id AS vet_entity_id, ve.cif AS vet_entity_cif, ve.name AS vet_entity_name,
           ve.address AS vet_entity_address, ve.phone_number AS vet_entity_phone_number
    FROM report r
    JOIN pet p ON p.id = r.pet_id
    JOIN vet v ON v.id = r.vet_id
    LEFT JOIN vet_entity ve ON ve.id = v.vet_entity_id
"#;

/// Database row matching `report` with the pet and vet joined.
#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: i64,
    reason: Option<String>,
    diagnosis: Option<String>,
    treatment: Option<String>,
    report_date: NaiveDate,
    pet_id: i64,
    chip_number: Option<String>,
    species: String,
    breed: Option<String>,
    pet_name: String,
    pet_birthdate: Option<NaiveDate>,
    alive: bool,
    castrated: Option<bool>,
    vet_id: i64,
    vet_name: String,
    vet_entity_id: Option<i64>,
    vet_entity_cif: Option<String>,
    vet_entity_name: Option<String>,
    vet_entity_address: Option<String>,
    vet_entity_phone_number: Option<String>,
}

impl ReportRow {
    /// Convert database row to the domain Report entity.
    fn into_report(self) -> Result<Report, AppError> {
        let species = PetSpecies::parse(&self.species).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown species '{}' for pet {}",
                self.species, self.pet_id
            ))
        })?;

        let vet_entity = self.vet_entity_id.map(|id| VetEntitySummary {
            id,
            cif: self.vet_entity_cif.unwrap_or_default(),
            name: self.vet_entity_name.unwrap_or_default(),
            address: self.vet_entity_address,
            phone_number: self.vet_entity_phone_number,
        });

        Ok(Report {
            id: self.id,
            reason: self.reason,
            diagnosis: self.diagnosis,
            treatment: self.treatment,
            report_date: self.report_date,
            pet: Pet {
                id: self.pet_id,
                chip_number: self.chip_number,
                species,
                breed: self.breed,
                name: self.pet_name,
                birthdate: self.pet_birthdate,
                alive: self.alive,
                castrated: self.castrated,
                clients: Vec::new(),
            },
            vet: VetSummary {
                id: self.vet_id,
                name: self.vet_name,
                vet_entity,
            },
        })
    }
}

/// PostgreSQL report repository implementation.
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    /// Create a new PgReportRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn collect(rows: Vec<ReportRow>) -> Result<Vec<Report>, AppError> {
        rows.into_iter().map(ReportRow::into_report).collect()
    }

    async fn get(&self, id: i64) -> Result<Report, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", id)))
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    /// Find a report by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(&format!("{SELECT_REPORT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ReportRow::into_report).transpose()
    }

    /// Reports for a pet, newest first.
    async fn find_by_pet_id(&self, pet_id: i64, page: Page) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            {SELECT_REPORT}
            WHERE r.pet_id = $1
            ORDER BY r.report_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pet_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Reports for any pet associated with the client, newest first.
    async fn find_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            {SELECT_REPORT}
            WHERE EXISTS (
                SELECT 1 FROM client_pets cp
                WHERE cp.pet_id = r.pet_id AND cp.client_id = $1
            )
            ORDER BY r.report_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(client_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Reports for any pet of the client located by NIF/NIE, newest first.
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            {SELECT_REPORT}
            WHERE EXISTS (
                SELECT 1 FROM client_pets cp
                JOIN client c ON c.id = cp.client_id
                WHERE cp.pet_id = r.pet_id AND c.national_id_document = $1
            )
            ORDER BY r.report_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(national_id_document)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Reports issued by a vet, newest first.
    async fn find_by_vet_id(&self, vet_id: i64, page: Page) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            {SELECT_REPORT}
            WHERE r.vet_id = $1
            ORDER BY r.report_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(vet_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Reports issued by any vet of a clinic, newest first.
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, AppError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            {SELECT_REPORT}
            WHERE v.vet_entity_id = $1
            ORDER BY r.report_date DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(vet_entity_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Issue a report.
    async fn create(&self, report: &NewReport) -> Result<Report, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO report (reason, diagnosis, treatment, report_date, vet_id, pet_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&report.reason)
        .bind(&report.diagnosis)
        .bind(&report.treatment)
        .bind(report.report_date)
        .bind(report.vet_id)
        .bind(report.pet_id)
        .fetch_one(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Amend a report.
    async fn update(&self, id: i64, report: &NewReport) -> Result<Report, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE report
            SET reason = $2, diagnosis = $3, treatment = $4, report_date = $5,
                vet_id = $6, pet_id = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&report.reason)
        .bind(&report.diagnosis)
        .bind(&report.treatment)
        .bind(report.report_date)
        .bind(report.vet_id)
        .bind(report.pet_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report with id {} not found", id)));
        }

        self.get(id).await
    }

    /// Delete a report.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM report WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Report with id {} not found", id)));
        }

        Ok(())
    }
}
