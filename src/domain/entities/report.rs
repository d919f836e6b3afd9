//! Clinical report entity and repository trait.
//!
//! A report records the outcome of a visit: reason, diagnosis and
//! prescribed treatment, issued by a vet for a pet.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::vet::VetSummary;
use super::pet::Pet;
use super::Page;

/// A clinical visit report.
///
/// Maps to the `report` table with the pet and issuing vet joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,

    /// Reason for the visit
    pub reason: Option<String>,

    /// Clinical diagnosis
    pub diagnosis: Option<String>,

    /// Treatment / medication prescribed
    pub treatment: Option<String>,

    /// Date the report was issued
    pub report_date: NaiveDate,

    pub pet: Pet,

    pub vet: VetSummary,
}

/// Data for issuing or amending a report. The referenced pet and vet must
/// exist.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub pet_id: i64,
    pub vet_id: i64,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub report_date: NaiveDate,
}

/// Repository trait for report data access.
///
/// Every listing is ordered by report date, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Find a report by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Report>, AppError>;

    /// Reports for a pet.
    async fn find_by_pet_id(&self, pet_id: i64, page: Page) -> Result<Vec<Report>, AppError>;

    /// Reports for any pet associated with the client.
    async fn find_by_client_id(&self, client_id: i64, page: Page)
        -> Result<Vec<Report>, AppError>;

    /// Reports for any pet associated with the client located by NIF/NIE.
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Report>, AppError>;

    /// Reports issued by a vet.
    async fn find_by_vet_id(&self, vet_id: i64, page: Page) -> Result<Vec<Report>, AppError>;

    /// Reports issued by any vet of a clinic.
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, AppError>;

    /// Issue a report.
    async fn create(&self, report: &NewReport) -> Result<Report, AppError>;

    /// Amend a report.
    async fn update(&self, id: i64, report: &NewReport) -> Result<Report, AppError>;

    /// Delete a report.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
