//! Report Service
//!
//! Issuing, amending and querying clinical visit reports. The referenced
//! pet and vet must resolve before a report is persisted.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{NewReport, Page, PetRepository, Report, ReportRepository, VetRepository};

/// Report service trait
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Find a report by id
    async fn find_by_id(&self, id: i64) -> Result<Report, ReportError>;

    /// Reports for a pet, newest first
    async fn find_by_pet_id(&self, pet_id: i64, page: Page) -> Result<Vec<Report>, ReportError>;

    /// Reports for any pet of a client, newest first
    async fn find_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, ReportError>;

    /// Reports for any pet of a client located by NIF/NIE, newest first
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Report>, ReportError>;

    /// Reports issued by a vet, newest first
    async fn find_by_vet_id(&self, vet_id: i64, page: Page) -> Result<Vec<Report>, ReportError>;

    /// Reports issued by any vet of a clinic, newest first
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, ReportError>;

    /// Issue a report
    async fn save(&self, report: NewReport) -> Result<Report, ReportError>;

    /// Amend a report
    async fn update(&self, id: i64, report: NewReport) -> Result<Report, ReportError>;

    /// Delete a report
    async fn delete(&self, id: i64) -> Result<(), ReportError>;
}

/// Report service errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report with id {0} not found")]
    NotFound(i64),

    #[error("Pet with id {0} not found")]
    PetNotFound(i64),

    #[error("Vet with id {0} not found")]
    VetNotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ReportService implementation
pub struct ReportServiceImpl<R, P, V>
where
    R: ReportRepository,
    P: PetRepository,
    V: VetRepository,
{
    report_repo: Arc<R>,
    pet_repo: Arc<P>,
    vet_repo: Arc<V>,
}

impl<R, P, V> ReportServiceImpl<R, P, V>
where
    R: ReportRepository,
    P: PetRepository,
    V: VetRepository,
{
    pub fn new(report_repo: Arc<R>, pet_repo: Arc<P>, vet_repo: Arc<V>) -> Self {
        Self {
            report_repo,
            pet_repo,
            vet_repo,
        }
    }

    /// Pet and issuing vet must exist before a report touches the database.
    async fn check_references(&self, report: &NewReport) -> Result<(), ReportError> {
        self.pet_repo
            .find_by_id(report.pet_id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::PetNotFound(report.pet_id))?;

        let vet_exists = self
            .vet_repo
            .exists(report.vet_id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?;
        if !vet_exists {
            return Err(ReportError::VetNotFound(report.vet_id));
        }

        Ok(())
    }
}

#[async_trait]
impl<R, P, V> ReportService for ReportServiceImpl<R, P, V>
where
    R: ReportRepository + 'static,
    P: PetRepository + 'static,
    V: VetRepository + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Report, ReportError> {
        self.report_repo
            .find_by_id(id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::NotFound(id))
    }

    async fn find_by_pet_id(&self, pet_id: i64, page: Page) -> Result<Vec<Report>, ReportError> {
        self.report_repo
            .find_by_pet_id(pet_id, page)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn find_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, ReportError> {
        self.report_repo
            .find_by_client_id(client_id, page)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Report>, ReportError> {
        self.report_repo
            .find_by_client_national_id_document(national_id_document, page)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn find_by_vet_id(&self, vet_id: i64, page: Page) -> Result<Vec<Report>, ReportError> {
        self.report_repo
            .find_by_vet_id(vet_id, page)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Report>, ReportError> {
        self.report_repo
            .find_by_vet_entity_id(vet_entity_id, page)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn save(&self, report: NewReport) -> Result<Report, ReportError> {
        self.check_references(&report).await?;

        self.report_repo
            .create(&report)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn update(&self, id: i64, report: NewReport) -> Result<Report, ReportError> {
        self.report_repo
            .find_by_id(id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::NotFound(id))?;

        self.check_references(&report).await?;

        self.report_repo
            .update(id, &report)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), ReportError> {
        self.report_repo
            .find_by_id(id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))?
            .ok_or(ReportError::NotFound(id))?;

        self.report_repo
            .delete(id)
            .await
            .map_err(|e| ReportError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        MockPetRepository, MockReportRepository, MockVetRepository, Pet, PetSpecies, VetSummary,
    };
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn stored_pet(id: i64) -> Pet {
        Pet {
            id,
            chip_number: None,
            species: PetSpecies::Dog,
            breed: None,
            name: "Luna".into(),
            birthdate: None,
            alive: true,
            castrated: None,
            clients: Vec::new(),
        }
    }

    fn stored_report(id: i64) -> Report {
        Report {
            id,
            reason: Some("Annual check-up".into()),
            diagnosis: Some("Healthy".into()),
            treatment: None,
            report_date: NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date"),
            pet: stored_pet(2),
            vet: VetSummary {
                id: 3,
                name: "Ana García".into(),
                vet_entity: None,
            },
        }
    }

    fn new_report() -> NewReport {
        NewReport {
            pet_id: 2,
            vet_id: 3,
            reason: Some("Annual check-up".into()),
            diagnosis: Some("Healthy".into()),
            treatment: None,
            report_date: NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date"),
        }
    }

    fn service(
        report_repo: MockReportRepository,
        pet_repo: MockPetRepository,
        vet_repo: MockVetRepository,
    ) -> ReportServiceImpl<MockReportRepository, MockPetRepository, MockVetRepository> {
        ReportServiceImpl::new(Arc::new(report_repo), Arc::new(pet_repo), Arc::new(vet_repo))
    }

    #[tokio::test]
    async fn test_save_requires_existing_pet() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo.expect_find_by_id().with(eq(2)).returning(|_| Ok(None));

        let service = service(MockReportRepository::new(), pet_repo, MockVetRepository::new());
        let result = service.save(new_report()).await;

        assert!(matches!(result, Err(ReportError::PetNotFound(2))));
    }

    #[tokio::test]
    async fn test_save_requires_existing_vet() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));

        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().with(eq(3)).returning(|_| Ok(false));

        let service = service(MockReportRepository::new(), pet_repo, vet_repo);
        let result = service.save(new_report()).await;

        assert!(matches!(result, Err(ReportError::VetNotFound(3))));
    }

    #[tokio::test]
    async fn test_save_issues_when_references_resolve() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));

        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().returning(|_| Ok(true));

        let mut report_repo = MockReportRepository::new();
        report_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(stored_report(11)));

        let service = service(report_repo, pet_repo, vet_repo);
        let report = service.save(new_report()).await.expect("save succeeds");

        assert_eq!(report.id, 11);
    }

    #[tokio::test]
    async fn test_update_missing_report_fails() {
        let mut report_repo = MockReportRepository::new();
        report_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(report_repo, MockPetRepository::new(), MockVetRepository::new());
        let result = service.update(44, new_report()).await;

        assert!(matches!(result, Err(ReportError::NotFound(44))));
    }

    #[tokio::test]
    async fn test_delete_missing_report_fails() {
        let mut report_repo = MockReportRepository::new();
        report_repo.expect_find_by_id().returning(|_| Ok(None));
        report_repo.expect_delete().times(0);

        let service = service(report_repo, MockPetRepository::new(), MockVetRepository::new());
        let result = service.delete(44).await;

        assert!(matches!(result, Err(ReportError::NotFound(44))));
    }

    #[tokio::test]
    async fn test_vet_entity_listing_uses_the_clinic_join() {
        let mut report_repo = MockReportRepository::new();
        report_repo
            .expect_find_by_vet_entity_id()
            .with(eq(8), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(vec![stored_report(1)]));
        report_repo.expect_find_by_vet_id().times(0);

        let service = service(report_repo, MockPetRepository::new(), MockVetRepository::new());
        let reports = service
            .find_by_vet_entity_id(8, Page::default())
            .await
            .expect("query succeeds");

        assert_eq!(reports.len(), 1);
    }
}
