//! Vet Query Service
//!
//! Read access to vet data for the core API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Page, Vet, VetRepository};

/// Vet query service trait
#[async_trait]
pub trait VetService: Send + Sync {
    /// Find a vet by id
    async fn find_by_id(&self, id: i64) -> Result<Vet, VetError>;

    /// Find the vet assigned to an appointment
    async fn find_by_appointment_id(&self, appointment_id: i64) -> Result<Vet, VetError>;

    /// All vets of a clinic
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, VetError>;

    /// Vets of a clinic matched by name fragment
    async fn find_by_name_and_vet_entity_id(
        &self,
        name: &str,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, VetError>;
}

/// Vet query errors
#[derive(Debug, thiserror::Error)]
pub enum VetError {
    #[error("Vet with id {0} not found")]
    NotFound(i64),

    #[error("No vet assigned to appointment {0}")]
    NotFoundForAppointment(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// VetService implementation
pub struct VetServiceImpl<V>
where
    V: VetRepository,
{
    vet_repo: Arc<V>,
}

impl<V> VetServiceImpl<V>
where
    V: VetRepository,
{
    pub fn new(vet_repo: Arc<V>) -> Self {
        Self { vet_repo }
    }
}

#[async_trait]
impl<V> VetService for VetServiceImpl<V>
where
    V: VetRepository + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Vet, VetError> {
        self.vet_repo
            .find_by_id(id)
            .await
            .map_err(|e| VetError::Internal(e.to_string()))?
            .ok_or(VetError::NotFound(id))
    }

    async fn find_by_appointment_id(&self, appointment_id: i64) -> Result<Vet, VetError> {
        self.vet_repo
            .find_by_appointment_id(appointment_id)
            .await
            .map_err(|e| VetError::Internal(e.to_string()))?
            .ok_or(VetError::NotFoundForAppointment(appointment_id))
    }

    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, VetError> {
        self.vet_repo
            .find_by_vet_entity_id(vet_entity_id, page)
            .await
            .map_err(|e| VetError::Internal(e.to_string()))
    }

    async fn find_by_name_and_vet_entity_id(
        &self,
        name: &str,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, VetError> {
        self.vet_repo
            .find_by_name_and_vet_entity_id(name, vet_entity_id, page)
            .await
            .map_err(|e| VetError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUser, MockVetRepository};
    use mockall::predicate::eq;

    fn stored_vet(id: i64) -> Vet {
        Vet {
            account: AppUser {
                id,
                ..AppUser::default()
            },
            national_id_document: "87654321X".into(),
            registration_number: "15/V-6789".into(),
            name: "Ana García".into(),
            vet_entity: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_appointment_id_resolves_the_assigned_vet() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo
            .expect_find_by_appointment_id()
            .with(eq(12))
            .returning(|_| Ok(Some(stored_vet(3))));

        let service = VetServiceImpl::new(Arc::new(vet_repo));
        let vet = service.find_by_appointment_id(12).await.expect("vet found");

        assert_eq!(vet.account.id, 3);
    }

    #[tokio::test]
    async fn test_find_by_appointment_id_missing_fails() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo
            .expect_find_by_appointment_id()
            .returning(|_| Ok(None));

        let service = VetServiceImpl::new(Arc::new(vet_repo));
        let result = service.find_by_appointment_id(12).await;

        assert!(matches!(result, Err(VetError::NotFoundForAppointment(12))));
    }

    #[tokio::test]
    async fn test_name_search_is_forwarded() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo
            .expect_find_by_name_and_vet_entity_id()
            .with(eq("ana"), eq(8), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(vec![stored_vet(3)]));

        let service = VetServiceImpl::new(Arc::new(vet_repo));
        let vets = service
            .find_by_name_and_vet_entity_id("ana", 8, Page::default())
            .await
            .expect("query succeeds");

        assert_eq!(vets.len(), 1);
    }
}
