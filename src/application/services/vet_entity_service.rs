//! Vet Entity Query Service
//!
//! Read access to vet entity (clinic) data for the core API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Page, VetEntity, VetEntityRepository};

/// Vet entity query service trait
#[async_trait]
pub trait VetEntityService: Send + Sync {
    /// Find a vet entity by id
    async fn find_by_id(&self, id: i64) -> Result<VetEntity, VetEntityError>;

    /// Vet entities whose name contains the given fragment
    async fn find_by_name_containing(
        &self,
        name: &str,
        page: Page,
    ) -> Result<Vec<VetEntity>, VetEntityError>;
}

/// Vet entity query errors
#[derive(Debug, thiserror::Error)]
pub enum VetEntityError {
    #[error("Vet entity with id {0} not found")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// VetEntityService implementation
pub struct VetEntityServiceImpl<E>
where
    E: VetEntityRepository,
{
    vet_entity_repo: Arc<E>,
}

impl<E> VetEntityServiceImpl<E>
where
    E: VetEntityRepository,
{
    pub fn new(vet_entity_repo: Arc<E>) -> Self {
        Self { vet_entity_repo }
    }
}

#[async_trait]
impl<E> VetEntityService for VetEntityServiceImpl<E>
where
    E: VetEntityRepository + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<VetEntity, VetEntityError> {
        self.vet_entity_repo
            .find_by_id(id)
            .await
            .map_err(|e| VetEntityError::Internal(e.to_string()))?
            .ok_or(VetEntityError::NotFound(id))
    }

    async fn find_by_name_containing(
        &self,
        name: &str,
        page: Page,
    ) -> Result<Vec<VetEntity>, VetEntityError> {
        self.vet_entity_repo
            .find_by_name_containing(name, page)
            .await
            .map_err(|e| VetEntityError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUser, MockVetEntityRepository};
    use mockall::predicate::eq;

    fn stored_vet_entity(id: i64, name: &str) -> VetEntity {
        VetEntity {
            account: AppUser {
                id,
                ..AppUser::default()
            },
            cif: "B1234567X".into(),
            name: name.into(),
            address: None,
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_missing_clinic_fails() {
        let mut vet_entity_repo = MockVetEntityRepository::new();
        vet_entity_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = VetEntityServiceImpl::new(Arc::new(vet_entity_repo));
        let result = service.find_by_id(8).await;

        assert!(matches!(result, Err(VetEntityError::NotFound(8))));
    }

    #[tokio::test]
    async fn test_name_search_is_forwarded() {
        let mut vet_entity_repo = MockVetEntityRepository::new();
        vet_entity_repo
            .expect_find_by_name_containing()
            .with(eq("vet"), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(vec![stored_vet_entity(8, "VetSur Clinic")]));

        let service = VetEntityServiceImpl::new(Arc::new(vet_entity_repo));
        let clinics = service
            .find_by_name_containing("vet", Page::default())
            .await
            .expect("query succeeds");

        assert_eq!(clinics.len(), 1);
        assert_eq!(clinics[0].name, "VetSur Clinic");
    }
}
