//! Pet Service
//!
//! Pet registration, lookups and client association management. The
//! client↔pet association is symmetric: both sides must be touched
//! together, which the repository does through the join table.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ClientRepository, NewPet, Page, Pet, PetRepository};

/// Pet service trait
#[async_trait]
pub trait PetService: Send + Sync {
    /// Find a pet by id, owners included
    async fn find_by_id(&self, id: i64) -> Result<Pet, PetError>;

    /// Pets of a client, living animals first
    async fn find_by_client_id(&self, client_id: i64, page: Page) -> Result<Vec<Pet>, PetError>;

    /// Pets of a client located by NIF/NIE, living animals first
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Pet>, PetError>;

    /// Register a pet
    async fn save(&self, pet: NewPet) -> Result<Pet, PetError>;

    /// Update a pet's descriptive fields
    async fn update(&self, id: i64, pet: NewPet) -> Result<Pet, PetError>;

    /// Associate a client (located by NIF/NIE) with a pet
    async fn add_client(&self, pet_id: i64, national_id_document: &str) -> Result<(), PetError>;

    /// Remove a client↔pet association
    async fn remove_client(&self, pet_id: i64, client_id: i64) -> Result<(), PetError>;

    /// Delete a pet, removing its client associations first
    async fn delete(&self, id: i64) -> Result<(), PetError>;
}

/// Pet service errors
#[derive(Debug, thiserror::Error)]
pub enum PetError {
    #[error("Pet with id {0} not found")]
    NotFound(i64),

    #[error("Client with id {0} not found")]
    ClientNotFound(i64),

    #[error("Client with NIF/NIE {0} not found")]
    ClientNotFoundByDocument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// PetService implementation
pub struct PetServiceImpl<P, C>
where
    P: PetRepository,
    C: ClientRepository,
{
    pet_repo: Arc<P>,
    client_repo: Arc<C>,
}

impl<P, C> PetServiceImpl<P, C>
where
    P: PetRepository,
    C: ClientRepository,
{
    pub fn new(pet_repo: Arc<P>, client_repo: Arc<C>) -> Self {
        Self {
            pet_repo,
            client_repo,
        }
    }

    async fn get_pet(&self, id: i64) -> Result<Pet, PetError> {
        self.pet_repo
            .find_by_id(id)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))?
            .ok_or(PetError::NotFound(id))
    }
}

#[async_trait]
impl<P, C> PetService for PetServiceImpl<P, C>
where
    P: PetRepository + 'static,
    C: ClientRepository + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Pet, PetError> {
        self.get_pet(id).await
    }

    async fn find_by_client_id(&self, client_id: i64, page: Page) -> Result<Vec<Pet>, PetError> {
        self.pet_repo
            .find_by_client_id(client_id, page)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Pet>, PetError> {
        self.pet_repo
            .find_by_client_national_id_document(national_id_document, page)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn save(&self, pet: NewPet) -> Result<Pet, PetError> {
        self.pet_repo
            .create(&pet)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn update(&self, id: i64, pet: NewPet) -> Result<Pet, PetError> {
        let mut saved = self.get_pet(id).await?;

        saved.chip_number = pet.chip_number;
        saved.species = pet.species;
        saved.breed = pet.breed;
        saved.name = pet.name;
        saved.birthdate = pet.birthdate;
        saved.alive = pet.alive;
        saved.castrated = pet.castrated;

        self.pet_repo
            .update(&saved)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn add_client(&self, pet_id: i64, national_id_document: &str) -> Result<(), PetError> {
        self.get_pet(pet_id).await?;

        let client = self
            .client_repo
            .find_by_national_id_document(national_id_document)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))?
            .ok_or_else(|| PetError::ClientNotFoundByDocument(national_id_document.to_string()))?;

        // The join table carries both directions of the association
        self.pet_repo
            .link_client(pet_id, client.account.id)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn remove_client(&self, pet_id: i64, client_id: i64) -> Result<(), PetError> {
        self.get_pet(pet_id).await?;

        self.client_repo
            .find_by_id(client_id)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))?
            .ok_or(PetError::ClientNotFound(client_id))?;

        self.pet_repo
            .unlink_client(pet_id, client_id)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), PetError> {
        self.get_pet(id).await?;

        self.pet_repo
            .delete(id)
            .await
            .map_err(|e| PetError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUser, Client, MockClientRepository, MockPetRepository, PetSpecies};
    use mockall::predicate::eq;

    fn stored_pet(id: i64) -> Pet {
        Pet {
            id,
            chip_number: Some("941000024680135".into()),
            species: PetSpecies::Dog,
            breed: Some("Podenco".into()),
            name: "Luna".into(),
            birthdate: None,
            alive: true,
            castrated: Some(false),
            clients: Vec::new(),
        }
    }

    fn stored_client(id: i64, document: &str) -> Client {
        Client {
            account: AppUser {
                id,
                ..AppUser::default()
            },
            national_id_document: document.into(),
            name: "Carmen Pérez".into(),
            birthdate: None,
            address: None,
            phone_number: None,
            pets: Vec::new(),
        }
    }

    fn new_pet(name: &str) -> NewPet {
        NewPet {
            chip_number: None,
            species: PetSpecies::Cat,
            breed: None,
            name: name.into(),
            birthdate: None,
            alive: false,
            castrated: Some(true),
        }
    }

    fn service(
        pet_repo: MockPetRepository,
        client_repo: MockClientRepository,
    ) -> PetServiceImpl<MockPetRepository, MockClientRepository> {
        PetServiceImpl::new(Arc::new(pet_repo), Arc::new(client_repo))
    }

    #[tokio::test]
    async fn test_find_by_id_missing_pet_fails() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(pet_repo, MockClientRepository::new());
        let result = service.find_by_id(9).await;

        assert!(matches!(result, Err(PetError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_update_applies_all_descriptive_fields() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo
            .expect_update()
            .withf(|pet: &Pet| {
                pet.id == 5
                    && pet.name == "Michi"
                    && pet.species == PetSpecies::Cat
                    && !pet.alive
                    && pet.castrated == Some(true)
            })
            .times(1)
            .returning(|pet| Ok(pet.clone()));

        let service = service(pet_repo, MockClientRepository::new());
        let updated = service.update(5, new_pet("Michi")).await.expect("update succeeds");

        assert_eq!(updated.name, "Michi");
    }

    #[tokio::test]
    async fn test_add_client_links_the_join_table() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo
            .expect_link_client()
            .with(eq(5), eq(30))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_find_by_national_id_document()
            .with(eq("12345678Z"))
            .returning(|doc| Ok(Some(stored_client(30, doc))));

        let service = service(pet_repo, client_repo);
        service
            .add_client(5, "12345678Z")
            .await
            .expect("association succeeds");
    }

    #[tokio::test]
    async fn test_add_client_unknown_document_fails_without_linking() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo.expect_link_client().times(0);

        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_find_by_national_id_document()
            .returning(|_| Ok(None));

        let service = service(pet_repo, client_repo);
        let result = service.add_client(5, "00000000X").await;

        assert!(matches!(
            result,
            Err(PetError::ClientNotFoundByDocument(doc)) if doc == "00000000X"
        ));
    }

    #[tokio::test]
    async fn test_add_client_unknown_pet_fails() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(pet_repo, MockClientRepository::new());
        let result = service.add_client(5, "12345678Z").await;

        assert!(matches!(result, Err(PetError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_remove_client_unlinks_the_join_table() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo
            .expect_unlink_client()
            .with(eq(5), eq(30))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_find_by_id()
            .with(eq(30))
            .returning(|id| Ok(Some(stored_client(id, "12345678Z"))));

        let service = service(pet_repo, client_repo);
        service
            .remove_client(5, 30)
            .await
            .expect("disassociation succeeds");
    }

    #[tokio::test]
    async fn test_remove_client_unknown_client_fails() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo.expect_unlink_client().times(0);

        let mut client_repo = MockClientRepository::new();
        client_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(pet_repo, client_repo);
        let result = service.remove_client(5, 30).await;

        assert!(matches!(result, Err(PetError::ClientNotFound(30))));
    }

    #[tokio::test]
    async fn test_delete_missing_pet_fails() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo.expect_find_by_id().returning(|_| Ok(None));
        pet_repo.expect_delete().times(0);

        let service = service(pet_repo, MockClientRepository::new());
        let result = service.delete(9).await;

        assert!(matches!(result, Err(PetError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_delete_existing_pet_succeeds() {
        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));
        pet_repo.expect_delete().with(eq(9)).times(1).returning(|_| Ok(()));

        let service = service(pet_repo, MockClientRepository::new());
        service.delete(9).await.expect("delete succeeds");
    }
}
