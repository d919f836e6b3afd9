//! Pet entity and repository trait.
//!
//! Pets belong to one or more clients (the owners with access to the
//! animal's data in the application) through the `client_pets` join table,
//! and accumulate clinical reports and appointments over time.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::client::Client;
use super::Page;

/// Animal species accepted by the system, matching the database check
/// constraint on `pet.species`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSpecies {
    Dog,
    Cat,
    Horse,
    Ferret,
    Bird,
    Rabbit,
}

impl PetSpecies {
    /// Convert from database string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dog" => Some(Self::Dog),
            "cat" => Some(Self::Cat),
            "horse" => Some(Self::Horse),
            "ferret" => Some(Self::Ferret),
            "bird" => Some(Self::Bird),
            "rabbit" => Some(Self::Rabbit),
            _ => None,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
            Self::Horse => "horse",
            Self::Ferret => "ferret",
            Self::Bird => "bird",
            Self::Rabbit => "rabbit",
        }
    }
}

impl std::fmt::Display for PetSpecies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered animal.
///
/// Maps to the `pet` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - chip_number: VARCHAR(15) NULL
/// - species: VARCHAR(20) CHECK (...)
/// - breed: VARCHAR(50) NULL
/// - name: VARCHAR(50) NOT NULL
/// - birthdate: DATE NULL
/// - alive: BOOLEAN NOT NULL DEFAULT TRUE
/// - castrated: BOOLEAN NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,

    /// Identification chip number
    pub chip_number: Option<String>,

    pub species: PetSpecies,

    pub breed: Option<String>,

    pub name: String,

    pub birthdate: Option<NaiveDate>,

    pub alive: bool,

    pub castrated: Option<bool>,

    /// Clients associated with this pet. Loaded on demand; empty when the
    /// pet comes from a listing that does not hydrate owners.
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl Pet {
    /// Mirror one side of the client association. The other side is
    /// `Client::attach_pet`.
    pub fn attach_client(&mut self, client: Client) {
        if !self.clients.iter().any(|c| c.account.id == client.account.id) {
            self.clients.push(client);
        }
    }

    /// Remove one side of the client association. The other side is
    /// `Client::detach_pet`.
    pub fn detach_client(&mut self, client_id: i64) {
        self.clients.retain(|c| c.account.id != client_id);
    }
}

/// Pet data carried by appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSummary {
    pub id: i64,
    pub name: String,
    pub alive: bool,
}

/// Data for registering a pet. Associations are managed separately.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub chip_number: Option<String>,
    pub species: PetSpecies,
    pub breed: Option<String>,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub alive: bool,
    pub castrated: Option<bool>,
}

/// Repository trait for pet data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetRepository: Send + Sync {
    /// Find a pet by id, with its associated clients.
    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>, AppError>;

    /// Pets associated with a client, living animals first.
    async fn find_by_client_id(&self, client_id: i64, page: Page) -> Result<Vec<Pet>, AppError>;

    /// Pets associated with a client located by NIF/NIE, living animals
    /// first.
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Pet>, AppError>;

    /// Register a new pet.
    async fn create(&self, pet: &NewPet) -> Result<Pet, AppError>;

    /// Update a pet's descriptive fields. Associations are untouched.
    async fn update(&self, pet: &Pet) -> Result<Pet, AppError>;

    /// Delete a pet. Client associations are removed in the same
    /// transaction.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Add a row to `client_pets`.
    async fn link_client(&self, pet_id: i64, client_id: i64) -> Result<(), AppError>;

    /// Remove a row from `client_pets`.
    async fn unlink_client(&self, pet_id: i64, client_id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::app_user::AppUser;

    fn test_client(id: i64, name: &str) -> Client {
        Client {
            account: AppUser {
                id,
                username: format!("user{id}"),
                ..AppUser::default()
            },
            national_id_document: "12345678Z".to_string(),
            name: name.to_string(),
            birthdate: None,
            address: None,
            phone_number: None,
            pets: Vec::new(),
        }
    }

    fn test_pet(id: i64) -> Pet {
        Pet {
            id,
            chip_number: Some("941000024680135".to_string()),
            species: PetSpecies::Dog,
            breed: Some("Podenco".to_string()),
            name: "Luna".to_string(),
            birthdate: None,
            alive: true,
            castrated: Some(false),
            clients: Vec::new(),
        }
    }

    #[test]
    fn test_species_round_trip() {
        for species in [
            PetSpecies::Dog,
            PetSpecies::Cat,
            PetSpecies::Horse,
            PetSpecies::Ferret,
            PetSpecies::Bird,
            PetSpecies::Rabbit,
        ] {
            assert_eq!(PetSpecies::parse(species.as_str()), Some(species));
        }
    }

    #[test]
    fn test_species_parse_is_case_insensitive() {
        assert_eq!(PetSpecies::parse("DOG"), Some(PetSpecies::Dog));
        assert_eq!(PetSpecies::parse("Cat"), Some(PetSpecies::Cat));
    }

    #[test]
    fn test_species_parse_rejects_unknown() {
        assert_eq!(PetSpecies::parse("dragon"), None);
        assert_eq!(PetSpecies::parse(""), None);
    }

    #[test]
    fn test_species_serializes_lowercase() {
        let serialized = serde_json::to_string(&PetSpecies::Ferret).expect("serializable");
        assert_eq!(serialized, "\"ferret\"");
    }

    #[test]
    fn test_attach_client_is_idempotent() {
        let mut pet = test_pet(1);
        pet.attach_client(test_client(5, "Carmen"));
        pet.attach_client(test_client(5, "Carmen"));

        assert_eq!(pet.clients.len(), 1);
    }

    #[test]
    fn test_detach_client_removes_only_that_client() {
        let mut pet = test_pet(1);
        pet.attach_client(test_client(5, "Carmen"));
        pet.attach_client(test_client(6, "Jorge"));

        pet.detach_client(5);

        assert_eq!(pet.clients.len(), 1);
        assert_eq!(pet.clients[0].account.id, 6);
    }

    #[test]
    fn test_detach_client_missing_is_noop() {
        let mut pet = test_pet(1);
        pet.attach_client(test_client(5, "Carmen"));

        pet.detach_client(99);

        assert_eq!(pet.clients.len(), 1);
    }
}
