//! Client entity and repository trait.
//!
//! A client is a consumer account: the pet owner using the application.
//! Subtype of `app_user`, mapped to the `client` table, associated with
//! pets through the `client_pets` join table.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::app_user::{AppUser, NewAppUser};
use super::pet::Pet;

/// A client (pet owner) account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(flatten)]
    pub account: AppUser,

    /// NIF/NIE national identity document (unique, 9 characters)
    pub national_id_document: String,

    /// Real name
    pub name: String,

    pub birthdate: Option<NaiveDate>,

    pub address: Option<String>,

    /// Phone number (9 digits)
    pub phone_number: Option<String>,

    /// Pets this client has access to. Loaded on demand; empty when the
    /// client comes from a lookup that does not hydrate pets.
    #[serde(default)]
    pub pets: Vec<Pet>,
}

impl Client {
    /// Mirror one side of the pet association. The other side is
    /// `Pet::attach_client`.
    pub fn attach_pet(&mut self, pet: Pet) {
        if !self.pets.iter().any(|p| p.id == pet.id) {
            self.pets.push(pet);
        }
    }

    /// Remove one side of the pet association. The other side is
    /// `Pet::detach_client`.
    pub fn detach_pet(&mut self, pet_id: i64) {
        self.pets.retain(|p| p.id != pet_id);
    }
}

/// Client data carried by appointment listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
}

/// Data for registering a client account.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub account: NewAppUser,
    pub national_id_document: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Repository trait for client data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find a client by its account id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError>;

    /// Find a client by NIF/NIE.
    async fn find_by_national_id_document(
        &self,
        national_id_document: &str,
    ) -> Result<Option<Client>, AppError>;

    /// All clients associated with a pet.
    async fn find_by_pet_id(&self, pet_id: i64) -> Result<Vec<Client>, AppError>;

    /// Create the base account row, the client row and the role links in
    /// one transaction.
    async fn create(&self, client: &NewClient) -> Result<Client, AppError>;

    /// Update account fields (email, enabled) and contact fields (address,
    /// phone number). Username, password, NIF/NIE and pet associations are
    /// immutable here.
    async fn update(&self, client: &Client) -> Result<Client, AppError>;
}
