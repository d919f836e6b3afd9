//! Vet entity and repository trait.
//!
//! A vet is a practicing veterinarian account, optionally employed by a
//! vet entity (clinic). Subtype of `app_user`, mapped to the `vet` table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::app_user::{AppUser, NewAppUser};
use super::vet_entity::VetEntitySummary;
use super::Page;

/// A veterinarian account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vet {
    #[serde(flatten)]
    pub account: AppUser,

    /// NIF/NIE national identity document (unique, 9 characters)
    pub national_id_document: String,

    /// Professional registration number (unique, at most 20 characters).
    /// Formats vary by region (e.g. 15/V-6789, 41/12345-V, 03C1234), so
    /// only the length is constrained.
    pub registration_number: String,

    /// Real name
    pub name: String,

    /// Employing clinic, when any
    pub vet_entity: Option<VetEntitySummary>,
}

/// Vet data carried by appointment and report listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetSummary {
    pub id: i64,
    pub name: String,
    pub vet_entity: Option<VetEntitySummary>,
}

impl From<Vet> for VetSummary {
    fn from(vet: Vet) -> Self {
        Self {
            id: vet.account.id,
            name: vet.name,
            vet_entity: vet.vet_entity,
        }
    }
}

/// Data for registering a vet account.
#[derive(Debug, Clone)]
pub struct NewVet {
    pub account: NewAppUser,
    pub national_id_document: String,
    pub registration_number: String,
    pub name: String,
    pub vet_entity_id: Option<i64>,
}

/// Repository trait for vet data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VetRepository: Send + Sync {
    /// Find a vet by its account id, employing clinic included.
    async fn find_by_id(&self, id: i64) -> Result<Option<Vet>, AppError>;

    /// Find the vet assigned to an appointment.
    async fn find_by_appointment_id(&self, appointment_id: i64) -> Result<Option<Vet>, AppError>;

    /// All vets employed by a clinic.
    async fn find_by_vet_entity_id(&self, vet_entity_id: i64, page: Page)
        -> Result<Vec<Vet>, AppError>;

    /// Vets of a clinic whose name contains the given fragment
    /// (case-insensitive).
    async fn find_by_name_and_vet_entity_id(
        &self,
        name: &str,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Vet>, AppError>;

    /// Whether a vet with the given id exists.
    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    /// Create the base account row, the vet row and the role links in one
    /// transaction.
    async fn create(&self, vet: &NewVet) -> Result<Vet, AppError>;

    /// Update account fields (email, enabled) and the employing clinic.
    /// Username, password and identity documents are immutable here.
    async fn update(&self, vet: &Vet) -> Result<Vet, AppError>;
}
