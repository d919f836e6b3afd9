//! Vet entity (veterinary clinic) entity and repository trait.
//!
//! A vet entity is a business account: any kind of veterinary clinic,
//! responsible for managing application access for its employed vets.
//! Subtype of `app_user`, mapped to the `vet_entity` table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::app_user::{AppUser, NewAppUser};
use super::Page;

/// A veterinary clinic account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetEntity {
    #[serde(flatten)]
    pub account: AppUser,

    /// CIF business tax identifier (unique, 9 characters)
    pub cif: String,

    /// Clinic name
    pub name: String,

    pub address: Option<String>,

    /// Clinic phone number (unique, 9 digits)
    pub phone_number: Option<String>,
}

/// Clinic profile data carried by vet records and listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetEntitySummary {
    pub id: i64,
    pub cif: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<VetEntity> for VetEntitySummary {
    fn from(vet_entity: VetEntity) -> Self {
        Self {
            id: vet_entity.account.id,
            cif: vet_entity.cif,
            name: vet_entity.name,
            address: vet_entity.address,
            phone_number: vet_entity.phone_number,
        }
    }
}

/// Data for creating a vet entity account.
#[derive(Debug, Clone)]
pub struct NewVetEntity {
    pub account: NewAppUser,
    pub cif: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Repository trait for vet entity data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VetEntityRepository: Send + Sync {
    /// Find a vet entity by its account id.
    async fn find_by_id(&self, id: i64) -> Result<Option<VetEntity>, AppError>;

    /// Find vet entities whose name contains the given fragment.
    async fn find_by_name_containing(
        &self,
        name: &str,
        page: Page,
    ) -> Result<Vec<VetEntity>, AppError>;

    /// Whether a vet entity with the given id exists.
    async fn exists(&self, id: i64) -> Result<bool, AppError>;

    /// Create the base account row and the vet entity row in one
    /// transaction.
    async fn create(&self, vet_entity: &NewVetEntity) -> Result<VetEntity, AppError>;

    /// Update account fields (email, enabled) and clinic profile fields
    /// (name, address, phone number). Username, password and CIF are
    /// immutable here.
    async fn update(&self, vet_entity: &VetEntity) -> Result<VetEntity, AppError>;
}
