//! # Domain Entities
//!
//! Core entities of the veterinary clinic domain. All entities map
//! directly to their corresponding database tables.
//!
//! ## Account Entities
//!
//! Every login-capable account type embeds [`AppUser`] (joined-table
//! inheritance in the schema):
//!
//! - **Client**: pet owner consuming the application
//! - **Vet**: practicing veterinarian, optionally employed by a clinic
//! - **VetEntity**: veterinary clinic managing its vets' accounts
//!
//! ## Clinical Entities
//!
//! - **Pet**: registered animal, shared with clients via `client_pets`
//! - **Appointment**: booked visit linking client, pet and vet
//! - **Report**: clinical outcome of a visit
//!
//! ## Supporting Entities
//!
//! - **Role**: name-keyed role rows linked through `users_roles`
//! - **Session**: refresh-token sessions for the auth service
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access
//! operations. These traits are implemented in the infrastructure layer,
//! following the dependency inversion principle.

mod app_user;
mod appointment;
mod client;
mod pet;
mod report;
mod role;
mod session;
mod vet;
mod vet_entity;

pub use app_user::{AppUser, AppUserRepository, NewAppUser};
pub use appointment::{Appointment, AppointmentRepository, NewAppointment};
pub use client::{Client, ClientRepository, ClientSummary, NewClient};
pub use pet::{NewPet, Pet, PetRepository, PetSpecies, PetSummary};
pub use report::{NewReport, Report, ReportRepository};
pub use role::{Role, RoleName};
pub use session::{Session, SessionRepository};
pub use vet::{NewVet, Vet, VetRepository, VetSummary};
pub use vet_entity::{NewVetEntity, VetEntity, VetEntityRepository, VetEntitySummary};

#[cfg(test)]
pub use app_user::MockAppUserRepository;
#[cfg(test)]
pub use appointment::MockAppointmentRepository;
#[cfg(test)]
pub use client::MockClientRepository;
#[cfg(test)]
pub use pet::MockPetRepository;
#[cfg(test)]
pub use report::MockReportRepository;
#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use vet::MockVetRepository;
#[cfg(test)]
pub use vet_entity::MockVetEntityRepository;

use serde::Deserialize;

/// Page request translated to LIMIT/OFFSET by the repositories.
///
/// Mirrors the paging query parameters accepted by every listing endpoint.
/// Sizes are capped to keep a single request from dragging the whole table
/// over the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Page {
    /// Zero-based page index
    #[serde(default)]
    pub page: u32,
    /// Page size (default 20, capped at 100)
    #[serde(default = "Page::default_size")]
    pub size: u32,
}

impl Page {
    pub const MAX_SIZE: u32 = 100;

    fn default_size() -> u32 {
        20
    }

    /// LIMIT value with the size cap applied.
    pub fn limit(&self) -> i64 {
        self.size.min(Self::MAX_SIZE) as i64
    }

    /// OFFSET value with the size cap applied.
    pub fn offset(&self) -> i64 {
        self.page as i64 * self.limit()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::default_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn test_default_page() {
        let page = Page::default();
        assert_eq!(page.limit(), 20);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset_advances_by_limit() {
        let page = Page { page: 3, size: 25 };
        assert_eq!(page.limit(), 25);
        assert_eq!(page.offset(), 75);
    }

    #[test]
    fn test_size_is_capped() {
        let page = Page { page: 1, size: 5000 };
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 100);
    }
}
