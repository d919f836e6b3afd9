//! Response DTOs
//!
//! Data structures for API response bodies, with conversions from the
//! domain entities they flatten.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::application::services::AuthTokens;
use crate::domain::{
    Appointment, Client, ClientSummary, Pet, PetSummary, Report, Vet, VetEntity, VetEntitySummary,
    VetSummary,
};

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// Account fields shared by every registered user response
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub enabled: bool,
    pub roles: Vec<String>,
}

/// Client profile as exposed by query endpoints
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub national_id_document: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.account.id,
            national_id_document: client.national_id_document,
            name: client.name,
            birthdate: client.birthdate,
            address: client.address,
            phone_number: client.phone_number,
        }
    }
}

/// Registered client, account fields included
#[derive(Debug, Serialize)]
pub struct ClientAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub national_id_document: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<Client> for ClientAccountResponse {
    fn from(client: Client) -> Self {
        Self {
            account: AccountResponse {
                id: client.account.id,
                username: client.account.username,
                email: client.account.email,
                enabled: client.account.enabled,
                roles: client.account.roles.into_iter().map(|r| r.name).collect(),
            },
            national_id_document: client.national_id_document,
            name: client.name,
            birthdate: client.birthdate,
            address: client.address,
            phone_number: client.phone_number,
        }
    }
}

/// Vet entity profile
#[derive(Debug, Serialize)]
pub struct VetEntityResponse {
    pub id: i64,
    pub cif: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<VetEntity> for VetEntityResponse {
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

impl From<VetEntitySummary> for VetEntityResponse {
    fn from(summary: VetEntitySummary) -> Self {
        Self {
            id: summary.id,
            cif: summary.cif,
            name: summary.name,
            address: summary.address,
            phone_number: summary.phone_number,
        }
    }
}

/// Registered vet entity, account fields included
#[derive(Debug, Serialize)]
pub struct VetEntityAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub cif: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<VetEntity> for VetEntityAccountResponse {
    fn from(vet_entity: VetEntity) -> Self {
        Self {
            account: AccountResponse {
                id: vet_entity.account.id,
                username: vet_entity.account.username,
                email: vet_entity.account.email,
                enabled: vet_entity.account.enabled,
                roles: vet_entity.account.roles.into_iter().map(|r| r.name).collect(),
            },
            cif: vet_entity.cif,
            name: vet_entity.name,
            address: vet_entity.address,
            phone_number: vet_entity.phone_number,
        }
    }
}

/// Vet profile
#[derive(Debug, Serialize)]
pub struct VetResponse {
    pub id: i64,
    pub national_id_document: String,
    pub registration_number: String,
    pub name: String,
    pub vet_entity: Option<VetEntityResponse>,
}

impl From<Vet> for VetResponse {
    fn from(vet: Vet) -> Self {
        Self {
            id: vet.account.id,
            national_id_document: vet.national_id_document,
            registration_number: vet.registration_number,
            name: vet.name,
            vet_entity: vet.vet_entity.map(VetEntityResponse::from),
        }
    }
}

/// Registered vet, account fields included
#[derive(Debug, Serialize)]
pub struct VetAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub national_id_document: String,
    pub registration_number: String,
    pub name: String,
    pub vet_entity: Option<VetEntityResponse>,
}

impl From<Vet> for VetAccountResponse {
    fn from(vet: Vet) -> Self {
        Self {
            account: AccountResponse {
                id: vet.account.id,
                username: vet.account.username,
                email: vet.account.email,
                enabled: vet.account.enabled,
                roles: vet.account.roles.into_iter().map(|r| r.name).collect(),
            },
            national_id_document: vet.national_id_document,
            registration_number: vet.registration_number,
            name: vet.name,
            vet_entity: vet.vet_entity.map(VetEntityResponse::from),
        }
    }
}

/// Pet with its associated clients
#[derive(Debug, Serialize)]
pub struct PetResponse {
    pub id: i64,
    pub chip_number: Option<String>,
    pub species: String,
    pub breed: Option<String>,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub alive: bool,
    pub castrated: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<ClientResponse>,
}

impl From<Pet> for PetResponse {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            chip_number: pet.chip_number,
            species: pet.species.as_str().to_string(),
            breed: pet.breed,
            name: pet.name,
            birthdate: pet.birthdate,
            alive: pet.alive,
            castrated: pet.castrated,
            clients: pet.clients.into_iter().map(ClientResponse::from).collect(),
        }
    }
}

/// Reduced client shape used inside appointment listings
#[derive(Debug, Serialize)]
pub struct ClientSummaryResponse {
    pub id: i64,
    pub name: String,
}

impl From<ClientSummary> for ClientSummaryResponse {
    fn from(summary: ClientSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
        }
    }
}

/// Reduced pet shape used inside appointment listings
#[derive(Debug, Serialize)]
pub struct PetSummaryResponse {
    pub id: i64,
    pub name: String,
    pub alive: bool,
}

impl From<PetSummary> for PetSummaryResponse {
    fn from(summary: PetSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            alive: summary.alive,
        }
    }
}

/// Reduced vet shape used inside appointment and report listings
#[derive(Debug, Serialize)]
pub struct VetSummaryResponse {
    pub id: i64,
    pub name: String,
    pub vet_entity: Option<VetEntityResponse>,
}

impl From<VetSummary> for VetSummaryResponse {
    fn from(summary: VetSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            vet_entity: summary.vet_entity.map(VetEntityResponse::from),
        }
    }
}

/// Booked appointment
#[derive(Debug, Serialize)]
pub struct AppointmentResponse {
    pub id: i64,
    pub client: ClientSummaryResponse,
    pub pet: PetSummaryResponse,
    pub vet: VetSummaryResponse,
    pub appointment_date: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id,
            client: appointment.client.into(),
            pet: appointment.pet.into(),
            vet: appointment.vet.into(),
            appointment_date: appointment.appointment_date,
        }
    }
}

/// Clinical report
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub report_date: NaiveDate,
    pub pet: PetResponse,
    pub vet: VetSummaryResponse,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            reason: report.reason,
            diagnosis: report.diagnosis,
            treatment: report.treatment,
            report_date: report.report_date,
            pet: report.pet.into(),
            vet: report.vet.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUser, PetSpecies, Role};
    use pretty_assertions::assert_eq;

    fn test_client() -> Client {
        Client {
            account: AppUser {
                id: 4,
                username: "carmen".to_string(),
                email: Some("carmen@example.com".to_string()),
                roles: vec![Role {
                    id: 1,
                    name: "ROLE_CLIENT".to_string(),
                }],
                ..AppUser::default()
            },
            national_id_document: "12345678Z".to_string(),
            name: "Carmen Pérez".to_string(),
            birthdate: None,
            address: None,
            phone_number: Some("612345678".to_string()),
            pets: Vec::new(),
        }
    }

    #[test]
    fn test_client_response_flattens_account_id() {
        let response = ClientResponse::from(test_client());
        assert_eq!(response.id, 4);
        assert_eq!(response.national_id_document, "12345678Z");
    }

    #[test]
    fn test_client_account_response_carries_roles() {
        let response = ClientAccountResponse::from(test_client());
        assert_eq!(response.account.roles, vec!["ROLE_CLIENT"]);
        assert_eq!(response.account.username, "carmen");
    }

    #[test]
    fn test_pet_response_omits_empty_clients() {
        let pet = Pet {
            id: 9,
            chip_number: None,
            species: PetSpecies::Cat,
            breed: None,
            name: "Michi".to_string(),
            birthdate: None,
            alive: true,
            castrated: None,
            clients: Vec::new(),
        };

        let serialized = serde_json::to_string(&PetResponse::from(pet)).expect("serializable");
        assert!(!serialized.contains("clients"));
        assert!(serialized.contains("\"species\":\"cat\""));
    }
}
