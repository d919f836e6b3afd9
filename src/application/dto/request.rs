//! Request DTOs
//!
//! Data structures for API request bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::domain::PetSpecies;
use crate::shared::validation::{validate_cif, validate_national_id_document, validate_phone_number};

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 20, message = "Username must be 1-20 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Client registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterClientRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2-20 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = validate_national_id_document))]
    pub national_id_document: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    pub birthdate: Option<NaiveDate>,

    #[validate(length(max = 100, message = "Address must be at most 100 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,
}

/// Vet registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterVetRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2-20 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = validate_national_id_document))]
    pub national_id_document: String,

    #[validate(length(min = 1, max = 20, message = "Registration number must be 1-20 characters"))]
    pub registration_number: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Employing clinic; must exist when given
    pub vet_entity_id: Option<i64>,
}

/// Vet entity registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterVetEntityRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2-20 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = validate_cif))]
    pub cif: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,
}

/// Client update request. Username, password and NIF/NIE are immutable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub enabled: bool,

    #[validate(length(max = 100, message = "Address must be at most 100 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,
}

/// Vet update request. Username, password and identity documents are
/// immutable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub enabled: bool,

    /// Employing clinic; must exist when given
    pub vet_entity_id: Option<i64>,
}

/// Vet entity update request. Username, password and CIF are immutable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVetEntityRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub enabled: bool,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,

    #[validate(custom(function = validate_phone_number))]
    pub phone_number: Option<String>,
}

fn default_alive() -> bool {
    true
}

/// Pet create/update request
#[derive(Debug, Deserialize, Validate)]
pub struct PetRequest {
    #[validate(length(max = 15, message = "Chip number must be at most 15 characters"))]
    pub chip_number: Option<String>,

    pub species: PetSpecies,

    #[validate(length(max = 50, message = "Breed must be at most 50 characters"))]
    pub breed: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    pub birthdate: Option<NaiveDate>,

    #[serde(default = "default_alive")]
    pub alive: bool,

    pub castrated: Option<bool>,
}

/// Appointment create/update request
#[derive(Debug, Deserialize)]
pub struct AppointmentRequest {
    pub client_id: i64,
    pub pet_id: i64,
    pub vet_id: i64,
    pub appointment_date: DateTime<Utc>,
}

/// Report create/update request
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub pet_id: i64,
    pub vet_id: i64,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub report_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_request(doc: &str, phone: Option<&str>) -> RegisterClientRequest {
        RegisterClientRequest {
            username: "carmen".into(),
            password: "supersecret".into(),
            email: Some("carmen@example.com".into()),
            national_id_document: doc.into(),
            name: "Carmen Pérez".into(),
            birthdate: None,
            address: None,
            phone_number: phone.map(Into::into),
        }
    }

    #[test]
    fn test_register_client_accepts_valid_payload() {
        assert!(client_request("12345678Z", Some("612345678")).validate().is_ok());
    }

    #[test]
    fn test_register_client_rejects_bad_document() {
        assert!(client_request("12345678z", None).validate().is_err());
    }

    #[test]
    fn test_register_client_rejects_bad_phone() {
        assert!(client_request("12345678Z", Some("1234")).validate().is_err());
    }

    #[test]
    fn test_pet_request_alive_defaults_to_true() {
        let pet: PetRequest =
            serde_json::from_str(r#"{"species": "dog", "name": "Luna"}"#).expect("deserializable");
        assert!(pet.alive);
    }

    #[test]
    fn test_pet_request_rejects_unknown_species() {
        let result: Result<PetRequest, _> =
            serde_json::from_str(r#"{"species": "dragon", "name": "Luna"}"#);
        assert!(result.is_err());
    }
}
