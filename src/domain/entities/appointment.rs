//! Appointment entity and repository trait.
//!
//! An appointment is booked by a client for one of their pets with a
//! specific vet. Queries only ever look forward: once an appointment's
//! time has passed the visit is expected to produce a report (or nothing,
//! on no-show), so past appointments are not searchable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::client::ClientSummary;
use super::pet::PetSummary;
use super::vet::VetSummary;
use super::Page;

/// A booked veterinary visit.
///
/// Maps to the `appointment` table with its participants joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,

    pub client: ClientSummary,

    pub pet: PetSummary,

    pub vet: VetSummary,

    pub appointment_date: DateTime<Utc>,
}

/// Data for booking or rescheduling an appointment. The referenced client,
/// pet and vet must exist.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub client_id: i64,
    pub pet_id: i64,
    pub vet_id: i64,
    pub appointment_date: DateTime<Utc>,
}

/// Repository trait for appointment data access.
///
/// The `upcoming_*` queries return appointments strictly after the current
/// timestamp, ordered by date ascending. The `on_day` queries take an
/// inclusive start/end pair covering one calendar day.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Find an appointment by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, AppError>;

    /// Upcoming appointments for any pet associated with the client.
    async fn find_upcoming_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError>;

    /// Upcoming appointments assigned to a vet.
    async fn find_upcoming_by_vet_id(
        &self,
        vet_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError>;

    /// Appointments assigned to a vet within a day range.
    async fn find_by_vet_id_and_day(
        &self,
        vet_id: i64,
        start_of_day: DateTime<Utc>,
        end_of_day: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError>;

    /// Upcoming appointments assigned to any vet of a clinic.
    async fn find_upcoming_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError>;

    /// Appointments assigned to any vet of a clinic within a day range.
    async fn find_by_vet_entity_id_and_day(
        &self,
        vet_entity_id: i64,
        start_of_day: DateTime<Utc>,
        end_of_day: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError>;

    /// Book an appointment.
    async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, AppError>;

    /// Replace an appointment's participants and date.
    async fn update(&self, id: i64, appointment: &NewAppointment)
        -> Result<Appointment, AppError>;

    /// Cancel an appointment.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
