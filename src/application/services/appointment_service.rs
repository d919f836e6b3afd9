//! Appointment Service
//!
//! Booking and querying of veterinary appointments. Every referenced
//! participant must resolve before an appointment is persisted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::domain::{
    Appointment, AppointmentRepository, ClientRepository, NewAppointment, Page, PetRepository,
    VetRepository,
};

/// Appointment service trait
#[async_trait]
pub trait AppointmentService: Send + Sync {
    /// Upcoming appointments for any pet associated with the client
    async fn find_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    /// Upcoming appointments assigned to a vet
    async fn find_by_vet_id(
        &self,
        vet_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    /// Appointments assigned to a vet on a calendar day
    async fn find_by_vet_id_and_date(
        &self,
        vet_id: i64,
        date: NaiveDate,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    /// Upcoming appointments assigned to any vet of a clinic
    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    /// Appointments assigned to any vet of a clinic on a calendar day
    async fn find_by_vet_entity_id_and_date(
        &self,
        vet_entity_id: i64,
        date: NaiveDate,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    /// Book an appointment
    async fn save(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError>;

    /// Reschedule / reassign an appointment
    async fn update(
        &self,
        id: i64,
        appointment: NewAppointment,
    ) -> Result<Appointment, AppointmentError>;

    /// Cancel an appointment
    async fn delete(&self, id: i64) -> Result<(), AppointmentError>;
}

/// Appointment service errors
#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment with id {0} not found")]
    NotFound(i64),

    #[error("Vet with id {0} not found")]
    VetNotFound(i64),

    #[error("Pet with id {0} not found")]
    PetNotFound(i64),

    #[error("Client with id {0} not found")]
    ClientNotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Inclusive day bounds covering one calendar day in UTC.
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(
        &date.and_time(NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).expect("valid time")),
    );
    (start, end)
}

/// AppointmentService implementation
pub struct AppointmentServiceImpl<A, P, C, V>
where
    A: AppointmentRepository,
    P: PetRepository,
    C: ClientRepository,
    V: VetRepository,
{
    appointment_repo: Arc<A>,
    pet_repo: Arc<P>,
    client_repo: Arc<C>,
    vet_repo: Arc<V>,
}

impl<A, P, C, V> AppointmentServiceImpl<A, P, C, V>
where
    A: AppointmentRepository,
    P: PetRepository,
    C: ClientRepository,
    V: VetRepository,
{
    pub fn new(
        appointment_repo: Arc<A>,
        pet_repo: Arc<P>,
        client_repo: Arc<C>,
        vet_repo: Arc<V>,
    ) -> Self {
        Self {
            appointment_repo,
            pet_repo,
            client_repo,
            vet_repo,
        }
    }

    /// Every participant must exist before a booking touches the database.
    async fn check_participants(
        &self,
        appointment: &NewAppointment,
    ) -> Result<(), AppointmentError> {
        let vet_exists = self
            .vet_repo
            .exists(appointment.vet_id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))?;
        if !vet_exists {
            return Err(AppointmentError::VetNotFound(appointment.vet_id));
        }

        self.pet_repo
            .find_by_id(appointment.pet_id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))?
            .ok_or(AppointmentError::PetNotFound(appointment.pet_id))?;

        self.client_repo
            .find_by_id(appointment.client_id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))?
            .ok_or(AppointmentError::ClientNotFound(appointment.client_id))?;

        Ok(())
    }
}

#[async_trait]
impl<A, P, C, V> AppointmentService for AppointmentServiceImpl<A, P, C, V>
where
    A: AppointmentRepository + 'static,
    P: PetRepository + 'static,
    C: ClientRepository + 'static,
    V: VetRepository + 'static,
{
    async fn find_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointment_repo
            .find_upcoming_by_client_id(client_id, page)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn find_by_vet_id(
        &self,
        vet_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointment_repo
            .find_upcoming_by_vet_id(vet_id, page)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn find_by_vet_id_and_date(
        &self,
        vet_id: i64,
        date: NaiveDate,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let (start_of_day, end_of_day) = day_bounds(date);

        self.appointment_repo
            .find_by_vet_id_and_day(vet_id, start_of_day, end_of_day, page)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn find_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointment_repo
            .find_upcoming_by_vet_entity_id(vet_entity_id, page)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn find_by_vet_entity_id_and_date(
        &self,
        vet_entity_id: i64,
        date: NaiveDate,
        page: Page,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let (start_of_day, end_of_day) = day_bounds(date);

        self.appointment_repo
            .find_by_vet_entity_id_and_day(vet_entity_id, start_of_day, end_of_day, page)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn save(&self, appointment: NewAppointment) -> Result<Appointment, AppointmentError> {
        self.check_participants(&appointment).await?;

        self.appointment_repo
            .create(&appointment)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn update(
        &self,
        id: i64,
        appointment: NewAppointment,
    ) -> Result<Appointment, AppointmentError> {
        self.appointment_repo
            .find_by_id(id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))?
            .ok_or(AppointmentError::NotFound(id))?;

        self.check_participants(&appointment).await?;

        self.appointment_repo
            .update(id, &appointment)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        self.appointment_repo
            .find_by_id(id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))?
            .ok_or(AppointmentError::NotFound(id))?;

        self.appointment_repo
            .delete(id)
            .await
            .map_err(|e| AppointmentError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AppUser, Client, ClientSummary, MockAppointmentRepository, MockClientRepository,
        MockPetRepository, MockVetRepository, Pet, PetSpecies, PetSummary, VetSummary,
    };
    use mockall::predicate::eq;

    fn stored_appointment(id: i64) -> Appointment {
        Appointment {
            id,
            client: ClientSummary {
                id: 1,
                name: "Carmen Pérez".into(),
            },
            pet: PetSummary {
                id: 2,
                name: "Luna".into(),
                alive: true,
            },
            vet: VetSummary {
                id: 3,
                name: "Ana García".into(),
                vet_entity: None,
            },
            appointment_date: Utc::now(),
        }
    }

    fn stored_pet(id: i64) -> Pet {
        Pet {
            id,
            chip_number: None,
            species: PetSpecies::Dog,
            breed: None,
            name: "Luna".into(),
            birthdate: None,
            alive: true,
            castrated: None,
            clients: Vec::new(),
        }
    }

    fn stored_client(id: i64) -> Client {
        Client {
            account: AppUser {
                id,
                ..AppUser::default()
            },
            national_id_document: "12345678Z".into(),
            name: "Carmen Pérez".into(),
            birthdate: None,
            address: None,
            phone_number: None,
            pets: Vec::new(),
        }
    }

    fn booking() -> NewAppointment {
        NewAppointment {
            client_id: 1,
            pet_id: 2,
            vet_id: 3,
            appointment_date: Utc::now(),
        }
    }

    fn service(
        appointment_repo: MockAppointmentRepository,
        pet_repo: MockPetRepository,
        client_repo: MockClientRepository,
        vet_repo: MockVetRepository,
    ) -> AppointmentServiceImpl<
        MockAppointmentRepository,
        MockPetRepository,
        MockClientRepository,
        MockVetRepository,
    > {
        AppointmentServiceImpl::new(
            Arc::new(appointment_repo),
            Arc::new(pet_repo),
            Arc::new(client_repo),
            Arc::new(vet_repo),
        )
    }

    #[test]
    fn test_day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");
        let (start, end) = day_bounds(date);

        assert_eq!(start.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert!(end > start);
        assert_eq!(end.date_naive(), date);
        assert_eq!(end.time().format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[tokio::test]
    async fn test_save_requires_existing_vet() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().with(eq(3)).returning(|_| Ok(false));

        let service = service(
            MockAppointmentRepository::new(),
            MockPetRepository::new(),
            MockClientRepository::new(),
            vet_repo,
        );

        let result = service.save(booking()).await;
        assert!(matches!(result, Err(AppointmentError::VetNotFound(3))));
    }

    #[tokio::test]
    async fn test_save_requires_existing_pet() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().returning(|_| Ok(true));

        let mut pet_repo = MockPetRepository::new();
        pet_repo.expect_find_by_id().with(eq(2)).returning(|_| Ok(None));

        let service = service(
            MockAppointmentRepository::new(),
            pet_repo,
            MockClientRepository::new(),
            vet_repo,
        );

        let result = service.save(booking()).await;
        assert!(matches!(result, Err(AppointmentError::PetNotFound(2))));
    }

    #[tokio::test]
    async fn test_save_requires_existing_client() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().returning(|_| Ok(true));

        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));

        let mut client_repo = MockClientRepository::new();
        client_repo.expect_find_by_id().with(eq(1)).returning(|_| Ok(None));

        let service = service(
            MockAppointmentRepository::new(),
            pet_repo,
            client_repo,
            vet_repo,
        );

        let result = service.save(booking()).await;
        assert!(matches!(result, Err(AppointmentError::ClientNotFound(1))));
    }

    #[tokio::test]
    async fn test_save_books_when_all_participants_resolve() {
        let mut vet_repo = MockVetRepository::new();
        vet_repo.expect_exists().returning(|_| Ok(true));

        let mut pet_repo = MockPetRepository::new();
        pet_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_pet(id))));

        let mut client_repo = MockClientRepository::new();
        client_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored_client(id))));

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_create()
            .times(1)
            .returning(|_| Ok(stored_appointment(10)));

        let service = service(appointment_repo, pet_repo, client_repo, vet_repo);

        let appointment = service.save(booking()).await.expect("booking succeeds");
        assert_eq!(appointment.id, 10);
    }

    #[tokio::test]
    async fn test_update_missing_appointment_fails() {
        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(
            appointment_repo,
            MockPetRepository::new(),
            MockClientRepository::new(),
            MockVetRepository::new(),
        );

        let result = service.update(77, booking()).await;
        assert!(matches!(result, Err(AppointmentError::NotFound(77))));
    }

    #[tokio::test]
    async fn test_delete_missing_appointment_fails() {
        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service(
            appointment_repo,
            MockPetRepository::new(),
            MockClientRepository::new(),
            MockVetRepository::new(),
        );

        let result = service.delete(77).await;
        assert!(matches!(result, Err(AppointmentError::NotFound(77))));
    }

    #[tokio::test]
    async fn test_date_query_passes_day_bounds_to_the_repository() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
        let (start, end) = day_bounds(date);

        let mut appointment_repo = MockAppointmentRepository::new();
        appointment_repo
            .expect_find_by_vet_id_and_day()
            .with(
                eq(3),
                eq(start),
                eq(end),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(vec![]));

        let service = service(
            appointment_repo,
            MockPetRepository::new(),
            MockClientRepository::new(),
            MockVetRepository::new(),
        );

        service
            .find_by_vet_id_and_date(3, date, Page::default())
            .await
            .expect("query succeeds");
    }
}
