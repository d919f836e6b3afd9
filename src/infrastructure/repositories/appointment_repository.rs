//! Appointment Repository Implementation
//!
//! PostgreSQL implementation of the AppointmentRepository trait.
//! Listings join the three participants so a single round trip produces
//! the full appointment shape.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{
    Appointment, AppointmentRepository, ClientSummary, NewAppointment, Page, PetSummary,
    VetEntitySummary, VetSummary,
};
use crate::shared::error::AppError;

const SELECT_APPOINTMENT: &str = r#"
    SELECT a.id, a.appointment_date,
           c.id AS client_id, c.name AS client_name,
           p.id AS pet_id, p.name AS pet_name, p.alive AS pet_alive,
           v.id AS vet_id, v.name AS vet_name,
           ve.id AS vet_entity_id, ve.cif AS vet_entity_cif, ve.name AS vet_entity_name,
           ve.address AS vet_entity_address, ve.phone_number AS vet_entity_phone_number
    FROM appointment a
    JOIN client c ON c.id = a.client_id
    JOIN pet p ON p.id = a.pet_id
    JOIN vet v ON v.id = a.vet_id
    LEFT JOIN vet_entity ve ON ve.id = v.vet_entity_id
"#;

/// Database row matching `appointment` with participants joined.
#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    appointment_date: DateTime<Utc>,
    client_id: i64,
    client_name: String,
    pet_id: i64,
    pet_name: String,
    pet_alive: bool,
    vet_id: i64,
    vet_name: String,
    vet_entity_id: Option<i64>,
    vet_entity_cif: Option<String>,
    vet_entity_name: Option<String>,
    vet_entity_address: Option<String>,
    vet_entity_phone_number: Option<String>,
}

impl AppointmentRow {
    /// Convert database row to the domain Appointment entity.
    fn into_appointment(self) -> Appointment {
        let vet_entity = self.vet_entity_id.map(|id| VetEntitySummary {
            id,
            cif: self.vet_entity_cif.unwrap_or_default(),
            name: self.vet_entity_name.unwrap_or_default(),
            address: self.vet_entity_address,
            phone_number: self.vet_entity_phone_number,
        });

        Appointment {
            id: self.id,
            client: ClientSummary {
                id: self.client_id,
                name: self.client_name,
            },
            pet: PetSummary {
                id: self.pet_id,
                name: self.pet_name,
                alive: self.pet_alive,
            },
            vet: VetSummary {
                id: self.vet_id,
                name: self.vet_name,
                vet_entity,
            },
            appointment_date: self.appointment_date,
        }
    }
}

/// PostgreSQL appointment repository implementation.
#[derive(Clone)]
pub struct PgAppointmentRepository {
    pool: PgPool,
}

impl PgAppointmentRepository {
    /// Create a new PgAppointmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get(&self, id: i64) -> Result<Appointment, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment with id {} not found", id)))
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    /// Find an appointment by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, AppError> {
        let row =
            sqlx::query_as::<_, AppointmentRow>(&format!("{SELECT_APPOINTMENT} WHERE a.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| r.into_appointment()))
    }

    /// Upcoming appointments for any pet associated with the client.
    async fn find_upcoming_by_client_id(
        &self,
        client_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            {SELECT_APPOINTMENT}
            WHERE EXISTS (
                SELECT 1 FROM client_pets cp
                WHERE cp.pet_id = a.pet_id AND cp.client_id = $1
            )
              AND a.appointment_date > NOW()
            ORDER BY a.appointment_date ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(client_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_appointment()).collect())
    }

    /// Upcoming appointments assigned to a vet.
    async fn find_upcoming_by_vet_id(
        &self,
        vet_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            {SELECT_APPOINTMENT}
            WHERE a.vet_id = $1 AND a.appointment_date > NOW()
            ORDER BY a.appointment_date ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(vet_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_appointment()).collect())
    }

    /// Appointments assigned to a vet within a day range.
    async fn find_by_vet_id_and_day(
        &self,
        vet_id: i64,
        start_of_day: DateTime<Utc>,
        end_of_day: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            {SELECT_APPOINTMENT}
            WHERE a.vet_id = $1 AND a.appointment_date BETWEEN $2 AND $3
            ORDER BY a.appointment_date ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(vet_id)
        .bind(start_of_day)
        .bind(end_of_day)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_appointment()).collect())
    }

    /// Upcoming appointments assigned to any vet of a clinic.
    async fn find_upcoming_by_vet_entity_id(
        &self,
        vet_entity_id: i64,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            {SELECT_APPOINTMENT}
            WHERE v.vet_entity_id = $1 AND a.appointment_date > NOW()
            ORDER BY a.appointment_date ASC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(vet_entity_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_appointment()).collect())
    }

    /// Appointments assigned to any vet of a clinic within a day range.
    async fn find_by_vet_entity_id_and_day(
        &self,
        vet_entity_id: i64,
        start_of_day: DateTime<Utc>,
        end_of_day: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Appointment>, AppError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            {SELECT_APPOINTMENT}
            WHERE v.vet_entity_id = $1 AND a.appointment_date BETWEEN $2 AND $3
            ORDER BY a.appointment_date ASC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(vet_entity_id)
        .bind(start_of_day)
        .bind(end_of_day)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_appointment()).collect())
    }

    /// Book an appointment.
    async fn create(&self, appointment: &NewAppointment) -> Result<Appointment, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO appointment (client_id, pet_id, vet_id, appointment_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(appointment.client_id)
        .bind(appointment.pet_id)
        .bind(appointment.vet_id)
        .bind(appointment.appointment_date)
        .fetch_one(&self.pool)
        .await?;

        self.get(id).await
    }

    /// Replace an appointment's participants and date.
    async fn update(
        &self,
        id: i64,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE appointment
            SET client_id = $2, pet_id = $3, vet_id = $4, appointment_date = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(appointment.client_id)
        .bind(appointment.pet_id)
        .bind(appointment.vet_id)
        .bind(appointment.appointment_date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Appointment with id {} not found",
                id
            )));
        }

        self.get(id).await
    }

    /// Cancel an appointment.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM appointment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Appointment with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
