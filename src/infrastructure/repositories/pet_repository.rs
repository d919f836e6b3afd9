//! Pet Repository Implementation
//!
//! PostgreSQL implementation of the PetRepository trait, including the
//! `client_pets` join table management behind client↔pet associations.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::{NewPet, Page, Pet, PetRepository, PetSpecies};
use crate::shared::error::AppError;

use super::client_repository::PgClientRepository;
use crate::domain::ClientRepository;

const SELECT_PET: &str = r#"
    SELECT p.id, p.chip_number, p.species, p.breed, p.name, p.birthdate, p.alive, p.castrated
    FROM pet p
"#;

/// Database row matching the `pet` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PetRow {
    pub id: i64,
    pub chip_number: Option<String>,
    pub species: String,
    pub breed: Option<String>,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub alive: bool,
    pub castrated: Option<bool>,
}

impl PetRow {
    /// Convert database row to the domain Pet entity.
    ///
    /// The species column is constrained by the schema; an unknown value
    /// can only mean a broken migration and surfaces as an internal error.
    pub(crate) fn into_pet(self) -> Result<Pet, AppError> {
        let species = PetSpecies::parse(&self.species).ok_or_else(|| {
            AppError::Internal(format!("Unknown species '{}' for pet {}", self.species, self.id))
        })?;

        Ok(Pet {
            id: self.id,
            chip_number: self.chip_number,
            species,
            breed: self.breed,
            name: self.name,
            birthdate: self.birthdate,
            alive: self.alive,
            castrated: self.castrated,
            clients: Vec::new(),
        })
    }
}

/// PostgreSQL pet repository implementation.
#[derive(Clone)]
pub struct PgPetRepository {
    pool: PgPool,
}

impl PgPetRepository {
    /// Create a new PgPetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn collect(rows: Vec<PetRow>) -> Result<Vec<Pet>, AppError> {
        rows.into_iter().map(PetRow::into_pet).collect()
    }
}

#[async_trait]
impl PetRepository for PgPetRepository {
    /// Find a pet by id, with its associated clients hydrated.
    async fn find_by_id(&self, id: i64) -> Result<Option<Pet>, AppError> {
        let row = sqlx::query_as::<_, PetRow>(&format!("{SELECT_PET} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut pet = row.into_pet()?;
        pet.clients = PgClientRepository::new(self.pool.clone())
            .find_by_pet_id(pet.id)
            .await?;

        Ok(Some(pet))
    }

    /// Pets of a client, living animals first.
    async fn find_by_client_id(&self, client_id: i64, page: Page) -> Result<Vec<Pet>, AppError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            r#"
            {SELECT_PET}
            JOIN client_pets cp ON cp.pet_id = p.id
            WHERE cp.client_id = $1
            ORDER BY p.alive DESC, p.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(client_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Pets of a client located by NIF/NIE, living animals first.
    async fn find_by_client_national_id_document(
        &self,
        national_id_document: &str,
        page: Page,
    ) -> Result<Vec<Pet>, AppError> {
        let rows = sqlx::query_as::<_, PetRow>(&format!(
            r#"
            {SELECT_PET}
            JOIN client_pets cp ON cp.pet_id = p.id
            JOIN client c ON c.id = cp.client_id
            WHERE c.national_id_document = $1
            ORDER BY p.alive DESC, p.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(national_id_document)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Self::collect(rows)
    }

    /// Register a new pet.
    async fn create(&self, pet: &NewPet) -> Result<Pet, AppError> {
        let row = sqlx::query_as::<_, PetRow>(
            r#"
            INSERT INTO pet (chip_number, species, breed, name, birthdate, alive, castrated)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, chip_number, species, breed, name, birthdate, alive, castrated
            "#,
        )
        .bind(&pet.chip_number)
        .bind(pet.species.as_str())
        .bind(&pet.breed)
        .bind(&pet.name)
        .bind(pet.birthdate)
        .bind(pet.alive)
        .bind(pet.castrated)
        .fetch_one(&self.pool)
        .await?;

        row.into_pet()
    }

    /// Update a pet's descriptive fields.
    async fn update(&self, pet: &Pet) -> Result<Pet, AppError> {
        let row = sqlx::query_as::<_, PetRow>(
            r#"
            UPDATE pet
            SET chip_number = $2, species = $3, breed = $4, name = $5,
                birthdate = $6, alive = $7, castrated = $8
            WHERE id = $1
            RETURNING id, chip_number, species, breed, name, birthdate, alive, castrated
            "#,
        )
        .bind(pet.id)
        .bind(&pet.chip_number)
        .bind(pet.species.as_str())
        .bind(&pet.breed)
        .bind(&pet.name)
        .bind(pet.birthdate)
        .bind(pet.alive)
        .bind(pet.castrated)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pet with id {} not found", pet.id)))?;

        row.into_pet()
    }

    /// Delete a pet; client associations go first in the same transaction.
    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM client_pets WHERE pet_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM pet WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Pet with id {} not found", id)));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Add a client↔pet association. Re-linking an existing pair is a
    /// no-op (the join table has a uniqueness constraint).
    async fn link_client(&self, pet_id: i64, client_id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO client_pets (client_id, pet_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(client_id)
        .bind(pet_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a client↔pet association.
    async fn unlink_client(&self, pet_id: i64, client_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM client_pets WHERE pet_id = $1 AND client_id = $2")
            .bind(pet_id)
            .bind(client_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
