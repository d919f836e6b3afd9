//! User Service
//!
//! Registration and update of the three account types. Registration
//! assigns the subtype's role, enables the account and hashes the
//! password; updates only touch the mutable profile fields.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Client, ClientRepository, NewAppUser, NewClient, NewVet, NewVetEntity, RoleName, Vet,
    VetEntity, VetEntityRepository, VetRepository,
};
use crate::shared::error::AppError;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a client account with ROLE_CLIENT
    async fn register_client(&self, data: RegisterClientData) -> Result<Client, UserError>;

    /// Register a vet account with ROLE_VET
    async fn register_vet(&self, data: RegisterVetData) -> Result<Vet, UserError>;

    /// Register a vet entity account with ROLE_VET_ENTITY
    async fn register_vet_entity(&self, data: RegisterVetEntityData)
        -> Result<VetEntity, UserError>;

    /// Update a client's email, enabled flag and contact data
    async fn update_client(&self, id: i64, update: UpdateClientData) -> Result<Client, UserError>;

    /// Update a vet's email, enabled flag and employing clinic
    async fn update_vet(&self, id: i64, update: UpdateVetData) -> Result<Vet, UserError>;

    /// Update a vet entity's email, enabled flag and clinic profile
    async fn update_vet_entity(
        &self,
        id: i64,
        update: UpdateVetEntityData,
    ) -> Result<VetEntity, UserError>;
}

/// Client registration data
#[derive(Debug, Clone)]
pub struct RegisterClientData {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub national_id_document: String,
    pub name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Vet registration data
#[derive(Debug, Clone)]
pub struct RegisterVetData {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub national_id_document: String,
    pub registration_number: String,
    pub name: String,
    pub vet_entity_id: Option<i64>,
}

/// Vet entity registration data
#[derive(Debug, Clone)]
pub struct RegisterVetEntityData {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub cif: String,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Client update data
#[derive(Debug, Clone)]
pub struct UpdateClientData {
    pub email: Option<String>,
    pub enabled: bool,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Vet update data
#[derive(Debug, Clone)]
pub struct UpdateVetData {
    pub email: Option<String>,
    pub enabled: bool,
    pub vet_entity_id: Option<i64>,
}

/// Vet entity update data
#[derive(Debug, Clone)]
pub struct UpdateVetEntityData {
    pub email: Option<String>,
    pub enabled: bool,
    pub name: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Client with id {0} not found")]
    ClientNotFound(i64),

    #[error("Vet with id {0} not found")]
    VetNotFound(i64),

    #[error("Vet entity with id {0} not found")]
    VetEntityNotFound(i64),

    #[error("Username or identity document already registered")]
    DuplicateAccount,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserError {
    fn from_repo(e: AppError) -> Self {
        match e {
            AppError::Conflict(_) => UserError::DuplicateAccount,
            e => UserError::Internal(e.to_string()),
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<C, V, E>
where
    C: ClientRepository,
    V: VetRepository,
    E: VetEntityRepository,
{
    client_repo: Arc<C>,
    vet_repo: Arc<V>,
    vet_entity_repo: Arc<E>,
}

impl<C, V, E> UserServiceImpl<C, V, E>
where
    C: ClientRepository,
    V: VetRepository,
    E: VetEntityRepository,
{
    pub fn new(client_repo: Arc<C>, vet_repo: Arc<V>, vet_entity_repo: Arc<E>) -> Self {
        Self {
            client_repo,
            vet_repo,
            vet_entity_repo,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(password: &str) -> Result<String, UserError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    /// Base account data for a fresh registration
    fn new_account(
        username: String,
        password: &str,
        email: Option<String>,
        role: RoleName,
    ) -> Result<NewAppUser, UserError> {
        Ok(NewAppUser {
            username,
            password_hash: Self::hash_password(password)?,
            enabled: true,
            email,
            roles: vec![role.as_str().to_string()],
        })
    }

    /// A supplied vet entity reference must resolve before it is linked.
    async fn check_vet_entity(&self, vet_entity_id: Option<i64>) -> Result<(), UserError> {
        if let Some(id) = vet_entity_id {
            let exists = self
                .vet_entity_repo
                .exists(id)
                .await
                .map_err(|e| UserError::Internal(e.to_string()))?;

            if !exists {
                return Err(UserError::VetEntityNotFound(id));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<C, V, E> UserService for UserServiceImpl<C, V, E>
where
    C: ClientRepository + 'static,
    V: VetRepository + 'static,
    E: VetEntityRepository + 'static,
{
    async fn register_client(&self, data: RegisterClientData) -> Result<Client, UserError> {
        let client = NewClient {
            account: Self::new_account(
                data.username,
                &data.password,
                data.email,
                RoleName::Client,
            )?,
            national_id_document: data.national_id_document,
            name: data.name,
            birthdate: data.birthdate,
            address: data.address,
            phone_number: data.phone_number,
        };

        self.client_repo
            .create(&client)
            .await
            .map_err(UserError::from_repo)
    }

    async fn register_vet(&self, data: RegisterVetData) -> Result<Vet, UserError> {
        self.check_vet_entity(data.vet_entity_id).await?;

        let vet = NewVet {
            account: Self::new_account(data.username, &data.password, data.email, RoleName::Vet)?,
            national_id_document: data.national_id_document,
            registration_number: data.registration_number,
            name: data.name,
            vet_entity_id: data.vet_entity_id,
        };

        self.vet_repo.create(&vet).await.map_err(UserError::from_repo)
    }

    async fn register_vet_entity(
        &self,
        data: RegisterVetEntityData,
    ) -> Result<VetEntity, UserError> {
        let vet_entity = NewVetEntity {
            account: Self::new_account(
                data.username,
                &data.password,
                data.email,
                RoleName::VetEntity,
            )?,
            cif: data.cif,
            name: data.name,
            address: data.address,
            phone_number: data.phone_number,
        };

        self.vet_entity_repo
            .create(&vet_entity)
            .await
            .map_err(UserError::from_repo)
    }

    async fn update_client(&self, id: i64, update: UpdateClientData) -> Result<Client, UserError> {
        let mut client = self
            .client_repo
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::ClientNotFound(id))?;

        client.account.email = update.email;
        client.account.enabled = update.enabled;
        client.address = update.address;
        client.phone_number = update.phone_number;

        self.client_repo
            .update(&client)
            .await
            .map_err(UserError::from_repo)
    }

    async fn update_vet(&self, id: i64, update: UpdateVetData) -> Result<Vet, UserError> {
        let mut vet = self
            .vet_repo
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::VetNotFound(id))?;

        let vet_entity = match update.vet_entity_id {
            Some(vet_entity_id) => Some(
                self.vet_entity_repo
                    .find_by_id(vet_entity_id)
                    .await
                    .map_err(|e| UserError::Internal(e.to_string()))?
                    .ok_or(UserError::VetEntityNotFound(vet_entity_id))?
                    .into(),
            ),
            None => None,
        };

        vet.account.email = update.email;
        vet.account.enabled = update.enabled;
        vet.vet_entity = vet_entity;

        self.vet_repo.update(&vet).await.map_err(UserError::from_repo)
    }

    async fn update_vet_entity(
        &self,
        id: i64,
        update: UpdateVetEntityData,
    ) -> Result<VetEntity, UserError> {
        let mut vet_entity = self
            .vet_entity_repo
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?
            .ok_or(UserError::VetEntityNotFound(id))?;

        vet_entity.account.email = update.email;
        vet_entity.account.enabled = update.enabled;
        vet_entity.name = update.name;
        vet_entity.address = update.address;
        vet_entity.phone_number = update.phone_number;

        self.vet_entity_repo
            .update(&vet_entity)
            .await
            .map_err(UserError::from_repo)
    }
}
