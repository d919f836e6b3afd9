//! Client Repository Implementation
//!
//! PostgreSQL implementation of the ClientRepository trait. Client rows
//! are read joined with their `app_user` base row; writes touch both
//! tables inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::domain::{AppUser, Client, ClientRepository, NewClient, Role};
use crate::shared::error::AppError;

use super::{conflict_on_unique, fetch_roles, insert_app_user, link_roles, update_app_user};

const SELECT_CLIENT: &str = r#"
    SELECT u.id, u.username, u.password, u.enabled, u.email, u.created_at, u.updated_at,
           c.national_id_document, c.name, c.birthdate, c.address, c.phone_number
    FROM client c
    JOIN app_user u ON u.id = c.id
"#;

/// Database row matching `client` joined with `app_user`.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i64,
    username: String,
    password: String,
    enabled: bool,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    national_id_document: String,
    name: String,
    birthdate: Option<NaiveDate>,
    address: Option<String>,
    phone_number: Option<String>,
}

impl ClientRow {
    /// Convert database row to the domain Client entity.
    fn into_client(self, roles: Vec<Role>) -> Client {
        Client {
            account: AppUser {
                id: self.id,
                username: self.username,
                password_hash: self.password,
                enabled: self.enabled,
                email: self.email,
                roles,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            national_id_document: self.national_id_document,
            name: self.name,
            birthdate: self.birthdate,
            address: self.address,
            phone_number: self.phone_number,
            pets: Vec::new(),
        }
    }
}

/// PostgreSQL client repository implementation.
#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    /// Create a new PgClientRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hydrate(&self, row: Option<ClientRow>) -> Result<Option<Client>, AppError> {
        match row {
            Some(row) => {
                let roles = fetch_roles(&self.pool, row.id).await?;
                Ok(Some(row.into_client(roles)))
            }
            None => Ok(None),
        }
    }

    async fn get(&self, id: i64) -> Result<Client, AppError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!("{SELECT_CLIENT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.hydrate(row)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client with id {} not found", id)))
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    /// Find a client by its account id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!("{SELECT_CLIENT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        self.hydrate(row).await
    }

    /// Find a client by NIF/NIE.
    async fn find_by_national_id_document(
        &self,
        national_id_document: &str,
    ) -> Result<Option<Client>, AppError> {
        let row = sqlx::query_as::<_, ClientRow>(&format!(
            "{SELECT_CLIENT} WHERE c.national_id_document = $1"
        ))
        .bind(national_id_document)
        .fetch_optional(&self.pool)
        .await?;

        self.hydrate(row).await
    }

    /// All clients associated with a pet.
    async fn find_by_pet_id(&self, pet_id: i64) -> Result<Vec<Client>, AppError> {
        let rows = sqlx::query_as::<_, ClientRow>(&format!(
            r#"
            {SELECT_CLIENT}
            JOIN client_pets cp ON cp.client_id = c.id
            WHERE cp.pet_id = $1
            ORDER BY c.id
            "#
        ))
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await?;

        // Association management does not need roles hydrated
        Ok(rows.into_iter().map(|r| r.into_client(Vec::new())).collect())
    }

    /// Create the account and client rows plus role links transactionally.
    async fn create(&self, client: &NewClient) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = insert_app_user(&mut tx, &client.account).await?;
        link_roles(&mut tx, id, &client.account.roles).await?;

        sqlx::query(
            r#"
            INSERT INTO client (id, national_id_document, name, birthdate, address, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&client.national_id_document)
        .bind(&client.name)
        .bind(client.birthdate)
        .bind(&client.address)
        .bind(&client.phone_number)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Client with this NIF/NIE already registered"))?;

        tx.commit().await?;

        self.get(id).await
    }

    /// Update account fields and contact data.
    async fn update(&self, client: &Client) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        update_app_user(&mut tx, client.account.id, &client.account.email, client.account.enabled)
            .await?;

        let result = sqlx::query(
            r#"
            UPDATE client
            SET address = $2, phone_number = $3
            WHERE id = $1
            "#,
        )
        .bind(client.account.id)
        .bind(&client.address)
        .bind(&client.phone_number)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Client with id {} not found",
                client.account.id
            )));
        }

        tx.commit().await?;

        self.get(client.account.id).await
    }
}
