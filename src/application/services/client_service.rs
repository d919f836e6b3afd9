//! Client Query Service
//!
//! Read access to client data for the core API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Client, ClientRepository};

/// Client query service trait
#[async_trait]
pub trait ClientService: Send + Sync {
    /// Find a client by id
    async fn find_by_id(&self, id: i64) -> Result<Client, ClientError>;
}

/// Client query errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Client with id {0} not found")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ClientService implementation
pub struct ClientServiceImpl<C>
where
    C: ClientRepository,
{
    client_repo: Arc<C>,
}

impl<C> ClientServiceImpl<C>
where
    C: ClientRepository,
{
    pub fn new(client_repo: Arc<C>) -> Self {
        Self { client_repo }
    }
}

#[async_trait]
impl<C> ClientService for ClientServiceImpl<C>
where
    C: ClientRepository + 'static,
{
    async fn find_by_id(&self, id: i64) -> Result<Client, ClientError> {
        self.client_repo
            .find_by_id(id)
            .await
            .map_err(|e| ClientError::Internal(e.to_string()))?
            .ok_or(ClientError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppUser, MockClientRepository};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_find_by_id_returns_the_client() {
        let mut client_repo = MockClientRepository::new();
        client_repo.expect_find_by_id().with(eq(4)).returning(|id| {
            Ok(Some(Client {
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
            }))
        });

        let service = ClientServiceImpl::new(Arc::new(client_repo));
        let client = service.find_by_id(4).await.expect("client found");

        assert_eq!(client.account.id, 4);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_client_fails() {
        let mut client_repo = MockClientRepository::new();
        client_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ClientServiceImpl::new(Arc::new(client_repo));
        let result = service.find_by_id(4).await;

        assert!(matches!(result, Err(ClientError::NotFound(4))));
    }
}
