//! Refresh-token session entity and repository trait.
//!
//! Sessions back the refresh grant: the opaque refresh token handed to a
//! client is stored hashed, and rotated on every use.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A refresh-token session.
///
/// Maps to the `session` table. `token_hash` is the SHA-256 hex digest of
/// the opaque refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Build a session to be persisted (id assigned by the database).
    pub fn new(user_id: i64, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id,
            token_hash,
            expires_at,
            revoked: false,
            created_at: Utc::now(),
        }
    }

    /// Whether the session can still be used to refresh.
    pub fn is_active(&self) -> bool {
        !self.revoked && self.expires_at > Utc::now()
    }
}

/// Repository trait for session data access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    async fn create(&self, session: &Session) -> Result<Session, AppError>;

    /// Find a session by refresh token hash.
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Replace the token hash and expiry (refresh token rotation).
    async fn update_token_hash(
        &self,
        id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Mark a session revoked.
    async fn revoke(&self, id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_session_is_active() {
        let session = Session::new(1, "abc".into(), Utc::now() + Duration::days(7));
        assert!(session.is_active());
        assert!(!session.revoked);
    }

    #[test]
    fn test_expired_session_is_not_active() {
        let session = Session::new(1, "abc".into(), Utc::now() - Duration::minutes(1));
        assert!(!session.is_active());
    }

    #[test]
    fn test_revoked_session_is_not_active() {
        let mut session = Session::new(1, "abc".into(), Utc::now() + Duration::days(7));
        session.revoked = true;
        assert!(!session.is_active());
    }
}
