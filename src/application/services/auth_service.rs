//! Authentication Service
//!
//! Credential login, JWT token issuance with role claims, and
//! refresh-token session handling.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtSettings;
use crate::domain::{AppUser, AppUserRepository, Session, SessionRepository};

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate a user with username and password
    async fn login(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError>;

    /// Refresh the access token using a refresh token
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Revoke a refresh token (logout)
    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError>;

    /// Get the account behind an access token
    async fn get_current_user(&self, access_token: &str) -> Result<AppUser, AuthError>;
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Role names granted to the account (`ROLE_*`)
    pub roles: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// JWT ID for token revocation tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Session not found or expired")]
    SessionNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// AuthService implementation
pub struct AuthServiceImpl<U, S>
where
    U: AppUserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    jwt_settings: JwtSettings,
}

impl<U, S> AuthServiceImpl<U, S>
where
    U: AppUserRepository,
    S: SessionRepository,
{
    /// Create a new AuthServiceImpl
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, jwt_settings: JwtSettings) -> Self {
        Self {
            user_repo,
            session_repo,
            jwt_settings,
        }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Generate access and refresh tokens for an account
    fn generate_tokens(&self, user: &AppUser) -> Result<AuthTokens, AuthError> {
        let now = Utc::now();
        let access_expiry = now + Duration::minutes(self.jwt_settings.access_token_expiry_minutes);

        let access_claims = Claims {
            sub: user.id.to_string(),
            roles: user.role_names(),
            exp: access_expiry.timestamp(),
            iat: now.timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        // Opaque refresh token, no user data embedded
        let refresh_token = format!("{}.{}", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());

        Ok(AuthTokens {
            access_token,
            refresh_token,
            expires_in: self.jwt_settings.access_token_expiry_minutes * 60,
            token_type: "Bearer".to_string(),
        })
    }

    /// Hash a refresh token for storage
    fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Decode and validate an access token
    fn decode_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl<U, S> AuthService for AuthServiceImpl<U, S>
where
    U: AppUserRepository + 'static,
    S: SessionRepository + 'static,
{
    async fn login(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        let tokens = self.generate_tokens(&user)?;

        let token_hash = self.hash_refresh_token(&tokens.refresh_token);
        let session = Session::new(
            user.id,
            token_hash,
            Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days),
        );

        self.session_repo
            .create(&session)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(tokens)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let token_hash = self.hash_refresh_token(refresh_token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_active() {
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        // Token rotation: the presented refresh token is consumed
        let new_tokens = self.generate_tokens(&user)?;
        let new_token_hash = self.hash_refresh_token(&new_tokens.refresh_token);
        let new_expires_at = Utc::now() + Duration::days(self.jwt_settings.refresh_token_expiry_days);

        self.session_repo
            .update_token_hash(session.id, &new_token_hash, new_expires_at)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(new_tokens)
    }

    async fn revoke_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        let token_hash = self.hash_refresh_token(refresh_token);

        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::SessionNotFound)?;

        self.session_repo
            .revoke(session.id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn get_current_user(&self, access_token: &str) -> Result<AppUser, AuthError> {
        let claims = self.decode_access_token(access_token)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockAppUserRepository, MockSessionRepository, Role};
    use mockall::predicate::eq;

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_token_expiry_minutes: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn vet_user(password: &str, enabled: bool) -> AppUser {
        AppUser {
            id: 42,
            username: "anavet".to_string(),
            password_hash: AuthServiceImpl::<MockAppUserRepository, MockSessionRepository>::hash_password(
                password,
            )
            .expect("hashable"),
            enabled,
            roles: vec![Role {
                id: 2,
                name: "ROLE_VET".to_string(),
            }],
            ..AppUser::default()
        }
    }

    fn service(
        user_repo: MockAppUserRepository,
        session_repo: MockSessionRepository,
    ) -> AuthServiceImpl<MockAppUserRepository, MockSessionRepository> {
        AuthServiceImpl::new(Arc::new(user_repo), Arc::new(session_repo), jwt_settings())
    }

    #[tokio::test]
    async fn test_login_issues_tokens_with_role_claims() {
        let mut user_repo = MockAppUserRepository::new();
        user_repo
            .expect_find_by_username()
            .with(eq("anavet"))
            .returning(|_| Ok(Some(vet_user("correcthorse", true))));

        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_create()
            .returning(|s| Ok(s.clone()));

        let service = service(user_repo, session_repo);
        let tokens = service.login("anavet", "correcthorse").await.expect("login succeeds");

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 15 * 60);

        let claims = service
            .decode_access_token(&tokens.access_token)
            .expect("token decodes");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.roles, vec!["ROLE_VET"]);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut user_repo = MockAppUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Ok(Some(vet_user("correcthorse", true))));

        let service = service(user_repo, MockSessionRepository::new());
        let result = service.login("anavet", "wrongpassword").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_user() {
        let mut user_repo = MockAppUserRepository::new();
        user_repo.expect_find_by_username().returning(|_| Ok(None));

        let service = service(user_repo, MockSessionRepository::new());
        let result = service.login("ghost", "whatever123").await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_rejects_disabled_account() {
        let mut user_repo = MockAppUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Ok(Some(vet_user("correcthorse", false))));

        let service = service(user_repo, MockSessionRepository::new());
        let result = service.login("anavet", "correcthorse").await;

        assert!(matches!(result, Err(AuthError::AccountDisabled)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_unknown_token() {
        let mut session_repo = MockSessionRepository::new();
        session_repo
            .expect_find_by_token_hash()
            .returning(|_| Ok(None));

        let service = service(MockAppUserRepository::new(), session_repo);
        let result = service.refresh_token("not-a-token").await;

        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_expired_session() {
        let mut session_repo = MockSessionRepository::new();
        session_repo.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(Session {
                id: 1,
                user_id: 42,
                token_hash: hash.to_string(),
                expires_at: Utc::now() - Duration::minutes(1),
                revoked: false,
                created_at: Utc::now(),
            }))
        });

        let service = service(MockAppUserRepository::new(), session_repo);
        let result = service.refresh_token("expired-token").await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_the_session_token() {
        let mut user_repo = MockAppUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(42))
            .returning(|_| Ok(Some(vet_user("correcthorse", true))));

        let mut session_repo = MockSessionRepository::new();
        session_repo.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(Session {
                id: 7,
                user_id: 42,
                token_hash: hash.to_string(),
                expires_at: Utc::now() + Duration::days(3),
                revoked: false,
                created_at: Utc::now(),
            }))
        });
        session_repo
            .expect_update_token_hash()
            .with(eq(7), mockall::predicate::always(), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(user_repo, session_repo);
        let tokens = service.refresh_token("valid-token").await.expect("refresh succeeds");

        assert_ne!(tokens.refresh_token, "valid-token");
    }

    #[tokio::test]
    async fn test_get_current_user_rejects_garbage_token() {
        let service = service(MockAppUserRepository::new(), MockSessionRepository::new());
        let result = service.get_current_user("garbage").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
