//! Account base data shared by every login-capable user type.
//!
//! The original model is joined-table inheritance: `app_user` holds the
//! credentials and every subtype (client, vet, vet entity) shares its
//! primary key with a base row. In Rust the base is a plain struct embedded
//! in each subtype entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::role::{Role, RoleName};

/// Credentials and access data for an account.
///
/// Maps to the `app_user` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - username: VARCHAR(20) NOT NULL UNIQUE
/// - password: VARCHAR(100) NOT NULL (argon2 hash)
/// - enabled: BOOLEAN NOT NULL DEFAULT TRUE
/// - email: VARCHAR(80) NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    pub id: i64,

    /// Login name (unique, at most 20 characters)
    pub username: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether the account may log in
    pub enabled: bool,

    pub email: Option<String>,

    /// Roles granted to this account
    pub roles: Vec<Role>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppUser {
    /// Whether the account holds the given role.
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.iter().any(|r| r.role_name() == Some(role))
    }

    /// Role names in claim format (`ROLE_*`).
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }
}

impl Default for AppUser {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: String::new(),
            password_hash: String::new(),
            enabled: true,
            email: None,
            roles: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data for a base account row to be created alongside a subtype row.
#[derive(Debug, Clone)]
pub struct NewAppUser {
    pub username: String,
    pub password_hash: String,
    pub enabled: bool,
    pub email: Option<String>,
    /// Role names to link (`ROLE_*`); must exist in the `role` table
    pub roles: Vec<String>,
}

/// Repository trait for account-level lookups.
///
/// Subtype repositories create and update base rows as part of their own
/// operations; this trait only covers lookups that span all user types
/// (login, token validation).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppUserRepository: Send + Sync {
    /// Find an account by username, roles included.
    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, AppError>;

    /// Find an account by id, roles included.
    async fn find_by_id(&self, id: i64) -> Result<Option<AppUser>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(names: &[&str]) -> AppUser {
        AppUser {
            id: 1,
            username: "maria".to_string(),
            password_hash: "hash".to_string(),
            roles: names
                .iter()
                .enumerate()
                .map(|(i, n)| Role {
                    id: i as i64 + 1,
                    name: n.to_string(),
                })
                .collect(),
            ..AppUser::default()
        }
    }

    #[test]
    fn test_has_role() {
        let user = user_with_roles(&["ROLE_VET"]);
        assert!(user.has_role(RoleName::Vet));
        assert!(!user.has_role(RoleName::Root));
    }

    #[test]
    fn test_role_names_keep_claim_format() {
        let user = user_with_roles(&["ROLE_CLIENT", "ROLE_ROOT"]);
        assert_eq!(user.role_names(), vec!["ROLE_CLIENT", "ROLE_ROOT"]);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = user_with_roles(&["ROLE_CLIENT"]);
        let serialized = serde_json::to_string(&user).expect("serializable");
        assert!(!serialized.contains("password_hash"));
        assert!(!serialized.contains("hash"));
    }
}
