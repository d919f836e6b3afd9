//! Role entity and the set of system roles.
//!
//! Maps to the `role` table; accounts are linked through `users_roles`.

use serde::{Deserialize, Serialize};

/// The four roles the application knows about.
///
/// - CLIENT: consumer of the application (pet owner)
/// - VET: veterinarian, manages client/pet associations and reports
/// - VET_ENTITY: veterinary clinic, manages its vet accounts
/// - ROOT: operators and maintainers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleName {
    Client,
    Vet,
    VetEntity,
    Root,
}

impl RoleName {
    /// Database / claim representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "ROLE_CLIENT",
            Self::Vet => "ROLE_VET",
            Self::VetEntity => "ROLE_VET_ENTITY",
            Self::Root => "ROLE_ROOT",
        }
    }

    /// Parse the database / claim representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROLE_CLIENT" => Some(Self::Client),
            "ROLE_VET" => Some(Self::Vet),
            "ROLE_VET_ENTITY" => Some(Self::VetEntity),
            "ROLE_ROOT" => Some(Self::Root),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A role row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

impl Role {
    /// The well-known role this row represents, if any.
    pub fn role_name(&self) -> Option<RoleName> {
        RoleName::parse(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_round_trip() {
        for role in [RoleName::Client, RoleName::Vet, RoleName::VetEntity, RoleName::Root] {
            assert_eq!(RoleName::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_name_parse_rejects_unknown() {
        assert_eq!(RoleName::parse("ROLE_ADMIN"), None);
        assert_eq!(RoleName::parse("client"), None);
        assert_eq!(RoleName::parse(""), None);
    }

    #[test]
    fn test_role_row_maps_to_role_name() {
        let role = Role {
            id: 1,
            name: "ROLE_VET".to_string(),
        };
        assert_eq!(role.role_name(), Some(RoleName::Vet));
    }

    #[test]
    fn test_display_matches_claim_format() {
        assert_eq!(RoleName::VetEntity.to_string(), "ROLE_VET_ENTITY");
    }
}
