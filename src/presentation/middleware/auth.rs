//! Authentication & Authorization Middleware
//!
//! JWT validation for protected routes plus the role tiers of the path
//! authorization matrix. `auth_middleware` establishes identity; the
//! `require_*` guards sit on route groups and admit only the listed
//! roles.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::application::services::Claims;
use crate::domain::RoleName;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub roles: Vec<RoleName>,
}

impl AuthUser {
    /// Whether the user holds at least one of the given roles.
    pub fn has_any_role(&self, allowed: &[RoleName]) -> bool {
        self.roles.iter().any(|r| allowed.contains(r))
    }
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    // Check for Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    // Decode and validate JWT
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired".into())
        }
        _ => AppError::Unauthorized("Invalid token".into()),
    })?;

    // Parse user ID from claims
    let user_id: i64 = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))?;

    // Unknown role names in a token are dropped rather than trusted
    let roles: Vec<RoleName> = token_data
        .claims
        .roles
        .iter()
        .filter_map(|r| RoleName::parse(r))
        .collect();

    // Insert authenticated user into request extensions
    request.extensions_mut().insert(AuthUser { user_id, roles });

    // Continue to the next handler
    Ok(next.run(request).await)
}

fn check_roles(request: &Request, allowed: &[RoleName]) -> Result<(), AppError> {
    let auth = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

    if auth.has_any_role(allowed) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Insufficient role for this operation".into()))
    }
}

/// Any registered role: read access to the core API and client updates
pub async fn require_any_role(request: Request, next: Next) -> Result<Response, AppError> {
    check_roles(
        &request,
        &[RoleName::Client, RoleName::Vet, RoleName::VetEntity, RoleName::Root],
    )?;
    Ok(next.run(request).await)
}

/// Clinical staff: write access to the core API and vet updates
pub async fn require_staff(request: Request, next: Next) -> Result<Response, AppError> {
    check_roles(&request, &[RoleName::Vet, RoleName::VetEntity, RoleName::Root])?;
    Ok(next.run(request).await)
}

/// Clinic management: vet registration and vet entity updates
pub async fn require_vet_entity(request: Request, next: Next) -> Result<Response, AppError> {
    check_roles(&request, &[RoleName::VetEntity, RoleName::Root])?;
    Ok(next.run(request).await)
}

/// Operators only: vet entity registration
pub async fn require_root(request: Request, next: Next) -> Result<Response, AppError> {
    check_roles(&request, &[RoleName::Root])?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(roles: &[RoleName]) -> AuthUser {
        AuthUser {
            user_id: 1,
            roles: roles.to_vec(),
        }
    }

    #[test]
    fn test_client_is_not_staff() {
        let user = auth_user(&[RoleName::Client]);
        assert!(user.has_any_role(&[RoleName::Client, RoleName::Vet, RoleName::VetEntity, RoleName::Root]));
        assert!(!user.has_any_role(&[RoleName::Vet, RoleName::VetEntity, RoleName::Root]));
    }

    #[test]
    fn test_vet_is_staff_but_not_clinic_management() {
        let user = auth_user(&[RoleName::Vet]);
        assert!(user.has_any_role(&[RoleName::Vet, RoleName::VetEntity, RoleName::Root]));
        assert!(!user.has_any_role(&[RoleName::VetEntity, RoleName::Root]));
    }

    #[test]
    fn test_vet_entity_cannot_register_clinics() {
        let user = auth_user(&[RoleName::VetEntity]);
        assert!(user.has_any_role(&[RoleName::VetEntity, RoleName::Root]));
        assert!(!user.has_any_role(&[RoleName::Root]));
    }

    #[test]
    fn test_root_passes_every_tier() {
        let user = auth_user(&[RoleName::Root]);
        for tier in [
            &[RoleName::Client, RoleName::Vet, RoleName::VetEntity, RoleName::Root][..],
            &[RoleName::Vet, RoleName::VetEntity, RoleName::Root][..],
            &[RoleName::VetEntity, RoleName::Root][..],
            &[RoleName::Root][..],
        ] {
            assert!(user.has_any_role(tier));
        }
    }

    #[test]
    fn test_roleless_user_passes_no_tier() {
        let user = auth_user(&[]);
        assert!(!user.has_any_role(&[
            RoleName::Client,
            RoleName::Vet,
            RoleName::VetEntity,
            RoleName::Root
        ]));
    }
}
