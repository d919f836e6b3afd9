//! Middleware
//!
//! Tower middleware for request processing.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod metrics;
pub mod security;

pub use auth::{
    auth_middleware, require_any_role, require_root, require_staff, require_vet_entity, AuthUser,
};
pub use metrics::track_metrics;
pub use security::security_headers;
