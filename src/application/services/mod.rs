//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: login, JWT issuance with role claims, refresh
//!   sessions
//! - **UserService**: registration and update of the three account types
//! - **AppointmentService**: appointment booking and queries
//! - **PetService**: pet management and client associations
//! - **ReportService**: clinical report management
//! - **ClientService / VetService / VetEntityService**: query services

pub mod appointment_service;
pub mod auth_service;
pub mod client_service;
pub mod pet_service;
pub mod report_service;
pub mod user_service;
pub mod vet_entity_service;
pub mod vet_service;

// Re-export auth service types
pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, Claims};

// Re-export user service types
pub use user_service::{
    RegisterClientData, RegisterVetData, RegisterVetEntityData, UpdateClientData, UpdateVetData,
    UpdateVetEntityData, UserError, UserService, UserServiceImpl,
};

// Re-export appointment service types
pub use appointment_service::{AppointmentError, AppointmentService, AppointmentServiceImpl};

// Re-export pet service types
pub use pet_service::{PetError, PetService, PetServiceImpl};

// Re-export report service types
pub use report_service::{ReportError, ReportService, ReportServiceImpl};

// Re-export query service types
pub use client_service::{ClientError, ClientService, ClientServiceImpl};
pub use vet_entity_service::{VetEntityError, VetEntityService, VetEntityServiceImpl};
pub use vet_service::{VetError, VetService, VetServiceImpl};
