//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! This is the Rust counterpart of the original deployment's centralized
//! configuration service: all externalized settings flow through one
//! layered loader.

mod settings;

pub use settings::*;
