//! REST API endpoint tests

mod authorization_tests;
mod health_tests;
mod validation_tests;
