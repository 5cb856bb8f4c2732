//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits containing `&str` parameters
//! - Manual mocks are more explicit and easier to debug
//! - We control exactly what they return without macro magic
//!
//! AppState holds its ports as trait objects, so the same mocks also back
//! the axum-test integration tests.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
