//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod env;
pub mod fs;
pub mod twitter;

pub use env::EnvCredentialSource;
pub use fs::FileCookieStore;
pub use twitter::TwitterClientFactory;
