//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod platform;
pub mod session_store;

pub use platform::{ClientFactory, PlatformClient, PlatformMedia, PlatformTweet, PlatformUser};
pub use session_store::{CookieStore, CredentialSource};
