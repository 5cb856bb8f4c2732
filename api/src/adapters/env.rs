//! Environment credential source

use std::env;

use crate::domain::entities::CredentialBundle;
use crate::domain::ports::CredentialSource;

/// Reads `TWITTER_USERNAME`, `TWITTER_EMAIL`, `TWITTER_PASSWORD` and
/// `TWITTER_PROXY` each time a session is created.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentialSource;

impl CredentialSource for EnvCredentialSource {
    fn credentials(&self) -> CredentialBundle {
        CredentialBundle {
            username: env::var("TWITTER_USERNAME").ok(),
            email: env::var("TWITTER_EMAIL").ok(),
            password: env::var("TWITTER_PASSWORD").ok(),
            proxy: env::var("TWITTER_PROXY").ok().filter(|p| !p.is_empty()),
        }
    }
}
