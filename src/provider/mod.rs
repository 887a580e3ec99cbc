//! Identity provider seam.
//!
//! Handlers only talk to [`IdentityProvider`]. The production implementation is
//! [`GoTrueClient`], which speaks the Supabase Auth (GoTrue) REST API; tests
//! plug in their own implementation.

mod config;
mod gotrue;

pub use self::config::{DEFAULT_TIMEOUT_SECONDS, ProviderConfig};
pub use self::gotrue::{GoTrueClient, UserScope};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;

/// Email and password pair forwarded to the provider.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: String, password: String) -> Self {
        Self {
            email,
            password: SecretString::from(password),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// User record as returned by the provider, reduced to the fields we relay.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a password grant.
///
/// `access_token` stays optional so a grant that returns no token can be told
/// apart from a rejected grant.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderSession {
    #[serde(default)]
    pub access_token: Option<String>,
    pub user: ProviderUser,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The provider could not be reached or the exchange failed mid-flight.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a body we cannot interpret.
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// List at most `per_page` users using the service role key.
    async fn list_users(&self, per_page: u32) -> Result<Vec<ProviderUser>, ProviderError>;

    /// Create a user with the email already confirmed, using the service role key.
    async fn create_user(&self, credentials: &Credentials) -> Result<ProviderUser, ProviderError>;

    /// Exchange email and password for a session.
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, ProviderError>;

    /// Resolve the user owning `access_token`; `None` if the provider returns no user.
    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError>;
}
