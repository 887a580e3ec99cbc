//! Gateway route handlers and the request/response shapes they share.

pub mod health;
pub mod login;
pub mod me;
pub mod provider_health;
pub mod register;
pub mod root;


use crate::{
    api::error::ApiError,
    provider::{Credentials, ProviderUser},
};
use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /auth/register` and `POST /auth/login`.
#[derive(ToSchema, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields must be present and non-empty.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingFields`] otherwise.
    pub fn into_credentials(self) -> Result<Credentials, ApiError> {
        match (self.email, self.password) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok(Credentials::new(email, password))
            }
            _ => Err(ApiError::MissingFields),
        }
    }
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Public view of a provider user.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<ProviderUser> for UserSummary {
    fn from(user: ProviderUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Extract `<token>` from `Authorization: Bearer <token>`; empty tokens count as missing.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
