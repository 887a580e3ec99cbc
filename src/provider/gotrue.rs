//! Supabase Auth (GoTrue) REST client.
//!
//! Admin endpoints are called with the service role key. Password grants use
//! the anon key, and user lookups go through a [`UserScope`] that carries only
//! the anon key and the caller's bearer token.

use super::{
    Credentials, IdentityProvider, ProviderConfig, ProviderError, ProviderSession, ProviderUser,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{Instrument, debug, info_span, instrument};

const APIKEY: &str = "apikey";
const CONNECT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Deserialize)]
struct UserList {
    #[serde(default)]
    users: Vec<ProviderUser>,
}

/// Process-wide provider client. Cloning shares the connection pool.
#[derive(Clone, Debug)]
pub struct GoTrueClient {
    config: ProviderConfig,
    http: Client,
}

impl GoTrueClient {
    /// Build the client and its HTTP connection pool.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS).min(config.timeout()))
            .timeout(config.timeout())
            .build()
            .context("Failed to build identity provider HTTP client")?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Handle scoped to one caller's bearer token, valid for a single lookup.
    #[must_use]
    pub fn user_scope(&self, access_token: &str) -> UserScope<'_> {
        UserScope {
            client: self,
            access_token: SecretString::from(access_token.to_string()),
        }
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        let key = self.config.service_role_key().expose_secret();
        builder
            .header(APIKEY, key)
            .header(AUTHORIZATION, format!("Bearer {key}"))
    }

    fn public(&self, builder: RequestBuilder) -> RequestBuilder {
        let key = self.config.anon_key().expose_secret();
        builder
            .header(APIKEY, key)
            .header(AUTHORIZATION, format!("Bearer {key}"))
    }
}

/// Per-request handle carrying the caller's bearer token and the anon key.
pub struct UserScope<'a> {
    client: &'a GoTrueClient,
    access_token: SecretString,
}

impl UserScope<'_> {
    /// Resolve the user owning this scope's token.
    ///
    /// # Errors
    /// Returns [`ProviderError::Rejected`] if the provider refuses the token.
    pub async fn current_user(&self) -> Result<Option<ProviderUser>, ProviderError> {
        let url = self.client.config.auth_endpoint("user");
        let span = info_span!("provider.request", provider.operation = "get_user");

        let response = self
            .client
            .http
            .get(&url)
            .header(APIKEY, self.client.config.anon_key().expose_secret())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.access_token.expose_secret()),
            )
            .send()
            .instrument(span)
            .await?;

        let body: Value = success_json(response).await?;

        // An empty or id-less body means the token resolved to nobody.
        if body.get("id").and_then(Value::as_str).is_none() {
            debug!("provider returned no user for token");
            return Ok(None);
        }

        serde_json::from_value(body)
            .map(Some)
            .map_err(|err| ProviderError::Decode(err.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    #[instrument(skip(self))]
    async fn list_users(&self, per_page: u32) -> Result<Vec<ProviderUser>, ProviderError> {
        let url = self.config.auth_endpoint("admin/users");
        let span = info_span!("provider.request", provider.operation = "admin.list_users");

        let response = self
            .admin(self.http.get(&url))
            .query(&[("page", 1), ("per_page", per_page)])
            .send()
            .instrument(span)
            .await?;

        let list: UserList = decode(success_json(response).await?)?;

        Ok(list.users)
    }

    #[instrument(skip(self, credentials))]
    async fn create_user(&self, credentials: &Credentials) -> Result<ProviderUser, ProviderError> {
        let url = self.config.auth_endpoint("admin/users");
        let span = info_span!("provider.request", provider.operation = "admin.create_user");

        let payload = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
            "email_confirm": true,
        });

        let response = self
            .admin(self.http.post(&url))
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        decode(success_json(response).await?)
    }

    #[instrument(skip(self, credentials))]
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, ProviderError> {
        let url = self.config.auth_endpoint("token");
        let span = info_span!("provider.request", provider.operation = "token.password");

        let payload = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });

        let response = self
            .public(self.http.post(&url))
            .query(&[("grant_type", "password")])
            .json(&payload)
            .send()
            .instrument(span)
            .await?;

        decode(success_json(response).await?)
    }

    #[instrument(skip(self, access_token))]
    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>, ProviderError> {
        self.user_scope(access_token).current_user().await
    }
}

/// Read a JSON body from a successful response, or turn an error status into
/// [`ProviderError::Rejected`].
async fn success_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(&bytes).map_err(|err| ProviderError::Decode(err.to_string()));
    }

    let body = response.json::<Value>().await.ok();
    let message = body
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("identity provider error")
                .to_string()
        });

    debug!(status = status.as_u16(), "provider rejected request");

    Err(ProviderError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ProviderError> {
    serde_json::from_value(body).map_err(|err| ProviderError::Decode(err.to_string()))
}

/// GoTrue has used several error shapes over time; take the first message found.
fn error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}
