use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Provider endpoint and credentials, validated once at startup.
#[derive(Clone)]
pub struct ProviderConfig {
    url: Url,
    service_role_key: SecretString,
    anon_key: SecretString,
    timeout: Duration,
}

impl ProviderConfig {
    /// Validate and build the provider configuration.
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute http(s) URL with a host, or
    /// if either key is empty.
    pub fn new(url: &str, service_role_key: SecretString, anon_key: SecretString) -> Result<Self> {
        let parsed = Url::parse(url.trim())
            .with_context(|| format!("Invalid identity provider URL: {url}"))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Identity provider URL must use http or https: {url}"
            ));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(anyhow!("Identity provider URL must include a host: {url}"));
        }

        if service_role_key.expose_secret().trim().is_empty() {
            return Err(anyhow!("Identity provider service role key is empty"));
        }

        if anon_key.expose_secret().trim().is_empty() {
            return Err(anyhow!("Identity provider anon key is empty"));
        }

        Ok(Self {
            url: parsed,
            service_role_key,
            anon_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        })
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// `{base}/auth/v1/{path}`, tolerating a trailing slash on the base URL.
    #[must_use]
    pub fn auth_endpoint(&self, path: &str) -> String {
        format!(
            "{}/auth/v1/{}",
            self.url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) const fn service_role_key(&self) -> &SecretString {
        &self.service_role_key
    }

    pub(crate) const fn anon_key(&self) -> &SecretString {
        &self.anon_key
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("url", &self.url.as_str())
            .field("service_role_key", &"***")
            .field("anon_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn accepts_https_url() {
        let config =
            ProviderConfig::new("https://abc.supabase.co", secret("service"), secret("anon"))
                .unwrap();
        assert_eq!(config.url().host_str(), Some("abc.supabase.co"));
        assert_eq!(
            config.timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ProviderConfig::new("ftp://abc.supabase.co", secret("s"), secret("a"))
            .unwrap_err();
        assert!(err.to_string().contains("must use http or https"));
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = ProviderConfig::new("not a url", secret("s"), secret("a")).unwrap_err();
        assert!(err.to_string().contains("Invalid identity provider URL"));
    }

    #[test]
    fn rejects_empty_keys() {
        let err =
            ProviderConfig::new("https://abc.supabase.co", secret(" "), secret("a")).unwrap_err();
        assert!(err.to_string().contains("service role key is empty"));

        let err =
            ProviderConfig::new("https://abc.supabase.co", secret("s"), secret("")).unwrap_err();
        assert!(err.to_string().contains("anon key is empty"));
    }

    #[test]
    fn auth_endpoint_handles_trailing_slash() {
        let config =
            ProviderConfig::new("https://abc.supabase.co/", secret("s"), secret("a")).unwrap();
        assert_eq!(
            config.auth_endpoint("/admin/users"),
            "https://abc.supabase.co/auth/v1/admin/users"
        );
    }

    #[test]
    fn debug_redacts_keys() {
        let config = ProviderConfig::new(
            "https://abc.supabase.co",
            secret("service-secret"),
            secret("anon-secret"),
        )
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("service-secret"));
        assert!(!debug.contains("anon-secret"));
    }
}
