use crate::provider::ProviderConfig;
use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_SUPABASE_URL: &str = "supabase-url";
pub const ARG_SERVICE_ROLE_KEY: &str = "supabase-service-role-key";
pub const ARG_ANON_KEY: &str = "supabase-anon-key";
pub const ARG_PROVIDER_TIMEOUT: &str = "provider-timeout";

pub struct Options {
    pub url: String,
    pub service_role_key: SecretString,
    pub anon_key: SecretString,
    pub timeout_seconds: u64,
}

impl Options {
    /// Parse identity provider arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or blank.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read_required = |id: &str| -> Result<String> {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            url: read_required(ARG_SUPABASE_URL)?,
            service_role_key: SecretString::from(read_required(ARG_SERVICE_ROLE_KEY)?),
            anon_key: SecretString::from(read_required(ARG_ANON_KEY)?),
            timeout_seconds: matches
                .get_one::<u64>(ARG_PROVIDER_TIMEOUT)
                .copied()
                .unwrap_or(crate::provider::DEFAULT_TIMEOUT_SECONDS),
        })
    }

    /// Validate the options into a [`ProviderConfig`].
    ///
    /// # Errors
    /// Returns an error if the URL or keys are invalid.
    pub fn into_config(self) -> Result<ProviderConfig> {
        let config = ProviderConfig::new(&self.url, self.service_role_key, self.anon_key)
            .with_context(|| format!("invalid --{ARG_SUPABASE_URL} / provider keys"))?;

        Ok(config.with_timeout(Duration::from_secs(self.timeout_seconds)))
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SUPABASE_URL)
                .long(ARG_SUPABASE_URL)
                .help("Identity provider base URL, example: https://<project>.supabase.co")
                .env("SUPABASE_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_SERVICE_ROLE_KEY)
                .long(ARG_SERVICE_ROLE_KEY)
                .help("Service role key, used only for user creation and listing")
                .env("SUPABASE_SERVICE_ROLE_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ANON_KEY)
                .long(ARG_ANON_KEY)
                .help("Public anon key, used for password sign-in and /me lookups")
                .env("SUPABASE_ANON_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT)
                .long(ARG_PROVIDER_TIMEOUT)
                .help("Identity provider request timeout in seconds")
                .env("VET_API_PROVIDER_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
