//! Command-line argument dispatch.
//!
//! This module maps validated CLI arguments (or environment fallbacks) to the
//! action to run. The serverless adapter reuses [`server_args`] so both
//! deployment targets validate configuration the same way.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DISABLE_ME, ARG_HOST, ARG_PORT, provider};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(server_args(matches)?))
}

/// Build the gateway arguments shared by both deployment adapters.
///
/// # Errors
/// Returns an error if the identity provider configuration is missing or invalid.
pub fn server_args(matches: &clap::ArgMatches) -> Result<Args> {
    let host = matches
        .get_one::<String>(ARG_HOST)
        .cloned()
        .unwrap_or_else(|| "0.0.0.0".to_string());
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);
    let me_route = !matches.get_flag(ARG_DISABLE_ME);

    let provider = provider::Options::parse(matches)?
        .into_config()
        .context("identity provider configuration is invalid")?;

    Ok(Args {
        host,
        port,
        provider,
        me_route,
    })
}
