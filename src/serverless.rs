//! Serverless adapter.
//!
//! Platforms that invoke a request handler instead of running a listener use
//! [`ServerlessApp`]: it is configured from the environment once, then every
//! invocation goes through [`ServerlessApp::handle`]. Routes, middleware and
//! error mapping are the ones the standalone server mounts; only the greeting
//! on `/` differs.

use crate::{
    api::{Deployment, Gateway},
    cli::{actions::server::Args, commands, dispatch},
};
use anyhow::{Context, Result};
use axum::{Router, body::Body, extract::Request, response::Response};
use tower::ServiceExt;
use tracing::debug;

#[derive(Clone)]
pub struct ServerlessApp {
    router: Router,
}

impl ServerlessApp {
    /// Read the provider configuration from the environment and build the router.
    ///
    /// Uses the same variables and validation as the standalone server
    /// (`SUPABASE_URL`, `SUPABASE_SERVICE_ROLE_KEY`, `SUPABASE_ANON_KEY`, ...).
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self> {
        let matches = commands::new()
            .try_get_matches_from([env!("CARGO_PKG_NAME")])
            .context("serverless configuration is incomplete")?;

        Self::from_args(&dispatch::server_args(&matches)?)
    }

    /// # Errors
    /// Returns an error if the provider HTTP client cannot be built.
    pub fn from_args(args: &Args) -> Result<Self> {
        debug!(provider = %args.provider.url(), "Building serverless gateway");

        Ok(Self::from_gateway(&args.gateway(Deployment::Serverless)?))
    }

    #[must_use]
    pub fn from_gateway(gateway: &Gateway) -> Self {
        Self {
            router: gateway.router(),
        }
    }

    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve a single request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::Value;

    const PROVIDER_ENV: [&str; 3] = [
        "SUPABASE_URL",
        "SUPABASE_SERVICE_ROLE_KEY",
        "SUPABASE_ANON_KEY",
    ];

    #[test]
    fn missing_configuration_fails_with_diagnostic() {
        temp_env::with_vars_unset(PROVIDER_ENV, || {
            let result = ServerlessApp::from_env();
            assert!(result.is_err());
            if let Err(err) = result {
                let chain = format!("{err:#}");
                assert!(chain.contains("serverless configuration is incomplete"));
                assert!(chain.contains("--supabase-url"));
            }
        });
    }

    #[test]
    fn invalid_url_fails_with_diagnostic() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("ftp://abc.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                ("SUPABASE_ANON_KEY", Some("anon")),
            ],
            || {
                let result = ServerlessApp::from_env();
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(format!("{err:#}").contains("must use http or https"));
                }
            },
        );
    }

    #[tokio::test]
    async fn handle_serves_serverless_greeting() -> anyhow::Result<()> {
        let app = temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                ("SUPABASE_ANON_KEY", Some("anon")),
                ("VET_API_DISABLE_ME", None),
            ],
            ServerlessApp::from_env,
        )?;

        let response = app
            .handle(Request::builder().uri("/").body(Body::empty())?)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "API running on serverless");
        Ok(())
    }

    #[tokio::test]
    async fn handle_mounts_me_route() -> anyhow::Result<()> {
        let app = temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_SERVICE_ROLE_KEY", Some("service")),
                ("SUPABASE_ANON_KEY", Some("anon")),
                ("VET_API_DISABLE_ME", None),
            ],
            ServerlessApp::from_env,
        )?;

        // No bearer token: rejected before any provider call.
        let response = app
            .handle(Request::builder().uri("/me").body(Body::empty())?)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // The exposed router carries the same routes as `handle`.
        let response = app
            .router()
            .oneshot(Request::builder().uri("/me").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
