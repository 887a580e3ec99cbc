use crate::{
    api::{self, Deployment, Gateway},
    provider::{GoTrueClient, ProviderConfig},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub host: String,
    pub port: u16,
    pub provider: ProviderConfig,
    pub me_route: bool,
}

impl Args {
    /// Build the gateway for `deployment`, constructing the provider client once.
    ///
    /// # Errors
    /// Returns an error if the provider HTTP client cannot be built.
    pub fn gateway(&self, deployment: Deployment) -> Result<Gateway> {
        let client = GoTrueClient::new(self.provider.clone())?;

        Ok(Gateway::new(Arc::new(client), deployment).with_me_route(self.me_route))
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the provider client cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Server args: {:?}", args);

    info!(
        provider = %args.provider.url(),
        "Starting standalone gateway"
    );

    let gateway = args.gateway(Deployment::Standalone)?;

    api::new(&args.host, args.port, gateway).await
}
