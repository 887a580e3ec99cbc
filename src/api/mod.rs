use crate::{
    api::handlers::{health, login, me, provider_health, register, root},
    provider::IdentityProvider,
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{Span, info, info_span};
use ulid::Ulid;

pub mod error;
pub mod handlers;
mod openapi;

pub use openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Which adapter is serving the gateway. Only the `/` greeting differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deployment {
    Standalone,
    Serverless,
}

impl Deployment {
    #[must_use]
    pub const fn welcome_message(self) -> &'static str {
        match self {
            Self::Standalone => "API running (Supabase Auth)",
            Self::Serverless => "API running on serverless",
        }
    }
}

/// Shared gateway wiring: one provider handle, injected into every handler.
#[derive(Clone)]
pub struct Gateway {
    provider: Arc<dyn IdentityProvider>,
    deployment: Deployment,
    me_route: bool,
}

impl Gateway {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, deployment: Deployment) -> Self {
        Self {
            provider,
            deployment,
            me_route: true,
        }
    }

    /// Mount or drop `GET /me`.
    #[must_use]
    pub const fn with_me_route(mut self, enabled: bool) -> Self {
        self.me_route = enabled;
        self
    }

    #[must_use]
    pub const fn deployment(&self) -> Deployment {
        self.deployment
    }

    #[must_use]
    pub const fn me_route(&self) -> bool {
        self.me_route
    }

    /// Build the router with every gateway route and the shared middleware stack.
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers(Any);

        let mut router = Router::new()
            .route("/", get(root::root))
            .route("/health", get(health::health).options(health::health))
            .route("/supabase-ok", get(provider_health::provider_health))
            .route("/auth/register", post(register::register))
            .route("/auth/login", post(login::login));

        if self.me_route {
            router = router.route("/me", get(me::me));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(self.deployment))
                .layer(Extension(self.provider.clone())),
        )
    }
}

/// Bind `host:port` and serve the gateway until SIGINT/SIGTERM.
/// # Errors
/// Return error if the listener cannot be bound or the server fails
pub async fn new(host: &str, port: u16, gateway: Gateway) -> Result<()> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;

    info!(
        "Listening on {} ({:?}, /me {})",
        listener.local_addr()?,
        gateway.deployment(),
        if gateway.me_route() { "enabled" } else { "disabled" }
    );

    axum::serve(listener, gateway.router().into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
