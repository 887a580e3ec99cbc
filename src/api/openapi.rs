use crate::api::{
    error::ErrorBody,
    handlers::{self, CredentialsRequest, UserSummary},
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root::root,
        handlers::health::health,
        handlers::provider_health::provider_health,
        handlers::register::register,
        handlers::login::login,
        handlers::me::me,
    ),
    components(schemas(CredentialsRequest, UserSummary, ErrorBody)),
    modifiers(&BearerAuth),
    tags(
        (name = "gateway", description = "Gateway acknowledgement"),
        (name = "health", description = "Build and identity provider health"),
        (name = "auth", description = "Register, login and current user, relayed to the identity provider"),
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    // Use Cargo.toml metadata instead of the utoipa defaults.
    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);

    doc
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
