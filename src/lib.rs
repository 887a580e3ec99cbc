//! # vet-api (Auth Gateway)
//!
//! `vet-api` is a thin HTTP gateway in front of a hosted, GoTrue-compatible
//! identity provider (Supabase Auth). It exposes register, login and `/me`
//! routes and relays the provider's answers in a fixed JSON shape.
//!
//! ## Credentials
//!
//! Two privilege levels are kept apart:
//!
//! - **Service role key:** elevated secret used only for user provisioning and
//!   user listing. It never leaves the gateway and is redacted from logs.
//! - **Anon key + bearer token:** password sign-in and `/me` lookups use the
//!   public key, and `/me` forwards only the caller's bearer token.
//!
//! ## Deployment
//!
//! The same router is served by two adapters: the standalone server started by
//! the `vet-api` binary (`cli::actions::server`) and the [`serverless`] adapter,
//! which builds the router from the environment and handles requests without
//! binding a port.
//!
//! ## Error Mapping
//!
//! Missing fields return `400` without calling the provider. Provider rejections
//! are passed through on register and genericized on login and `/me` so callers
//! cannot probe which accounts exist. Transport failures return `500`.

pub mod api;
pub mod cli;
pub mod provider;
pub mod serverless;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
