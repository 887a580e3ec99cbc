//! Current-user lookup.
//!
//! The bearer token is forwarded to the provider on its own; the service role
//! key is never attached to this request.

use super::{UserSummary, bearer_token};
use crate::{
    api::error::{ApiError, ErrorBody},
    provider::IdentityProvider,
};
use axum::{Json, extract::Extension, http::HeaderMap};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Me {
    ok: bool,
    user: UserSummary,
}

#[utoipa::path(
    get,
    path = "/me",
    responses (
        (status = 200, description = "User owning the bearer token", body = Me),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorBody),
        (status = 500, description = "Identity provider unreachable", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn me(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    headers: HeaderMap,
) -> Result<Json<Me>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::MissingToken)?;

    match provider.get_user(token).await {
        Ok(Some(user)) => Ok(Json(Me {
            ok: true,
            user: user.into(),
        })),
        Ok(None) => {
            debug!("token resolved to no user");
            Err(ApiError::InvalidToken)
        }
        Err(err) if err.is_rejected() => {
            debug!("provider refused token: {err}");
            Err(ApiError::InvalidToken)
        }
        Err(err) => {
            error!("Error resolving current user: {err}");
            Err(ApiError::Unexpected(err.to_string()))
        }
    }
}
