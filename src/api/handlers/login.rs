use super::{CredentialsRequest, UserSummary};
use crate::{
    api::error::{ApiError, ErrorBody},
    provider::IdentityProvider,
};
use axum::{Json, extract::Extension};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct LoggedIn {
    token: String,
    user: UserSummary,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses (
        (status = 200, description = "Session issued by the identity provider", body = LoggedIn, content_type = "application/json"),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Unknown account or wrong password, always reported as `invalid credentials`", body = ErrorBody),
        (status = 500, description = "No token issued, or identity provider unreachable", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn login(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<LoggedIn>, ApiError> {
    let Some(Json(request)) = payload else {
        debug!("login: missing or malformed payload");
        return Err(ApiError::MissingFields);
    };

    let credentials = request.into_credentials()?;

    let session = match provider.sign_in_with_password(&credentials).await {
        Ok(session) => session,
        Err(err) if err.is_rejected() => {
            // Never relay the provider reason; it tells whether the account exists.
            debug!("provider refused login: {err}");
            return Err(ApiError::InvalidCredentials);
        }
        Err(err) => {
            error!("Error signing in: {err}");
            return Err(ApiError::Unexpected(err.to_string()));
        }
    };

    let Some(token) = session.access_token.filter(|token| !token.is_empty()) else {
        error!("provider accepted login but returned no access token");
        return Err(ApiError::NoTokenGenerated);
    };

    Ok(Json(LoggedIn {
        token,
        user: session.user.into(),
    }))
}
