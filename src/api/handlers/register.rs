use super::{CredentialsRequest, UserSummary};
use crate::{
    api::error::{ApiError, ErrorBody},
    provider::IdentityProvider,
};
use axum::{Json, extract::Extension};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Registered {
    ok: bool,
    user: UserSummary,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses (
        (status = 200, description = "User created with the email already confirmed", body = Registered, content_type = "application/json"),
        (status = 400, description = "Missing email/password, or the provider refused the user (message passed through)", body = ErrorBody),
        (status = 500, description = "Identity provider unreachable", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn register(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<Registered>, ApiError> {
    let Some(Json(request)) = payload else {
        debug!("register: missing or malformed payload");
        return Err(ApiError::MissingFields);
    };

    let credentials = request.into_credentials()?;

    match provider.create_user(&credentials).await {
        Ok(user) => {
            info!(user_id = %user.id, "user registered");
            Ok(Json(Registered {
                ok: true,
                user: user.into(),
            }))
        }
        Err(err) if err.is_rejected() => {
            debug!("provider refused registration: {err}");
            Err(ApiError::ProviderRejected(err.to_string()))
        }
        Err(err) => {
            error!("Error creating user: {err}");
            Err(ApiError::Unexpected(err.to_string()))
        }
    }
}
