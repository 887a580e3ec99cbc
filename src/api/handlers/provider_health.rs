use crate::{
    api::error::{ApiError, ErrorBody},
    provider::IdentityProvider,
};
use axum::{Json, extract::Extension};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, instrument};
use utoipa::ToSchema;

// Smallest page the admin listing accepts; enough to prove the key works.
const PROBE_PAGE_SIZE: u32 = 1;

#[derive(ToSchema, Serialize, Debug)]
pub struct ProviderHealth {
    ok: bool,
    #[serde(rename = "usersReturned")]
    users_returned: usize,
}

#[utoipa::path(
    get,
    path = "/supabase-ok",
    responses (
        (status = 200, description = "Identity provider reachable with the service role key", body = ProviderHealth),
        (status = 500, description = "Identity provider rejected the probe or is unreachable", body = ErrorBody),
    ),
    tag = "health"
)]
#[instrument(skip(provider))]
pub async fn provider_health(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
) -> Result<Json<ProviderHealth>, ApiError> {
    match provider.list_users(PROBE_PAGE_SIZE).await {
        Ok(users) => Ok(Json(ProviderHealth {
            ok: true,
            users_returned: users.len(),
        })),
        Err(err) => {
            error!("Identity provider health probe failed: {err}");
            Err(ApiError::ProviderUnavailable(err.to_string()))
        }
    }
}
