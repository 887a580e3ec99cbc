//! HTTP error mapping for gateway handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing fields")]
    MissingFields,

    /// Provider rejection passed through verbatim.
    #[error("{0}")]
    ProviderRejected(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no token generated")]
    NoTokenGenerated,

    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    /// Connectivity probe failed; rendered with `ok: false`.
    #[error("{0}")]
    ProviderUnavailable(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::ProviderRejected(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NoTokenGenerated | Self::ProviderUnavailable(_) | Self::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ok = matches!(self, Self::ProviderUnavailable(_)).then_some(false);
        let body = ErrorBody {
            ok,
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}
