use crate::api::Deployment;
use axum::{Json, extract::Extension};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Root {
    ok: bool,
    message: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses (
        (status = 200, description = "Static acknowledgement", body = Root, content_type = "application/json"),
    ),
    tag = "gateway"
)]
// axum handler for /
pub async fn root(Extension(deployment): Extension<Deployment>) -> Json<Root> {
    Json(Root {
        ok: true,
        message: deployment.welcome_message().to_string(),
    })
}
