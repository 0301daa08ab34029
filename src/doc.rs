//! OpenAPI surface assembled from the HTTP handlers.

use utoipa::OpenApi;

use crate::domain::{ErrorCode, User};
use crate::inbound::http::error::ApiError;

/// Public OpenAPI surface used by tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::index,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::add_user,
    ),
    components(schemas(User, ApiError, ErrorCode)),
    tags(
        (name = "status", description = "Liveness and pool diagnostics"),
        (name = "users", description = "Keyed user lookups and creation")
    )
)]
pub struct ApiDoc;
