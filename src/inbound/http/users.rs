//! Users API handlers.
//!
//! ```text
//! GET /
//! GET /users/{id}?method={0..4}
//! POST /users  name=<nickname>
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, LookupStrategy, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::RequestConnection;

/// Index greeting, doubling as a pool-configuration probe.
///
/// Extracting [`RequestConnection`] proves a pooled connection can be checked
/// out inside a request; the handler then verifies the pool carries the
/// inactive-connection lifetime the configuration asked for.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service greeting"),
        (status = 500, description = "Pool misconfigured", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["status"],
    operation_id = "index"
)]
#[get("/")]
pub async fn index(state: web::Data<HttpState>, _conn: RequestConnection) -> ApiResult<HttpResponse> {
    if state.pool().idle_timeout() != state.expected_idle_timeout() {
        return Err(Error::internal("pool idle timeout drifted from configured value").into());
    }
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hello, world!"))
}

/// Query parameters for a keyed lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    /// Connection-acquisition strategy selector, `"0"`–`"4"`.
    method: Option<String>,
}

/// Fetch one user by id through the selected acquisition strategy.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = i64, Path, description = "User identifier"),
        ("method" = Option<String>, Query, description = "Connection-acquisition strategy selector")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No user with this id", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<LookupQuery>,
    conn: RequestConnection,
) -> ApiResult<web::Json<User>> {
    let strategy = LookupStrategy::from_selector(query.method.as_deref());
    let user = state
        .gateway()
        .get_or_404(Some(&conn), path.into_inner(), strategy)
        .await?;
    Ok(web::Json(user))
}

/// Form payload for user creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserForm {
    /// Nickname; the store default applies when absent.
    name: Option<String>,
}

/// Create a user and confirm read-after-write visibility.
#[utoipa::path(
    post,
    path = "/users",
    responses(
        (status = 200, description = "Created user", body = User),
        (status = 500, description = "Creation failed", body = crate::inbound::http::error::ApiError)
    ),
    tags = ["users"],
    operation_id = "addUser"
)]
#[post("/users")]
pub async fn add_user(
    state: web::Data<HttpState>,
    form: web::Form<CreateUserForm>,
    conn: RequestConnection,
) -> ApiResult<web::Json<User>> {
    let user = state
        .gateway()
        .create_and_confirm(Some(&conn), form.into_inner().name)
        .await?;
    Ok(web::Json(user))
}
