//! Actix extractor wiring for request-scoped connections.
//!
//! Extracting a [`RequestConnection`] checks one pooled connection out for
//! the request; the pool reclaims it when the request's last handle drops.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::RequestConnection;

impl FromRequest for RequestConnection {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(state) = state else {
                return Err(ApiError::from(Error::internal(
                    "database state is not configured",
                )));
            };
            RequestConnection::checkout(state.pool()).await.map_err(|err| {
                ApiError::from(Error::internal(format!("connection checkout failed: {err}")))
            })
        })
    }
}
