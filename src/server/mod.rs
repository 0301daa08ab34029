//! Server construction and wiring.

mod config;

pub use config::DbSettings;

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{add_user, get_user, index};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use crate::outbound::persistence::{DbPool, PoolError, UserGateway, bind_process_pool};

/// Build the adapter states for one application instance.
///
/// Builds the pool from `settings`, binds it as the process-wide pool, and
/// wires the gateway into both adapter states.
///
/// # Errors
///
/// Propagates [`PoolError`] when the pool cannot be constructed.
pub async fn build_states(
    settings: &DbSettings,
) -> Result<(web::Data<HttpState>, web::Data<WsState>), PoolError> {
    let pool = DbPool::new(settings.pool_config()).await?;
    bind_process_pool(&pool);
    Ok(states_for_pool(pool, settings))
}

/// Wire adapter states over an existing pool.
///
/// Callers that need the process-wide strategy must bind the pool with
/// [`bind_process_pool`] themselves.
pub fn states_for_pool(
    pool: DbPool,
    settings: &DbSettings,
) -> (web::Data<HttpState>, web::Data<WsState>) {
    let gateway = UserGateway::new(pool.clone());
    let http_state = web::Data::new(HttpState::new(
        gateway.clone(),
        pool,
        settings.pool_idle_timeout(),
    ));
    let ws_state = web::Data::new(WsState::new(gateway));
    (http_state, ws_state)
}

/// Build the Actix application serving both transports.
pub fn build_app(
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .app_data(ws_state)
        .service(index)
        .service(get_user)
        .service(add_user)
        .service(ws::ws_entry)
}

/// Construct an Actix HTTP server bound to `bind_addr`.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    bind_addr: SocketAddr,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || build_app(http_state.clone(), ws_state.clone()))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
