//! Service entry-point: wires the pool, schema lifecycle, and both transports.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poolside::outbound::persistence::SchemaScope;
use poolside::server::{DbSettings, build_states, create_server};

const BIND_ADDR: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DbSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("configuration failed: {err}")))?;

    // The scope guarantees schema teardown on every exit path, including
    // failures in the steps below.
    let schema = SchemaScope::ensure(&settings.database_url()).map_err(std::io::Error::other)?;

    let (http_state, ws_state) = build_states(&settings)
        .await
        .map_err(std::io::Error::other)?;

    let bind_addr: SocketAddr = BIND_ADDR
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid bind address: {err}")))?;
    let server = create_server(http_state, ws_state, bind_addr)?;
    let result = server.await;

    if let Err(err) = schema.teardown() {
        error!(error = %err, "schema teardown failed at shutdown");
    }
    result
}
