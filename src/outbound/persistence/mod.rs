//! Persistence layer: Diesel schema, async pool, and the lookup gateway.

mod connection;
mod lifecycle;
mod models;
mod pool;
pub mod schema;
mod tls;
mod user_gateway;

pub use connection::RequestConnection;
pub use lifecycle::{MIGRATIONS, SchemaScope};
pub use pool::{
    DbPool, OwnedConn, PoolConfig, PoolError, PooledConn, TlsMode, bind_process_pool, process_pool,
};
pub use user_gateway::UserGateway;
