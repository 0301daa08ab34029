//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data`, keeping them
//! free of construction-time wiring.

use std::time::Duration;

use crate::outbound::persistence::{DbPool, UserGateway};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    gateway: UserGateway,
    pool: DbPool,
    expected_idle_timeout: Option<Duration>,
}

impl HttpState {
    /// Bundle the gateway with the pool handle requests check out from.
    ///
    /// `expected_idle_timeout` is the inactive-connection lifetime the
    /// configuration asked for; the index endpoint verifies the pool was
    /// actually built with it.
    pub fn new(
        gateway: UserGateway,
        pool: DbPool,
        expected_idle_timeout: Option<Duration>,
    ) -> Self {
        Self {
            gateway,
            pool,
            expected_idle_timeout,
        }
    }

    pub fn gateway(&self) -> &UserGateway {
        &self.gateway
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn expected_idle_timeout(&self) -> Option<Duration> {
        self.expected_idle_timeout
    }
}
