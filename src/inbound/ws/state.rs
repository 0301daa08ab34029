//! Shared WebSocket adapter state.

use crate::outbound::persistence::UserGateway;

/// Dependency bundle for WebSocket sessions.
#[derive(Clone)]
pub struct WsState {
    gateway: UserGateway,
}

impl WsState {
    pub fn new(gateway: UserGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &UserGateway {
        &self.gateway
    }
}
