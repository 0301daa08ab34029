//! Wire-level message definitions for the WebSocket adapter.
//!
//! Inbound frames are JSON requests tagged by `action`; outbound frames are
//! either the serialized entity or an inline error payload. Errors never
//! close the connection.

use serde::{Deserialize, Serialize};

use crate::domain::Error;

/// Inbound request payload provided by the client.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum WsRequest {
    /// Create a user; `name` falls back to the store default.
    Add { name: Option<String> },
    /// Look up a user through the selected acquisition strategy.
    Get { id: i64, method: Option<String> },
}

/// Outbound error payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WsError {
    error: String,
}

impl WsError {
    /// Payload for malformed JSON, unknown actions, or unusable fields.
    pub fn invalid_payload() -> Self {
        Self {
            error: "Invalid JSON".to_owned(),
        }
    }

    /// Payload for a lookup that matched no row.
    pub fn not_found() -> Self {
        Self {
            error: "not found".to_owned(),
        }
    }

    /// Map a gateway failure onto the wire, keeping `NotFound` stable.
    pub fn from_domain(error: &Error) -> Self {
        if error.is_not_found() {
            return Self::not_found();
        }
        Self {
            error: error.message().to_owned(),
        }
    }
}
