//! The user entity resolved by the lookup gateway.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Nickname applied when a creation request carries no name.
pub const DEFAULT_NICKNAME: &str = "noname";

/// A stored user row, serialized verbatim on both transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned primary key.
    #[schema(example = 1)]
    id: i64,
    /// Display nickname, defaulting to [`DEFAULT_NICKNAME`].
    #[schema(example = "fantix")]
    nickname: String,
}

impl User {
    pub fn new(id: i64, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn nickname(&self) -> &str {
        self.nickname.as_str()
    }
}
