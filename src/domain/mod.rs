//! Transport-agnostic domain types.

mod error;
mod strategy;
mod user;

pub use error::{Error, ErrorCode, ErrorValidationError};
pub use strategy::LookupStrategy;
pub use user::{DEFAULT_NICKNAME, User};
