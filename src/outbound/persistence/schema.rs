//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts table.
    ///
    /// The `id` column is a store-assigned `BIGSERIAL` primary key; `nickname`
    /// carries a server-side default of `'noname'`.
    users (id) {
        /// Primary key: store-assigned 64-bit identifier.
        id -> Int8,
        /// Display nickname.
        nickname -> Text,
    }
}
