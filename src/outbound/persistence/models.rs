//! Row structs bridging the Diesel schema and domain types.

use diesel::prelude::*;

use crate::domain::User;

use super::schema::users;

/// A `users` row as read from PostgreSQL.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub nickname: String,
}

impl UserRow {
    /// Convert a database row to the domain entity.
    pub fn into_user(self) -> User {
        User::new(self.id, self.nickname)
    }
}

/// Insertable payload for a new user.
///
/// The `id` column is store-assigned; omitting `nickname` would fall back to
/// the column default, but the gateway always resolves the nickname before
/// inserting so the created entity can be returned without a re-read.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub nickname: &'a str,
}
