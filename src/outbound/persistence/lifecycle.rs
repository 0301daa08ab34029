//! Schema lifecycle management.
//!
//! Startup ensures the schema exists by running the embedded Diesel
//! migrations; shutdown reverts them. [`SchemaScope`] scopes the two so
//! teardown runs even when later startup steps fail.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::error;

use crate::domain::Error;

/// Embedded migrations from the crate's migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Guard tying schema teardown to scope exit.
///
/// `ensure` applies pending migrations and arms the guard; dropping an armed
/// guard reverts them. Use [`SchemaScope::teardown`] for an explicit,
/// fallible teardown at orderly shutdown.
#[derive(Debug)]
pub struct SchemaScope {
    database_url: String,
    armed: bool,
}

impl SchemaScope {
    /// Apply pending migrations and arm the teardown guard.
    ///
    /// # Errors
    ///
    /// `InternalError` when the database is unreachable or a migration fails.
    pub fn ensure(database_url: &str) -> Result<Self, Error> {
        let mut conn = establish(database_url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| Error::internal(format!("schema migration failed: {err}")))?;
        Ok(Self {
            database_url: database_url.to_owned(),
            armed: true,
        })
    }

    /// Revert the schema now, disarming the drop-time teardown.
    ///
    /// # Errors
    ///
    /// `InternalError` when the database is unreachable or a revert fails.
    pub fn teardown(mut self) -> Result<(), Error> {
        self.armed = false;
        revert(&self.database_url)
    }
}

impl Drop for SchemaScope {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = revert(&self.database_url) {
            error!(error = %err, "schema teardown failed during drop");
        }
    }
}

fn establish(database_url: &str) -> Result<PgConnection, Error> {
    PgConnection::establish(database_url)
        .map_err(|err| Error::internal(format!("schema connection failed: {err}")))
}

fn revert(database_url: &str) -> Result<(), Error> {
    let mut conn = establish(database_url)?;
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|err| Error::internal(format!("schema revert failed: {err}")))?;
    Ok(())
}
