//! PostgreSQL-backed lookup gateway using Diesel ORM.
//!
//! The gateway resolves one pooled connection per call according to the
//! requested [`LookupStrategy`], runs the keyed query on it, and surfaces a
//! missing row as [`ErrorCode::NotFound`](crate::domain::ErrorCode) so
//! adapters can special-case absence without inspecting messages.

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::{DEFAULT_NICKNAME, Error, LookupStrategy, User};

use super::connection::RequestConnection;
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError, process_pool};
use super::schema::users;

/// Diesel-backed lookup gateway over a shared connection pool.
///
/// Holds two handles onto the application's pool: its own default handle and
/// the application-state handle wired at server construction. The remaining
/// strategies acquire through owned checkouts, the request-bound connection,
/// or the process-wide bound pool.
#[derive(Clone)]
pub struct UserGateway {
    pool: DbPool,
    shared: DbPool,
}

impl UserGateway {
    /// Create a gateway over `pool`, reusing it as the application handle.
    pub fn new(pool: DbPool) -> Self {
        let shared = pool.clone();
        Self { pool, shared }
    }

    /// The gateway's default pool handle.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Resolve the user with `id` through the connection `strategy`.
    ///
    /// Read-only; absence is reported as a `NotFound` error distinguishable
    /// from pool and query failures.
    ///
    /// # Errors
    ///
    /// `NotFound` when no row matches `id`; `InternalError` when the
    /// connection cannot be acquired or the query fails.
    pub async fn get_or_404(
        &self,
        ctx: Option<&RequestConnection>,
        id: i64,
        strategy: LookupStrategy,
    ) -> Result<User, Error> {
        match strategy {
            LookupStrategy::PoolDefault => self.lookup_default(id).await,
            LookupStrategy::OwnedCheckout => {
                let mut conn = self.pool.get_owned().await.map_err(map_pool_error)?;
                first_or_404(&mut conn, id).await
            }
            LookupStrategy::RequestScoped => match ctx {
                Some(request) => {
                    let mut conn = request.lock().await;
                    first_or_404(&mut conn, id).await
                }
                None => self.lookup_default(id).await,
            },
            LookupStrategy::ProcessBound => {
                let pool = process_pool()
                    .ok_or_else(|| Error::internal("no process-wide pool is bound"))?;
                let mut conn = pool.get().await.map_err(map_pool_error)?;
                first_or_404(&mut conn, id).await
            }
            LookupStrategy::AppShared => {
                let mut conn = self.shared.get().await.map_err(map_pool_error)?;
                first_or_404(&mut conn, id).await
            }
        }
    }

    /// Insert a user and verify the new row is visible through the other
    /// acquisition paths before returning it.
    ///
    /// `nickname` falls back to [`DEFAULT_NICKNAME`] when absent.
    ///
    /// # Errors
    ///
    /// `InternalError` when the insert fails or when any confirmation read
    /// cannot see the new row.
    pub async fn create_and_confirm(
        &self,
        ctx: Option<&RequestConnection>,
        nickname: Option<String>,
    ) -> Result<User, Error> {
        let nickname = nickname.unwrap_or_else(|| DEFAULT_NICKNAME.to_owned());
        let created = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            insert_user(&mut conn, &nickname).await?
        };
        debug!(id = created.id(), "created user");

        // Read-after-write: every acquisition path must observe the new row
        // before the caller is told it exists.
        self.get_or_404(None, created.id(), LookupStrategy::PoolDefault)
            .await?;
        self.get_or_404(None, created.id(), LookupStrategy::AppShared)
            .await?;
        self.get_or_404(None, created.id(), LookupStrategy::ProcessBound)
            .await?;
        if ctx.is_some() {
            self.get_or_404(ctx, created.id(), LookupStrategy::RequestScoped)
                .await?;
        }

        Ok(created)
    }

    async fn lookup_default(&self, id: i64) -> Result<User, Error> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        first_or_404(&mut conn, id).await
    }
}

/// Select the user with `id` on an already-acquired connection.
async fn first_or_404(conn: &mut AsyncPgConnection, id: i64) -> Result<User, Error> {
    let row = users::table
        .find(id)
        .select(UserRow::as_select())
        .first::<UserRow>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(UserRow::into_user)
        .ok_or_else(|| Error::not_found(format!("user {id} not found")))
}

/// Insert a user row, returning the stored entity with its assigned id.
async fn insert_user(conn: &mut AsyncPgConnection, nickname: &str) -> Result<User, Error> {
    let row: UserRow = diesel::insert_into(users::table)
        .values(NewUserRow { nickname })
        .returning(UserRow::as_returning())
        .get_result(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(row.into_user())
}

/// Map pool errors to domain errors.
fn map_pool_error(error: PoolError) -> Error {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            Error::internal(format!("connection pool failure: {message}"))
        }
    }
}

/// Map Diesel errors to domain errors.
fn map_diesel_error(error: diesel::result::Error) -> Error {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => Error::not_found("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            Error::internal("database connection error")
        }
        _ => Error::internal("database error"),
    }
}
