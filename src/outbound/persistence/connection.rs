//! Request-scoped pooled connections.
//!
//! One inbound HTTP request owns at most one of these. The checkout happens
//! when the adapter extracts the handle and the underlying connection returns
//! to the pool when the last clone drops, so release is guaranteed on every
//! exit path. The async mutex keeps concurrent uses of one request's
//! connection exclusive.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::pool::{DbPool, OwnedConn, PoolError};

/// A pooled connection bound to the lifetime of one inbound request.
#[derive(Clone)]
pub struct RequestConnection {
    conn: Arc<Mutex<OwnedConn>>,
}

impl RequestConnection {
    /// Check a connection out of `pool` for the current request.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Checkout` when the pool cannot supply a
    /// connection within its configured timeout.
    pub async fn checkout(pool: &DbPool) -> Result<Self, PoolError> {
        let conn = pool.get_owned().await?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Exclusive access to the request's connection.
    pub async fn lock(&self) -> MutexGuard<'_, OwnedConn> {
        self.conn.lock().await
    }
}
