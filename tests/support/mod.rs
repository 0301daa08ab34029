//! Shared helpers for the integration suites.
//!
//! Integration tests under `tests/` compile as separate crates, so shared
//! setup lives here to avoid copy/paste drift between the HTTP and
//! WebSocket suites.

pub mod pg_embed;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use pg_embedded_setup_unpriv::TemporaryDatabase;
use url::Url;

use poolside::outbound::persistence::SchemaScope;
use poolside::server::DbSettings;

/// Inactive-connection lifetime every suite configures, in seconds.
pub const POOL_IDLE_LIFETIME_SECS: f64 = 59.0;

static BOUND_POOL_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serialises tests that rebind the process-wide pool.
///
/// The bound pool is a per-process global; tests standing up independent
/// application instances must hold this guard so concurrent suites do not
/// observe each other's databases through the process-bound strategy.
pub fn bound_pool_guard() -> MutexGuard<'static, ()> {
    BOUND_POOL_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner())
}

/// Report an unavailable embedded cluster and skip the test.
pub fn handle_cluster_setup_failure<T>(reason: String) -> Option<T> {
    eprintln!("SKIP-TEST-CLUSTER: embedded cluster unavailable: {reason}");
    None
}

/// How a suite feeds the database location into the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Host/port/user/password/database keyword parts.
    Keyword,
    /// A single DSN string.
    Dsn,
}

/// Build keyword-style settings pointing at `url`.
pub fn keyword_settings(url: &str) -> DbSettings {
    let parsed = Url::parse(url).expect("cluster URL should parse");
    DbSettings {
        host: parsed.host_str().map(ToOwned::to_owned),
        port: parsed.port(),
        user: (!parsed.username().is_empty()).then(|| parsed.username().to_owned()),
        password: parsed.password().map(ToOwned::to_owned),
        database: parsed
            .path()
            .strip_prefix('/')
            .map(ToOwned::to_owned),
        pool_max_size: Some(4),
        pool_min_idle: Some(1),
        pool_idle_timeout_secs: Some(POOL_IDLE_LIFETIME_SECS),
        ..DbSettings::default()
    }
}

/// Build DSN-style settings pointing at `url`.
pub fn dsn_settings(url: &str) -> DbSettings {
    DbSettings {
        dsn: Some(url.to_owned()),
        pool_max_size: Some(4),
        pool_min_idle: Some(1),
        pool_idle_timeout_secs: Some(POOL_IDLE_LIFETIME_SECS),
        ..DbSettings::default()
    }
}

/// One test's database: a temporary database on the shared cluster with the
/// schema applied and settings describing how to reach it.
///
/// Field order matters: the schema guard reverts migrations while the
/// temporary database still exists.
pub struct DatabaseContext {
    pub settings: DbSettings,
    _schema: SchemaScope,
    _database: TemporaryDatabase,
}

/// A process-unique database name for a temporary test database.
fn unique_database_name() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("poolside_test_{}_{seq}", std::process::id())
}

/// Provision a temporary database and apply the schema.
///
/// Returns an error string suitable for [`handle_cluster_setup_failure`]
/// when the embedded cluster cannot be used.
pub fn setup_database(source: ConfigSource) -> Result<DatabaseContext, String> {
    let cluster = pg_embed::shared_cluster()?;
    let database = cluster
        .temporary_database(unique_database_name())
        .map_err(|err| format!("{err:?}"))?;
    let url = database.url().to_string();

    let settings = match source {
        ConfigSource::Keyword => keyword_settings(&url),
        ConfigSource::Dsn => dsn_settings(&url),
    };

    let schema = SchemaScope::ensure(&settings.database_url()).map_err(|err| err.to_string())?;

    Ok(DatabaseContext {
        settings,
        _schema: schema,
        _database: database,
    })
}
