//! Helpers for bootstrapping embedded PostgreSQL in integration tests.
//!
//! `pg-embed-setup-unpriv` defaults to using `/var/tmp` for installation and
//! data directories. Under sandboxed runners, writing outside of the
//! workspace is blocked, so tests that rely on the embedded cluster need to
//! override these paths. This module scopes `PG_RUNTIME_DIR` and
//! `PG_DATA_DIR` overrides to the bootstrap call and serialises environment
//! mutation to avoid global environment races across parallel tests.
//!
//! The library's shared cluster handle intentionally leaks so the cluster
//! persists for the process lifetime. Test binaries run as separate
//! processes, and a still-running PostgreSQL blocks subsequent binaries from
//! bootstrapping on the same data directory, so a `libc::atexit` handler
//! sends `SIGTERM` to the postmaster when each binary exits.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;

static PG_EMBED_BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Postmaster PID captured at registration time.
static PG_POSTMASTER_PID: AtomicI32 = AtomicI32::new(0);

/// Data directory for re-reading `postmaster.pid` at exit time.
static PG_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Maximum number of retry attempts for transient bootstrap errors.
const MAX_RETRIES: u32 = 3;

/// Base delay between retry attempts (doubles with each retry).
const RETRY_DELAY_MS: u64 = 500;

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("pg-embed")
}

fn create_unique_pg_embed_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    let unique = format!("bootstrap-{}-{nanos}", std::process::id());
    let base = pg_embed_target_dir().join(unique);
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");

    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    Ok((runtime_dir, data_dir))
}

/// Ensures `PG_PASSWORD` is set to a stable value so the password remains
/// consistent across process invocations that reuse the same data directory.
///
/// `Settings::default()` generates a random password on each call. When the
/// data directory already exists, setup skips `initdb`, leaving the cluster
/// configured with the *original* password; without a stable override, later
/// test processes fail with `28P01 password authentication failed`.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: called before the library spawns any threads; the bootstrap
        // mutex serialises access, so this runs at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "poolside_embedded_test");
        }
    }
}

/// Returns the shared cluster handle, bootstrapping it when needed.
///
/// Retries transient failures since embedded PostgreSQL binary downloads can
/// fail intermittently when running parallel test suites, and registers the
/// process-exit cleanup once a handle exists.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap_guard = PG_EMBED_BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    ensure_stable_password();

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();

    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) =
            create_unique_pg_embed_dirs().map_err(|err| err.to_string())?;

        let runtime_dir_value = runtime_dir.to_string_lossy().into_owned();
        let data_dir_value = data_dir.to_string_lossy().into_owned();

        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir_value)),
            ("PG_DATA_DIR", Some(data_dir_value)),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=MAX_RETRIES {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => {
                register_process_exit_cleanup(handle);
                return Ok(handle);
            }
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt < MAX_RETRIES {
                    let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                    eprintln!(
                        "pg-embed: bootstrap attempt {}/{} failed, retrying in {delay:?}: {last_error}",
                        attempt + 1,
                        MAX_RETRIES + 1,
                    );
                    std::thread::sleep(delay);
                }
            }
        }
    }

    Err(last_error)
}

/// Reads the postmaster PID from the `postmaster.pid` file in `data_dir`.
fn read_postmaster_pid(data_dir: &Path) -> Option<i32> {
    let content = std::fs::read_to_string(data_dir.join("postmaster.pid")).ok()?;
    content.lines().next()?.trim().parse().ok()
}

/// Sends SIGTERM to the PostgreSQL postmaster and waits for shutdown.
///
/// Registered via `libc::atexit` so the shared cluster is stopped when the
/// test binary exits. Re-reads `postmaster.pid` at exit time and only
/// signals when the on-disk PID still matches the stored value, guarding
/// against PID reuse.
extern "C" fn stop_postgres_on_exit() {
    let stored_pid = PG_POSTMASTER_PID.load(Ordering::Relaxed);
    if stored_pid <= 0 {
        return;
    }

    let pid = match PG_DATA_DIR.get().and_then(|dir| read_postmaster_pid(dir)) {
        Some(current_pid) if current_pid == stored_pid => current_pid,
        _ => return,
    };

    // SAFETY: `pid` was validated against the on-disk `postmaster.pid`.
    // SIGTERM triggers a graceful "smart shutdown"; signal 0 probes liveness.
    unsafe {
        if libc::kill(pid, libc::SIGTERM) != 0 {
            return;
        }
    }

    // Wait up to five seconds for PostgreSQL to exit gracefully.
    for _ in 0..50 {
        std::thread::sleep(Duration::from_millis(100));
        // SAFETY: signal 0 checks whether the process still exists.
        if unsafe { libc::kill(pid, 0) } != 0 {
            return;
        }
    }

    // SAFETY: force-kill after the graceful shutdown budget expires.
    unsafe {
        libc::kill(pid, libc::SIGKILL);
    }
}

/// Records the postmaster PID and registers an `atexit` handler so the
/// shared cluster is stopped when the test binary exits. Uses
/// `compare_exchange` to ensure the handler is registered at most once.
fn register_process_exit_cleanup(handle: &ClusterHandle) {
    let data_dir = &handle.settings().data_dir;
    let Some(pid) = read_postmaster_pid(data_dir) else {
        return;
    };

    if PG_POSTMASTER_PID
        .compare_exchange(0, pid, Ordering::Relaxed, Ordering::Relaxed)
        .is_err()
    {
        return;
    }

    let _ = PG_DATA_DIR.set(data_dir.clone());

    // SAFETY: `stop_postgres_on_exit` is a valid `extern "C"` function with
    // no preconditions beyond the atomic PID being set (done above).
    let rc = unsafe { libc::atexit(stop_postgres_on_exit) };
    if rc != 0 {
        eprintln!(
            "pg-embed: failed to register atexit handler (rc={rc}); \
             PostgreSQL process (PID {pid}) may outlive the test binary"
        );
    }
}
