mod from_row;
mod schema;
pub mod queries;

pub use from_row::{FromRow, query_one};
pub use schema::init_db;

use std::sync::Arc;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::DbConfig;
use crate::error;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// License registry and activation ledger
    pub db: DbPool,
    /// Credential checked on admin routes (None = admin routes disabled)
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db: DbPool, api_key: Option<String>) -> Self {
        Self {
            db,
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Per-connection setup: lock waits are bounded, cascades are enforced and
/// readers do not block the single writer.
fn configure_connection(
    conn: &mut rusqlite::Connection,
    busy_timeout: Duration,
) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )
}

pub fn create_pool(database_path: &str, config: &DbConfig) -> Result<DbPool, r2d2::Error> {
    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(move |conn| configure_connection(conn, busy_timeout));
    Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
        .build(manager)
}

/// Single-connection in-memory pool. Each SQLite memory connection is its own
/// database, so the pool must never open a second one.
pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| configure_connection(conn, Duration::from_secs(5)));
    Pool::builder().max_size(1).build(manager)
}

/// Check out a connection and run `f` on the blocking thread pool.
///
/// SQLite calls block (lock waits up to the busy timeout), so they stay off
/// the async worker threads.
pub async fn run_blocking<T, F>(pool: &DbPool, f: F) -> error::Result<T>
where
    F: FnOnce(&mut rusqlite::Connection) -> error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await?
}
