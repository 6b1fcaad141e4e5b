//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - Registered users
//! - `pets` - Pet listings
//! - `adoptions` - Adoption requests
//! - `donations` - Donations
//! - `snapshot` - Aggregate counts, adoption metrics and the anomaly scan
//! - `stats` - Read-only statistics for the stats endpoints
//! - `audit` - Audit log

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod adoptions;
mod audit;
mod donations;
mod pets;
mod snapshot;
mod stats;
mod users;

pub use audit::{AuditEntry, AuditFilter};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Timestamp layout used by every DATETIME column
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Format a timestamp the way SQLite's CURRENT_TIMESTAMP does
///
/// Keeping one layout lets recency windows compare as plain strings.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and apply migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` so every pooled
    /// connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "adopta_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Size of the database file in bytes, as SQLite reports it
    pub fn size_bytes(&self) -> Result<i64> {
        let conn = self.conn()?;
        let size: i64 = conn.query_row(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
            [],
            |row| row.get(0),
        )?;
        Ok(size)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                google_id TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_users_created ON users(created_at);

            CREATE TABLE IF NOT EXISTS pets (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                species TEXT NOT NULL,
                breed TEXT,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL CHECK (gender IN ('macho', 'hembra')),
                description TEXT NOT NULL,
                image_url TEXT,
                size TEXT NOT NULL CHECK (size IN ('pequeño', 'mediano', 'grande')),
                status TEXT NOT NULL DEFAULT 'disponible'
                    CHECK (status IN ('disponible', 'adoptado', 'en_proceso')),
                location TEXT NOT NULL,
                vaccinated INTEGER NOT NULL DEFAULT 0,
                sterilized INTEGER NOT NULL DEFAULT 0,
                characteristics TEXT,  -- JSON array
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_pets_status ON pets(status);

            CREATE TABLE IF NOT EXISTS adoptions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                pet_id INTEGER NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
                status TEXT NOT NULL DEFAULT 'pendiente'
                    CHECK (status IN ('pendiente', 'aprobada', 'rechazada', 'completada')),
                message TEXT,
                admin_notes TEXT,
                approved_at DATETIME,
                completed_at DATETIME,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_adoptions_status ON adoptions(status);
            CREATE INDEX IF NOT EXISTS idx_adoptions_created ON adoptions(created_at);
            CREATE INDEX IF NOT EXISTS idx_adoptions_user ON adoptions(user_id);

            CREATE TABLE IF NOT EXISTS donations (
                id INTEGER PRIMARY KEY,
                user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
                amount REAL NOT NULL,
                donor_name TEXT,
                donor_email TEXT,
                message TEXT,
                status TEXT NOT NULL DEFAULT 'pendiente'
                    CHECK (status IN ('pendiente', 'completada', 'fallida')),
                payment_method TEXT,
                transaction_id TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status);
            CREATE INDEX IF NOT EXISTS idx_donations_created ON donations(created_at);

            -- Audit log (who called which endpoint)
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
                user_email TEXT NOT NULL,
                action TEXT NOT NULL,
                entity_type TEXT,
                entity_id INTEGER,
                details TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
