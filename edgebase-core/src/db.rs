use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const CREATE_EDGES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS edges (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_id TEXT NOT NULL,
        target_id TEXT NOT NULL,
        relationship_type TEXT NOT NULL,
        strength REAL NOT NULL
    )
"#;

// The edge key is enforced by idx_edges_key alone. Files written before that
// index existed may hold repeated rows for one
// conceptual edge. The highest id is the latest write and wins.
const COLLAPSE_DUPLICATE_EDGES: &str = r#"
    DELETE FROM edges
    WHERE id NOT IN (
        SELECT MAX(id) FROM edges
        GROUP BY source_id, target_id, relationship_type
    )
"#;

const CREATE_EDGE_INDEXES: [&str; 3] = [
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_edges_key ON edges(source_id, target_id, relationship_type)",
    "CREATE INDEX IF NOT EXISTS idx_edges_source ON edges(source_id)",
    "CREATE INDEX IF NOT EXISTS idx_edges_target ON edges(target_id)",
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    if config.is_in_memory() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // The database lives and dies with its only connection.
        return SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    if let Some(parent) = Path::new(&config.path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .connect_with(options)
        .await
}

/// Bring the edge schema up to date. Safe to run on every open.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(CREATE_EDGES_TABLE).execute(&mut *tx).await?;

    let collapsed = sqlx::query(COLLAPSE_DUPLICATE_EDGES)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if collapsed > 0 {
        tracing::warn!(collapsed, "Collapsed duplicate edge rows from an older schema");
    }

    for statement in CREATE_EDGE_INDEXES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await
}

pub async fn health_check(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

// ============================================================================
// TESTS
// ============================================================================
