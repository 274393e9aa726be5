//! Database connection management

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

const CREATE_ORDERS: &str = r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_name TEXT NOT NULL,
        table_number TEXT,
        takeaway INTEGER NOT NULL DEFAULT 0,
        items TEXT NOT NULL,
        total TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )"#;

// Menu catalog: created with the schema, not read or written by any operation yet.
const CREATE_MENU: &str = r#"
    CREATE TABLE IF NOT EXISTS menu (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        sizes TEXT,
        price TEXT,
        available INTEGER
    )"#;

/// SQLite database connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database file and make sure the schema exists
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::info!("SQLite connection pool established ({})", database_url);
        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Private in-memory database on a single pinned connection.
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool
    /// must never open a second one or recycle the first.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_ORDERS).execute(&self.pool).await?;
        sqlx::query(CREATE_MENU).execute(&self.pool).await?;
        tracing::debug!("Schema ready (orders, menu)");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_in_memory_schema_created() {
        let db = Database::in_memory().await.unwrap();
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('orders', 'menu') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["menu", "orders"]);
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        db.init_schema().await.unwrap();
        assert!(db.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_file_database_connect() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("cafe.db").display());

        let db = Database::connect(&url, 2).await;
        assert!(db.is_ok(), "Should create and open the database file");
        assert!(dir.path().join("cafe.db").exists());
    }
}
