//! Schema migrations for the cache database.

use crate::Error;
use tokio_rusqlite::Connection;

/// Ordered list of migrations. Each entry is (version, sql).
const MIGRATIONS: &[(&str, &str)] = &[
    ("001_cache_stores", include_str!("../../migrations/001_cache_stores.sql")),
    ("002_entry_lookup_index", include_str!("../../migrations/002_entry_lookup_index.sql")),
];

/// Runs all pending migrations on the given connection.
///
/// Applied versions are tracked in a `_migrations` table so reopening an
/// existing database is a no-op.
pub(crate) async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
        )
        .map_err(|e| Error::MigrationFailed(e.to_string()))?;

        for (version, sql) in MIGRATIONS {
            let applied: bool = conn
                .query_row("SELECT COUNT(*) FROM _migrations WHERE version = ?1", [version], |row| {
                    row.get::<_, i64>(0).map(|n| n > 0)
                })
                .map_err(|e| Error::MigrationFailed(e.to_string()))?;

            if !applied {
                conn.execute_batch(sql).map_err(|e| Error::MigrationFailed(format!("{version}: {e}")))?;
                conn.execute(
                    "INSERT INTO _migrations (version, applied_at) VALUES (?1, datetime('now'))",
                    [version],
                )
                .map_err(|e| Error::MigrationFailed(format!("{version}: {e}")))?;
            }
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_rusqlite::rusqlite;

    #[tokio::test]
    async fn test_migrations_apply_once() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();

        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();

        let tables: Vec<String> = conn
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
                let names = stmt.query_map([], |row| row.get::<_, String>(0))?.collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .unwrap();

        assert!(tables.contains(&"stores".to_string()));
        assert!(tables.contains(&"entries".to_string()));
    }
}
