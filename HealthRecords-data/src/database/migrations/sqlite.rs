use rusqlite::Connection;
use tracing::info;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    info!("Running SQLite migrations");

    create_health_records_table(conn)?;
    create_patient_id_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the health records table if not exists.
///
/// Each row holds one JSON document; `patient_id` and `created_at` are
/// copied out of it so they can be queried and indexed.
fn create_health_records_table(conn: &Connection) -> Result<(), String> {
    info!("Creating health_records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS health_records (
            id TEXT PRIMARY KEY,
            patient_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            document TEXT NOT NULL
        )",
        [],
    ).map_err(|e| e.to_string())?;

    Ok(())
}

/// Create index on patient_id for lookups by patient
fn create_patient_id_index(conn: &Connection) -> Result<(), String> {
    info!("Creating index on patient_id");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_health_records_patient_id
        ON health_records (patient_id)",
        [],
    ).map_err(|e| format!("Failed to create index: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'health_records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
