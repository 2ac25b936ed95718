use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // accounts, medications, schedules, dose_logs, user_preferences, schema_version
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 6, "Expected 6 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Run migrations again — should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn dose_log_occurrence_is_unique() {
        let conn = open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO accounts (id, display_name, created_at) VALUES ('a1', 'Pat', datetime('now'))",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO medications (id, account_id, name, dosage, form, frequency_type,
             grace_minutes, reminder_minutes, cutoff_minutes, created_at)
             VALUES ('m1', 'a1', 'Metformin', '500mg', 'tablet', 'Twice daily', 60, 30, 240, datetime('now'))",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO schedules (id, medication_id, time_of_day) VALUES ('s1', 'm1', '08:00')",
            [],
        )
        .unwrap();

        conn.execute(
            "INSERT INTO dose_logs (id, medication_id, schedule_id, scheduled_time, action, status, acted_at)
             VALUES ('d1', 'm1', 's1', '2026-08-01T08:00:00+00:00', 'taken', 'ON_TIME', datetime('now'))",
            [],
        )
        .unwrap();

        // Second log for the same occurrence must be rejected by the index.
        let dup = conn.execute(
            "INSERT INTO dose_logs (id, medication_id, schedule_id, scheduled_time, action, status, acted_at)
             VALUES ('d2', 'm1', 's1', '2026-08-01T08:00:00+00:00', 'skipped', 'MISSED', datetime('now'))",
            [],
        );
        assert!(dup.is_err());
    }
}
