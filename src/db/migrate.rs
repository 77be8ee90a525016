use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result, params};

/// Ordered schema steps. Each runs once and is recorded in `schema_migrations`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20250301_0001_create_trainees",
        "Created trainees table",
        r#"
        CREATE TABLE IF NOT EXISTS trainees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            created_at  TEXT
        );
        "#,
    ),
    (
        "20250301_0002_create_programs",
        "Created programs table with trainee index",
        r#"
        CREATE TABLE IF NOT EXISTS programs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            trainee_id   TEXT NOT NULL,
            title        TEXT NOT NULL DEFAULT '',
            data         TEXT NOT NULL DEFAULT '[[""],[""]]',
            order_index  INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_programs_trainee ON programs(trainee_id);
        "#,
    ),
    (
        "20250301_0003_create_history",
        "Created history table with trainee index",
        r#"
        CREATE TABLE IF NOT EXISTS history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp     TEXT NOT NULL,
            trainee_id    TEXT NOT NULL,
            trainee_name  TEXT NOT NULL DEFAULT '',
            action        TEXT NOT NULL,
            description   TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_history_trainee ON history(trainee_id);
        "#,
    ),
];

fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version     TEXT PRIMARY KEY,
            applied_at  TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let found: Option<i32> = conn
        .query_row(
            "SELECT 1 FROM schema_migrations WHERE version = ?1",
            [version],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Versions already recorded, oldest first.
pub fn applied_versions(conn: &Connection) -> Result<Vec<String>> {
    ensure_migrations_table(conn)?;
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations. Returns how many ran.
pub fn run_pending_migrations(conn: &mut Connection) -> Result<usize> {
    ensure_migrations_table(conn)?;

    let mut applied = 0;
    for (version, description, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at, description)
             VALUES (?1, datetime('now'), ?2)",
            params![version, description],
        )?;
        tx.commit()?;

        tracing::info!(version, "migration applied");
        success(format!("Migration applied: {version} → {description}"));
        applied += 1;
    }

    Ok(applied)
}
