use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists; it also records applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250105_0001_create_persons_and_duties",
        description: "Created persons and duties tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS persons (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL UNIQUE,
            is_admin   INTEGER NOT NULL DEFAULT 0,
            is_active  INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS duties (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            duty_date      TEXT NOT NULL UNIQUE,
            person_id      INTEGER NOT NULL REFERENCES persons(id),
            priority_class TEXT NOT NULL CHECK (priority_class IN ('admin','volunteer','fair')),
            created_at     TEXT NOT NULL,
            completed_at   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_duties_person_date ON duties(person_id, duty_date);
        "#,
    },
    Migration {
        version: "20250212_0002_add_queue_counters",
        description: "Added admin/volunteer queue counters to persons",
        sql: r#"
        ALTER TABLE persons ADD COLUMN admin_queue_days INTEGER NOT NULL DEFAULT 0
            CHECK (admin_queue_days >= 0);
        ALTER TABLE persons ADD COLUMN volunteer_queue_days INTEGER NOT NULL DEFAULT 0
            CHECK (volunteer_queue_days >= 0);
        "#,
    },
    Migration {
        version: "20250318_0003_add_off_duty_window",
        description: "Added off-duty window to persons",
        sql: r#"
        ALTER TABLE persons ADD COLUMN off_duty_start TEXT;
        ALTER TABLE persons ADD COLUMN off_duty_end TEXT;
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [migration.version, migration.description],
    )?;
    tx.commit()
}

/// Names of migrations not yet recorded in `log`.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, oldest first.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}
