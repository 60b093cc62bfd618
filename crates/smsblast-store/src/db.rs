use rusqlite::Connection;

use crate::error::Result;

/// Open the database at `path` with WAL journaling so readers are not
/// blocked while a writer is in flight.
pub fn open(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Initialise the schema in `conn`. Safe to call on every startup (idempotent).
///
/// `send_time`, `status` and `created_at` carry store-assigned defaults so
/// inserts only name the columns the caller actually decides.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            content         TEXT NOT NULL,
            send_time       DATETIME DEFAULT CURRENT_TIMESTAMP,
            status          TEXT DEFAULT 'pending',
            recipient_count INTEGER DEFAULT 0,
            error_message   TEXT
        );

        CREATE TABLE IF NOT EXISTS scheduled_meta (
            sid         TEXT PRIMARY KEY,
            send_at_iso TEXT NOT NULL,
            created_at  DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;
    Ok(())
}
