use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// SQL expression for "now" with millisecond precision. The fixed-width
/// `YYYY-MM-DD HH:MM:SS.SSS` text sorts chronologically.
pub const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// Create the `users`, `profiles` and `pages` tables if they are missing.
/// Safe to call on every start.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS users (
            username    TEXT PRIMARY KEY,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT ({NOW})
        );

        CREATE TABLE IF NOT EXISTS profiles (
            username    TEXT PRIMARY KEY,
            description TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS pages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL UNIQUE,
            content     TEXT NOT NULL,
            author      TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT ({NOW}),
            updated_at  TEXT NOT NULL DEFAULT ({NOW})
        );

        CREATE INDEX IF NOT EXISTS idx_pages_updated
            ON pages(updated_at DESC, id DESC);
        "
    ))?;

    info!("Database migrations complete");
    Ok(())
}
