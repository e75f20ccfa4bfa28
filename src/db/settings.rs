//! Small key/value table for values that outlive a restart. Today that is
//! only the display name.

use rusqlite::{params, OptionalExtension};

use crate::error::AppResult;
use crate::state::DbPool;

const USERNAME_KEY: &str = "username";

pub fn load_username(pool: &DbPool) -> AppResult<Option<String>> {
    let conn = pool.get()?;
    let value = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![USERNAME_KEY],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Store `name`, or forget it when `None`.
pub fn save_username(pool: &DbPool, name: Option<&str>) -> AppResult<()> {
    let conn = pool.get()?;
    match name {
        Some(name) => {
            conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                params![USERNAME_KEY, name],
            )?;
        }
        None => {
            conn.execute("DELETE FROM settings WHERE key = ?1", params![USERNAME_KEY])?;
        }
    }
    Ok(())
}
