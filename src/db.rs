use std::time::Duration;

use rusqlite::{ffi, params, Connection, DatabaseName, OptionalExtension, Result};

/// Stored in `PRAGMA user_version`. Bump it together with a new step in
/// `upgrade_schema`.
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

pub fn open_connection(path: &str) -> Result<Connection> {
    let mut conn = Connection::open(path)?;
    configure_connection(&conn)?;
    upgrade_schema(&mut conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.pragma_update(None::<DatabaseName>, "journal_mode", "WAL")?;
    conn.pragma_update(None::<DatabaseName>, "synchronous", "NORMAL")?;
    conn.pragma_update(None::<DatabaseName>, "temp_store", "MEMORY")?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    conn.pragma_query_value(None::<DatabaseName>, "user_version", |row| row.get(0))
}

/// Brings an older database up to `CURRENT_SCHEMA_VERSION`. A database
/// written by a newer liftlog is refused rather than guessed at.
fn upgrade_schema(conn: &mut Connection) -> Result<()> {
    let found = schema_version(conn)?;
    if found > CURRENT_SCHEMA_VERSION {
        return Err(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CANTOPEN),
            Some(format!(
                "database schema version {} is newer than supported version {}",
                found, CURRENT_SCHEMA_VERSION
            )),
        ));
    }
    if found == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if found < 1 {
        tx.execute_batch(
            r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#,
        )?;
    }
    tx.pragma_update(None::<DatabaseName>, "user_version", CURRENT_SCHEMA_VERSION)?;
    tx.commit()?;
    tracing::debug!(from = found, to = CURRENT_SCHEMA_VERSION, "schema upgraded");
    Ok(())
}

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// SQLite resolves table names without regard to ASCII case, so the lookup
/// does too.
pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master \
         WHERE type = 'table' AND name = ?1 COLLATE NOCASE)",
        [table_name],
        |row| row.get(0),
    )
}

/// Quotes `name` as an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests;
