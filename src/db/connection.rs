use rusqlite::{Connection, Result};
use std::path::Path;

const CREATE_LOCAL_STORAGE: &str = "CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

pub fn establish_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute(CREATE_LOCAL_STORAGE, [])?;
    log::debug!("opened storage at {}", path.display());
    Ok(conn)
}

#[cfg(test)]
pub fn establish_test_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute(CREATE_LOCAL_STORAGE, [])?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_establish_connection_creates_table() {
        let dir = tempdir().unwrap();
        let conn = establish_connection(&dir.path().join("store.db")).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_establish_connection_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let conn = establish_connection(&path).unwrap();
            conn.execute(
                "INSERT INTO local_storage (key, value) VALUES ('k', 'v')",
                [],
            )
            .unwrap();
        }
        let conn = establish_connection(&path).unwrap();
        let value: String = conn
            .query_row("SELECT value FROM local_storage WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "v");
    }
}
