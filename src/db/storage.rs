//! String key/value store with the semantics of browser local storage:
//! whole values are read and replaced, never patched.

use crate::error::StorageError;
use rusqlite::{Connection, OptionalExtension};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const TEMPLATE_KEY: &str = "dashboardTemplate";

pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
    let value = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

pub fn remove_item(conn: &Connection, key: &str) -> Result<bool, StorageError> {
    let rows = conn.execute("DELETE FROM local_storage WHERE key = ?1", [key])?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_get_item_missing() {
        let conn = establish_test_connection().unwrap();
        assert_eq!(get_item(&conn, "nothing").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let conn = establish_test_connection().unwrap();
        set_item(&conn, TEMPLATE_KEY, "minimal").unwrap();
        assert_eq!(
            get_item(&conn, TEMPLATE_KEY).unwrap(),
            Some("minimal".to_string())
        );
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let conn = establish_test_connection().unwrap();
        set_item(&conn, TRANSACTIONS_KEY, "[1]").unwrap();
        set_item(&conn, TRANSACTIONS_KEY, "[1,2]").unwrap();
        assert_eq!(
            get_item(&conn, TRANSACTIONS_KEY).unwrap(),
            Some("[1,2]".to_string())
        );
    }

    #[test]
    fn test_keys_are_independent() {
        let conn = establish_test_connection().unwrap();
        set_item(&conn, TRANSACTIONS_KEY, "[]").unwrap();
        set_item(&conn, TEMPLATE_KEY, "detailed").unwrap();
        assert_eq!(get_item(&conn, TRANSACTIONS_KEY).unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_remove_item() {
        let conn = establish_test_connection().unwrap();
        set_item(&conn, TEMPLATE_KEY, "minimal").unwrap();

        assert!(remove_item(&conn, TEMPLATE_KEY).unwrap());
        assert!(!remove_item(&conn, TEMPLATE_KEY).unwrap());
        assert_eq!(get_item(&conn, TEMPLATE_KEY).unwrap(), None);
    }
}
