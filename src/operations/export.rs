use crate::db::repository::TransactionRepository;
use crate::error::ExportError;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub fn export_file_name(today: NaiveDate) -> String {
    format!("finance-tracker-export-{}.json", today.format("%Y-%m-%d"))
}

/// Writes the stored transaction blob, byte for byte, into `dir`.
pub fn export_transactions(
    repo: &impl TransactionRepository,
    dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let blob = repo.raw()?.ok_or(ExportError::NoData)?;

    let path = dir.join(export_file_name(today));
    fs::write(&path, blob).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("exported transactions to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::db::repository::LocalStorageRepository;
    use crate::db::storage::{self, TRANSACTIONS_KEY};
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 9).unwrap()
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(today()), "finance-tracker-export-2025-11-09.json");
    }

    #[test]
    fn test_export_writes_blob_verbatim() {
        let conn = establish_test_connection().unwrap();
        // odd spacing must survive: the export is a pass-through
        let blob = r#"[ {"id":"1","amount":5,"category":"Food","date":"2025-01-01T00:00:00Z","type":"expense"} ]"#;
        storage::set_item(&conn, TRANSACTIONS_KEY, blob).unwrap();
        let dir = tempdir().unwrap();

        let path =
            export_transactions(&LocalStorageRepository::new(&conn), dir.path(), today()).unwrap();

        assert_eq!(path, dir.path().join("finance-tracker-export-2025-11-09.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), blob);
    }

    #[test]
    fn test_export_without_data() {
        let conn = establish_test_connection().unwrap();
        let dir = tempdir().unwrap();

        let result = export_transactions(&LocalStorageRepository::new(&conn), dir.path(), today());
        assert!(matches!(result, Err(ExportError::NoData)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_empty_array_is_still_data() {
        let conn = establish_test_connection().unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, "[]").unwrap();
        let dir = tempdir().unwrap();

        let path =
            export_transactions(&LocalStorageRepository::new(&conn), dir.path(), today()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_export_into_missing_directory() {
        let conn = establish_test_connection().unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, "[]").unwrap();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = export_transactions(&LocalStorageRepository::new(&conn), &missing, today());
        assert!(matches!(result, Err(ExportError::Io { .. })));
    }
}
