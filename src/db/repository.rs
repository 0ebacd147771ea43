use crate::db::storage::{self, TRANSACTIONS_KEY};
use crate::error::StorageError;
use crate::models::transaction::Transaction;
use rusqlite::Connection;
use serde_json::Value;

/// Owner of the persisted transaction sequence.
///
/// Writes replace the whole sequence; readers only ever get snapshots.
pub trait TransactionRepository {
    /// Current snapshot in insertion order. Missing data is an empty sequence.
    fn load(&self) -> Result<Vec<Transaction>, StorageError>;

    /// Appends to the end of the sequence and returns the new snapshot.
    /// Records already stored are written back exactly as they were read.
    fn append(&self, transaction: Transaction) -> Result<Vec<Transaction>, StorageError>;

    /// The stored blob exactly as persisted, if any.
    fn raw(&self) -> Result<Option<String>, StorageError>;
}

pub struct LocalStorageRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LocalStorageRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl TransactionRepository for LocalStorageRepository<'_> {
    fn load(&self) -> Result<Vec<Transaction>, StorageError> {
        let Some(blob) = self.raw()? else {
            log::debug!("no stored transactions, starting empty");
            return Ok(Vec::new());
        };
        let transactions: Vec<Transaction> =
            serde_json::from_str(&blob).map_err(|source| StorageError::Decode {
                key: TRANSACTIONS_KEY.to_string(),
                source,
            })?;
        log::debug!("loaded {} transactions", transactions.len());
        Ok(transactions)
    }

    fn append(&self, transaction: Transaction) -> Result<Vec<Transaction>, StorageError> {
        // Stored records stay raw JSON; only the new one goes through `Transaction`.
        let mut records: Vec<Value> = match self.raw()? {
            Some(blob) => serde_json::from_str(&blob).map_err(|source| StorageError::Decode {
                key: TRANSACTIONS_KEY.to_string(),
                source,
            })?,
            None => Vec::new(),
        };
        let record = serde_json::to_value(&transaction).map_err(|source| StorageError::Encode {
            key: TRANSACTIONS_KEY.to_string(),
            source,
        })?;
        records.push(record);

        let blob = serde_json::to_string(&records).map_err(|source| StorageError::Encode {
            key: TRANSACTIONS_KEY.to_string(),
            source,
        })?;
        storage::set_item(self.conn, TRANSACTIONS_KEY, &blob)?;
        log::info!("stored {} transactions", records.len());
        self.load()
    }

    fn raw(&self) -> Result<Option<String>, StorageError> {
        storage::get_item(self.conn, TRANSACTIONS_KEY)
    }
}
