use crate::db::storage::{self, TEMPLATE_KEY};
use crate::error::StorageError;
use crate::models::template::DashboardTemplate;
use rusqlite::Connection;

/// Stored template, or `Default` when none has been chosen yet.
pub fn get_template(conn: &Connection) -> Result<DashboardTemplate, StorageError> {
    match storage::get_item(conn, TEMPLATE_KEY)? {
        Some(id) => id.parse(),
        None => Ok(DashboardTemplate::default()),
    }
}

pub fn set_template(conn: &Connection, template: DashboardTemplate) -> Result<(), StorageError> {
    storage::set_item(conn, TEMPLATE_KEY, template.id())?;
    log::info!("dashboard template set to {}", template);
    Ok(())
}

pub fn clear_template(conn: &Connection) -> Result<(), StorageError> {
    if storage::remove_item(conn, TEMPLATE_KEY)? {
        log::info!("dashboard template reset to default");
    }
    Ok(())
}
