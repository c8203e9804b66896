//! Printer repository: upserts and lookups for the `printers` table.

use rusqlite::{params, OptionalExtension, Row};

use crate::model::{PrinterRecord, UNKNOWN_PRINTER_IP};

use super::{Database, DatabaseError};

/// A raw printer row from the database.
#[derive(Debug, Clone)]
pub struct PrinterRow {
    pub id: i64,
    pub name: String,
    pub ip_address: String,
    pub location: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PrinterRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            ip_address: row.get("ip_address")?,
            location: row.get("location")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

/// Inserts the printer or refreshes an existing row with the same name.
///
/// A missing ip address or location keeps whatever is already stored; a new
/// printer without an address gets `UNKNOWN_PRINTER_IP`.
pub fn upsert(db: &Database, printer: &PrinterRecord) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO printers (name, ip_address, location)
             VALUES (?1, COALESCE(?2, ?4), ?3)
             ON CONFLICT(name) DO UPDATE SET
                ip_address = COALESCE(?2, printers.ip_address),
                location = COALESCE(?3, printers.location),
                updated_at = datetime('now')",
            params![
                printer.name,
                printer.ip_address,
                printer.location,
                UNKNOWN_PRINTER_IP,
            ],
        )?;
        Ok(())
    })
}

/// Finds a printer by its unique name.
pub fn find_by_name(db: &Database, name: &str) -> Result<Option<PrinterRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM printers WHERE name = ?1",
                params![name],
                PrinterRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Counts all known printers.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM printers", [], |r| r.get(0))?;
        Ok(count)
    })
}
