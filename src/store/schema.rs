use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::core::{InvoiceRecord, InvoiceStatus};

/// Column list shared by every `SELECT`, in [`read_record`] order.
pub(crate) const COLUMNS: &str = "id, invoice_number, trip_date, origin, destination, \
     distance_km, duration_min, base_fare, tax_amount, total_amount, \
     client_email, status, notes";

pub(crate) fn configure(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;\n\
         PRAGMA synchronous = NORMAL;\n\
         PRAGMA temp_store = MEMORY;\n",
    )?;
    conn.busy_timeout(Duration::from_millis(5000))?;
    Ok(())
}

pub(crate) fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_number TEXT NOT NULL UNIQUE,
            trip_date TEXT NOT NULL,
            origin TEXT NOT NULL,
            destination TEXT NOT NULL,
            distance_km TEXT NOT NULL,
            duration_min INTEGER NOT NULL,
            base_fare TEXT NOT NULL,
            tax_amount TEXT NOT NULL,
            total_amount TEXT NOT NULL,
            client_email TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'issued',
            notes TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_invoices_trip_date ON invoices(trip_date);
        "#,
    )
}

pub(crate) fn read_record(row: &Row<'_>) -> Result<InvoiceRecord, rusqlite::Error> {
    let status: String = row.get(11)?;
    Ok(InvoiceRecord {
        id: row.get(0)?,
        invoice_number: row.get(1)?,
        trip_date: row.get(2)?,
        origin: row.get(3)?,
        destination: row.get(4)?,
        distance_km: decimal(row, 5)?,
        duration_min: row.get(6)?,
        base_fare: decimal(row, 7)?,
        tax_amount: decimal(row, 8)?,
        total_amount: decimal(row, 9)?,
        client_email: row.get(10)?,
        status: InvoiceStatus::from_code(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                11,
                Type::Text,
                format!("unknown invoice status '{status}'").into(),
            )
        })?,
        notes: row.get(12)?,
    })
}

fn decimal(row: &Row<'_>, idx: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
