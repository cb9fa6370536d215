use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use super::schema::{self, COLUMNS};
use crate::core::{FactureError, InvoiceRecord, InvoiceStatus, NewInvoice};

/// SQLite-backed invoice store.
///
/// The connection sits behind a mutex: every write is one critical
/// section, so two racing appends are serialized and neither is lost.
#[derive(Debug)]
pub struct InvoiceStore {
    conn: Mutex<Connection>,
}

impl InvoiceStore {
    /// Open (or create) the store at `path`. The parent directory must exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FactureError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            FactureError::Persistence(format!("cannot open {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "opened invoice store");
        Self::with_connection(conn)
    }

    /// A throwaway store, for tests and dry runs.
    pub fn open_in_memory() -> Result<Self, FactureError> {
        let conn = Connection::open_in_memory().map_err(persistence)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, FactureError> {
        schema::configure(&conn).map_err(persistence)?;
        schema::init(&conn).map_err(persistence)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Persist a new invoice and return its freshly assigned id.
    ///
    /// Fails with [`FactureError::DuplicateNumber`] if the invoice number is
    /// already taken; nothing is written in that case.
    pub fn append(&self, invoice: &NewInvoice) -> Result<i64, FactureError> {
        let conn = self.lock()?;

        let taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM invoices WHERE invoice_number = ?1)",
                params![invoice.invoice_number],
                |row| row.get(0),
            )
            .map_err(persistence)?;
        if taken {
            warn!(number = %invoice.invoice_number, "invoice number already in store");
            return Err(FactureError::DuplicateNumber(invoice.invoice_number.clone()));
        }

        let inserted = conn.execute(
            "INSERT INTO invoices (invoice_number, trip_date, origin, destination, \
             distance_km, duration_min, base_fare, tax_amount, total_amount, \
             client_email, status, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                invoice.invoice_number,
                invoice.trip_date,
                invoice.origin,
                invoice.destination,
                invoice.distance_km.to_string(),
                invoice.duration_min,
                invoice.base_fare.to_string(),
                invoice.tax_amount.to_string(),
                invoice.total_amount.to_string(),
                invoice.client_email,
                invoice.status.code(),
                invoice.notes,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(FactureError::DuplicateNumber(invoice.invoice_number.clone()));
            }
            Err(e) => return Err(persistence(e)),
        }

        let id = conn.last_insert_rowid();
        info!(id, number = %invoice.invoice_number, total = %invoice.total_amount, "invoice appended");
        Ok(id)
    }

    /// Every record, in insertion order (ascending id).
    pub fn list_all(&self) -> Result<Vec<InvoiceRecord>, FactureError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM invoices ORDER BY id"))
            .map_err(persistence)?;
        let rows = stmt
            .query_map([], schema::read_record)
            .map_err(persistence)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(persistence)?;
        debug!(count = rows.len(), "listed invoices");
        Ok(rows)
    }

    /// Records whose trip date falls in `[date_from, date_to]` (inclusive,
    /// by calendar date), optionally restricted to one status. Rows holding
    /// the legacy French label of that status match too.
    ///
    /// An inverted range yields an empty list.
    pub fn list_filtered(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<InvoiceRecord>, FactureError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM invoices \
                 WHERE substr(trip_date, 1, 10) BETWEEN ?1 AND ?2 \
                 AND (?3 IS NULL OR trim(status) IN (?3, ?4)) \
                 ORDER BY id"
            ))
            .map_err(persistence)?;
        let rows = stmt
            .query_map(
                params![
                    date_from,
                    date_to,
                    status.map(|s| s.code()),
                    status.map(|s| s.label())
                ],
                schema::read_record,
            )
            .map_err(persistence)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(persistence)?;
        debug!(%date_from, %date_to, ?status, count = rows.len(), "filtered invoices");
        Ok(rows)
    }

    pub fn get(&self, id: i64) -> Result<Option<InvoiceRecord>, FactureError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM invoices WHERE id = ?1"),
            params![id],
            schema::read_record,
        )
        .optional()
        .map_err(persistence)
    }

    pub fn find_by_number(&self, number: &str) -> Result<Option<InvoiceRecord>, FactureError> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM invoices WHERE invoice_number = ?1"),
            params![number],
            schema::read_record,
        )
        .optional()
        .map_err(persistence)
    }

    pub fn count(&self) -> Result<u64, FactureError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))
            .map_err(persistence)?;
        Ok(count.max(0) as u64)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, FactureError> {
        self.conn
            .lock()
            .map_err(|_| FactureError::Persistence("invoice store mutex poisoned".into()))
    }
}

fn persistence(e: rusqlite::Error) -> FactureError {
    FactureError::Persistence(e.to_string())
}
