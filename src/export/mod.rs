//! Spreadsheet export of the invoice history.
//!
//! The spreadsheet format is CSV; no binary workbook (`.xlsx`/`.ods`) is
//! produced. The file is one that French spreadsheet software opens directly:
//! semicolon separators, comma decimal separator, CRLF line ends, quoted
//! text fields and a UTF-8 byte order mark. Columns are the invoice table's
//! columns, in table order.
//!
//! # Example
//!
//! ```ignore
//! use vtc_facture::export::*;
//!
//! let records = store.list_filtered(from, to, None)?;
//! let path = write_csv(&records, &paths.default_export())?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::info;

use crate::core::{FactureError, InvoiceRecord, round_commercial};

/// Column headers, matching the invoice table.
pub const COLUMNS: [&str; 13] = [
    "id",
    "invoice_number",
    "trip_date",
    "origin",
    "destination",
    "distance_km",
    "duration_min",
    "base_fare",
    "tax_amount",
    "total_amount",
    "client_email",
    "status",
    "notes",
];

const BOM: char = '\u{feff}';

/// Render records as CSV text (header row included).
pub fn to_csv(records: &[InvoiceRecord]) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&COLUMNS.join(";"));
    out.push_str("\r\n");

    for r in records {
        // id
        out.push_str(&r.id.to_string());
        out.push(';');
        csv_field_str(&mut out, &r.invoice_number);
        out.push(';');
        out.push_str(&r.trip_date.format("%d/%m/%Y %H:%M:%S").to_string());
        out.push(';');
        csv_field_str(&mut out, &r.origin);
        out.push(';');
        csv_field_str(&mut out, &r.destination);
        out.push(';');
        csv_field_decimal(&mut out, r.distance_km, 1);
        out.push(';');
        out.push_str(&r.duration_min.to_string());
        out.push(';');
        csv_field_decimal(&mut out, r.base_fare, 2);
        out.push(';');
        csv_field_decimal(&mut out, r.tax_amount, 2);
        out.push(';');
        csv_field_decimal(&mut out, r.total_amount, 2);
        out.push(';');
        csv_field_str(&mut out, &r.client_email);
        out.push(';');
        csv_field_str(&mut out, r.status.code());
        out.push(';');
        csv_field_str(&mut out, r.notes.as_deref().unwrap_or(""));
        out.push_str("\r\n");
    }
    out
}

/// Write [`to_csv`] output to `path`, replacing any existing file.
pub fn write_csv(records: &[InvoiceRecord], path: &Path) -> Result<PathBuf, FactureError> {
    fs::write(path, to_csv(records))
        .map_err(|e| FactureError::Export(format!("cannot write {}: {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "history exported");
    Ok(path.to_path_buf())
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    // Escape internal double quotes
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal, dp: u32) {
    let scaled = round_commercial(d, dp);
    let s = format!("{:.*}", dp as usize, scaled);
    out.push_str(&s.replace('.', ","));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_doubled() {
        let mut out = String::new();
        csv_field_str(&mut out, r#"Hôtel "Le Bristol""#);
        assert_eq!(out, r#""Hôtel ""Le Bristol""""#);
    }

    #[test]
    fn decimals_use_comma() {
        let mut out = String::new();
        csv_field_decimal(&mut out, rust_decimal_macros::dec!(1234.5), 2);
        assert_eq!(out, "1234,50");
    }

    #[test]
    fn empty_export_has_header_only() {
        let csv = to_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.contains("invoice_number;trip_date"));
    }
}
