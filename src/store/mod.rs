//! Append-only invoice store backed by a single SQLite table.
//!
//! Columns map one-to-one onto [`InvoiceRecord`](crate::core::InvoiceRecord).
//! Decimals are stored as their canonical text form and trip dates as
//! `YYYY-MM-DD HH:MM:SS`, so both round-trip exactly and dates sort
//! lexicographically.
//!
//! There is no update or delete: records are only ever appended and read.

mod schema;
mod sqlite;

pub use sqlite::InvoiceStore;
