//! # vtc-facture
//!
//! Invoicing core for an independent VTC (for-hire vehicle) driver: record
//! trips, compute fares and VAT, render a printable invoice, and summarise
//! the trip history on a dashboard.
//!
//! All monetary values use [`rust_decimal::Decimal`], rounded half-up to
//! cents when computed. Nothing in the core reads the clock: the creation
//! instant and the dashboard's "now" are always passed in.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use vtc_facture::core::*;
//! use rust_decimal_macros::dec;
//!
//! let trip = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
//! let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(11, 0, 0).unwrap();
//!
//! let invoice = InvoiceBuilder::new(trip)
//!     .origin("Gare du Nord")
//!     .destination("Orly")
//!     .distance_km(dec!(24.8))
//!     .duration_min(40)
//!     .base_fare(dec!(50.00))
//!     .client_email("client@example.fr")
//!     .build(DEFAULT_PREFIX, dec!(0.20), now)
//!     .unwrap();
//!
//! assert_eq!(invoice.tax_amount, dec!(10.00));
//! assert_eq!(invoice.total_amount, dec!(60.00));
//! assert_eq!(invoice.invoice_number, "VTC-20240615-110000");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Trip/invoice types, fare, validation, numbering, statistics |
//! | `store` (default) | SQLite invoice store |
//! | `config` (default) | JSON configuration store |
//! | `pdf` (default) | PDF invoice rendering |
//! | `export` (default) | CSV export of the history |
//! | `cli` | `vtc-facture` command-line front end |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod stats;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "export")]
pub mod export;

#[cfg(all(feature = "store", feature = "pdf", feature = "export"))]
pub mod workflow;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
