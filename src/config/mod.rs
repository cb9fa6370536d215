//! Business, billing, email and appearance settings.
//!
//! The configuration is one JSON document with four sections:
//!
//! | Section | Contents |
//! |---------|----------|
//! | `company` | Identity block printed on invoices |
//! | `billing` | Hourly rate, minimum fare, VAT rate (percent), per-km rate |
//! | `email` | SMTP server, port, user, password |
//! | `appearance` | Primary colour, footer text, invoice number prefix |
//!
//! An absent or malformed file means defaults. The logo is kept beside the
//! JSON file, not inside it.
//!
//! # Example
//!
//! ```ignore
//! use vtc_facture::config::*;
//!
//! let paths = AppPaths::new("/home/me/.vtc");
//! let store = ConfigStore::new(&paths);
//! let mut config = store.load();
//! config.billing.tva_rate = dec!(10);
//! store.save(&config)?;
//! ```

mod paths;
mod settings;
mod store;

pub use paths::AppPaths;
pub use settings::{Appearance, Billing, Company, Configuration, EmailSettings, Rgb};
pub use store::ConfigStore;
