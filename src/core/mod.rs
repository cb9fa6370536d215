//! Core trip/invoice types, fare computation, validation, and numbering.
//!
//! Everything in here is pure: no I/O, no clock. The creation instant is
//! always passed in by the caller.

mod builder;
mod error;
mod fare;
mod numbering;
mod types;
mod validation;

pub use builder::*;
pub use error::{FactureError, ValidationError};
pub use fare::{Tariff, compute_fare, quote_fare, round_commercial};
pub use numbering::*;
pub use types::*;
pub use validation::*;
