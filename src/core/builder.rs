use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::error::{FactureError, join_errors};
use super::fare::compute_fare;
use super::numbering::generate_invoice_number;
use super::types::*;
use super::validation;

/// Builder turning creation-form input into a validated [`NewInvoice`].
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use vtc_facture::core::*;
///
/// let trip = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(10, 2, 3).unwrap();
///
/// let invoice = InvoiceBuilder::new(trip)
///     .origin("Gare de Lyon")
///     .destination("Roissy CDG")
///     .distance_km(dec!(32.5))
///     .duration_min(45)
///     .base_fare(dec!(50.00))
///     .client_email("client@example.fr")
///     .build("VTC-", dec!(0.20), now)
///     .unwrap();
///
/// assert_eq!(invoice.invoice_number, "VTC-20240615-100203");
/// assert_eq!(invoice.total_amount, dec!(60.00));
/// ```
pub struct InvoiceBuilder {
    draft: TripDraft,
}

impl InvoiceBuilder {
    pub fn new(trip_date: NaiveDateTime) -> Self {
        Self {
            draft: TripDraft::new(trip_date),
        }
    }

    /// Start from a draft filled in elsewhere (e.g. a form).
    pub fn from_draft(draft: TripDraft) -> Self {
        Self { draft }
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.draft.origin = origin.into();
        self
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.draft.destination = destination.into();
        self
    }

    pub fn distance_km(mut self, km: Decimal) -> Self {
        self.draft.distance_km = km;
        self
    }

    pub fn duration_min(mut self, minutes: u32) -> Self {
        self.draft.duration_min = minutes;
        self
    }

    pub fn base_fare(mut self, fare: Decimal) -> Self {
        self.draft.base_fare = fare;
        self
    }

    pub fn client_email(mut self, email: impl Into<String>) -> Self {
        self.draft.client_email = email.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.draft.notes = Some(notes.into());
        self
    }

    /// Validate, compute tax and total, and assign the invoice number.
    ///
    /// `tax_rate` is a multiplier (0.20 for 20 %); `now` is the creation
    /// instant used for the time part of the number.
    pub fn build(
        self,
        prefix: &str,
        tax_rate: Decimal,
        now: NaiveDateTime,
    ) -> Result<NewInvoice, FactureError> {
        let errors = validation::validate_trip(&self.draft);
        if !errors.is_empty() {
            return Err(join_errors(&errors));
        }

        let draft = self.draft;
        let fare = compute_fare(draft.base_fare, tax_rate)?;
        let notes = draft
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(NewInvoice {
            invoice_number: generate_invoice_number(prefix, draft.trip_date, now),
            trip_date: draft.trip_date,
            origin: draft.origin.trim().to_string(),
            destination: draft.destination.trim().to_string(),
            distance_km: draft.distance_km,
            duration_min: draft.duration_min,
            base_fare: draft.base_fare,
            tax_amount: fare.tax_amount,
            total_amount: fare.total_amount,
            client_email: draft.client_email.trim().to_string(),
            status: InvoiceStatus::Issued,
            notes,
        })
    }
}
