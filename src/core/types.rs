use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an invoice.
///
/// No transition rules are enforced: any status may replace any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Émise: issued, awaiting payment.
    #[default]
    Issued,
    /// Payée.
    Paid,
    /// Annulée.
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [Self::Issued, Self::Paid, Self::Cancelled];

    /// Storage code, as written to the invoice table.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }

    /// French label used on documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Issued => "émise",
            Self::Paid => "payée",
            Self::Cancelled => "annulée",
        }
    }

    /// Parse a storage code. Legacy French labels are accepted too.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "issued" | "émise" => Some(Self::Issued),
            "paid" | "payée" => Some(Self::Paid),
            "cancelled" | "annulée" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unknown invoice status '{s}'"))
    }
}

/// Raw trip input as entered on the creation form. Nothing here is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDraft {
    pub trip_date: NaiveDateTime,
    pub origin: String,
    pub destination: String,
    pub distance_km: Decimal,
    pub duration_min: u32,
    pub base_fare: Decimal,
    pub client_email: String,
    pub notes: Option<String>,
}

impl TripDraft {
    /// An empty draft for the given trip date, as a blank form would submit it.
    pub fn new(trip_date: NaiveDateTime) -> Self {
        Self {
            trip_date,
            origin: String::new(),
            destination: String::new(),
            distance_km: Decimal::ZERO,
            duration_min: 0,
            base_fare: Decimal::ZERO,
            client_email: String::new(),
            notes: None,
        }
    }
}

/// Tax and total derived from a base fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fare {
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// A validated invoice that has not been assigned a store id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub trip_date: NaiveDateTime,
    pub origin: String,
    pub destination: String,
    pub distance_km: Decimal,
    pub duration_min: u32,
    pub base_fare: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub client_email: String,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

/// One completed trip as persisted in the invoice store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Store-assigned, monotonic identifier.
    pub id: i64,
    /// `<prefix><YYYYMMDD>-<HHMMSS>`; immutable once assigned.
    pub invoice_number: String,
    pub trip_date: NaiveDateTime,
    pub origin: String,
    pub destination: String,
    pub distance_km: Decimal,
    pub duration_min: u32,
    pub base_fare: Decimal,
    /// `round2(base_fare × tax_rate)` at creation time.
    pub tax_amount: Decimal,
    /// `round2(base_fare + tax_amount)`.
    pub total_amount: Decimal,
    pub client_email: String,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
}

impl InvoiceRecord {
    /// Attach a store id to a freshly built invoice.
    pub fn from_new(id: i64, invoice: NewInvoice) -> Self {
        Self {
            id,
            invoice_number: invoice.invoice_number,
            trip_date: invoice.trip_date,
            origin: invoice.origin,
            destination: invoice.destination,
            distance_km: invoice.distance_km,
            duration_min: invoice.duration_min,
            base_fare: invoice.base_fare,
            tax_amount: invoice.tax_amount,
            total_amount: invoice.total_amount,
            client_email: invoice.client_email,
            status: invoice.status,
            notes: invoice.notes,
        }
    }

    /// Calendar date of the trip.
    pub fn trip_day(&self) -> NaiveDate {
        self.trip_date.date()
    }
}
