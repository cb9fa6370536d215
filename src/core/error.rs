use thiserror::Error;

/// Errors that can occur while issuing, storing, rendering or exporting invoices.
///
/// Every variant is scoped to the single action that produced it; none of
/// them leaves a store half-written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactureError {
    /// One or more trip fields are missing or invalid.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The invoice store could not be read or written.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The invoice document could not be generated or written.
    #[error("render error: {0}")]
    Render(String),

    /// The configuration file is malformed or the settings are invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// An invoice with this number already exists in the store.
    #[error("invoice number {0} already exists")]
    DuplicateNumber(String),

    /// The history export could not be written.
    #[error("export error: {0}")]
    Export(String),
}

/// A single validation problem with the offending field and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "client_email").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join a list of validation problems into one `FactureError::Validation`.
pub(crate) fn join_errors(errors: &[ValidationError]) -> FactureError {
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    FactureError::Validation(msg)
}
