//! The four views' operations over one explicit [`Workspace`].
//!
//! Every selection (form input, history filter, dashboard period) is passed
//! in as an argument; the workspace itself only holds the stores and paths.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::config::{AppPaths, ConfigStore, Configuration};
use crate::core::{FactureError, InvoiceBuilder, InvoiceRecord, InvoiceStatus, TripDraft};
use crate::export;
use crate::pdf;
use crate::stats::{Dashboard, Window};
use crate::store::InvoiceStore;

/// History view selection: inclusive trip-date range and optional status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub status: Option<InvoiceStatus>,
}

/// Result of issuing an invoice: the stored record and its document.
#[derive(Debug, Clone, PartialEq)]
pub struct Issued {
    pub record: InvoiceRecord,
    pub document: PathBuf,
}

/// Stores and on-disk layout for one driver.
#[derive(Debug)]
pub struct Workspace {
    paths: AppPaths,
    invoices: InvoiceStore,
    settings: ConfigStore,
    issue_lock: Mutex<()>,
}

impl Workspace {
    /// Open the workspace rooted at `paths`, creating the database if needed.
    pub fn open(paths: AppPaths) -> Result<Self, FactureError> {
        let db = paths.ensure_data_dir()?;
        let invoices = InvoiceStore::open(&db)?;
        let settings = ConfigStore::new(&paths);
        Ok(Self {
            paths,
            invoices,
            settings,
            issue_lock: Mutex::new(()),
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn invoices(&self) -> &InvoiceStore {
        &self.invoices
    }

    pub fn settings(&self) -> &ConfigStore {
        &self.settings
    }

    /// Create view: validate the draft, compute the fare, render the
    /// document and store the record.
    ///
    /// Issues are serialised, so the duplicate check, the append and the
    /// document write always describe the same invoice. The document is
    /// staged first and only moved to its final path once the record is
    /// stored: a validation error touches nothing, a failed append leaves no
    /// document, and an existing document is never removed.
    pub fn issue(&self, draft: TripDraft, now: NaiveDateTime) -> Result<Issued, FactureError> {
        let config = self.settings.load();
        let invoice = InvoiceBuilder::from_draft(draft).build(
            &config.appearance.invoice_prefix,
            config.billing.tax_rate(),
            now,
        )?;

        let _issuing = self
            .issue_lock
            .lock()
            .map_err(|_| FactureError::Persistence("issue lock poisoned".into()))?;

        if self.invoices.find_by_number(&invoice.invoice_number)?.is_some() {
            return Err(FactureError::DuplicateNumber(invoice.invoice_number));
        }

        let invoices_dir = self.paths.ensure_invoices_dir()?;
        let logo = self.settings.load_logo();
        // the id is not printed, so the document can be rendered before the append
        let preview = InvoiceRecord::from_new(0, invoice.clone());
        let staged = pdf::stage(&preview, &config, logo.as_deref(), &invoices_dir)?;

        let id = self.invoices.append(&invoice)?;
        let document = staged.commit().inspect_err(|e| {
            warn!(id, error = %e, "invoice stored without its document; rerender to recreate it");
        })?;

        info!(id, number = %invoice.invoice_number, "invoice issued");
        Ok(Issued {
            record: InvoiceRecord::from_new(id, invoice),
            document,
        })
    }

    /// Regenerate the document of a stored invoice with the current settings.
    pub fn rerender(&self, id: i64) -> Result<PathBuf, FactureError> {
        let record = self
            .invoices
            .get(id)?
            .ok_or_else(|| FactureError::Render(format!("no invoice with id {id}")))?;
        let config = self.settings.load();
        let logo = self.settings.load_logo();
        let invoices_dir = self.paths.ensure_invoices_dir()?;
        pdf::render(&record, &config, logo.as_deref(), &invoices_dir)
    }

    /// History view.
    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<InvoiceRecord>, FactureError> {
        self.invoices
            .list_filtered(filter.from, filter.to, filter.status)
    }

    /// History view export: the filtered records as a spreadsheet file.
    pub fn export_history(
        &self,
        filter: &HistoryFilter,
        target: Option<PathBuf>,
    ) -> Result<PathBuf, FactureError> {
        let records = self.history(filter)?;
        let path = target.unwrap_or_else(|| self.paths.default_export());
        export::write_csv(&records, &path)
    }

    /// Dashboard view.
    pub fn dashboard(&self, window: Window, now: NaiveDateTime) -> Result<Dashboard, FactureError> {
        let records = self.invoices.list_all()?;
        Ok(Dashboard::build(&records, window, now))
    }

    /// Settings view: current configuration (defaults if none saved).
    pub fn configuration(&self) -> Configuration {
        self.settings.load()
    }
}
