//! Printable invoice document (PDF).
//!
//! One US Letter page: optional logo, title, company identity block in the
//! primary colour, invoice number and trip date, then a bordered two-column
//! table of the trip and its amounts, and the footer text.
//!
//! Rendering is deterministic: the PDF carries no timestamps or random
//! document IDs, so the same record and configuration always produce the
//! same bytes.

mod image;
mod layout;
mod text;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::core::{FactureError, InvoiceRecord};
use layout::{FONT_BOLD, FONT_ITALIC, FONT_REGULAR, LOGO_NAME, PAGE_HEIGHT, PAGE_WIDTH, PageBuilder};

/// Document title printed at the top of every invoice.
pub const DOCUMENT_TITLE: &str = "FACTURE VTC";

/// Where the document for `invoice_number` lives inside `invoices_dir`.
pub fn document_path(invoices_dir: &Path, invoice_number: &str) -> PathBuf {
    invoices_dir.join(format!("facture_{invoice_number}.pdf"))
}

/// Render `record` and write it to [`document_path`]; returns that path.
///
/// `invoices_dir` must already exist. An existing document is replaced
/// atomically: on failure the previous file is left as it was.
pub fn render(
    record: &InvoiceRecord,
    config: &Configuration,
    logo: Option<&[u8]>,
    invoices_dir: &Path,
) -> Result<PathBuf, FactureError> {
    let path = stage(record, config, logo, invoices_dir)?.commit()?;
    info!(number = %record.invoice_number, path = %path.display(), "invoice rendered");
    Ok(path)
}

/// Render `record` into a staging file next to its [`document_path`].
///
/// Nothing appears at the final path until [`Staged::commit`]; dropping the
/// handle uncommitted removes the staging file.
pub fn stage(
    record: &InvoiceRecord,
    config: &Configuration,
    logo: Option<&[u8]>,
    invoices_dir: &Path,
) -> Result<Staged, FactureError> {
    if !invoices_dir.is_dir() {
        return Err(FactureError::Render(format!(
            "output directory {} does not exist",
            invoices_dir.display()
        )));
    }

    let bytes = render_to_bytes(record, config, logo)?;
    let target = document_path(invoices_dir, &record.invoice_number);
    let staged = Staged {
        staging: staging_path(&target),
        target,
        committed: false,
    };
    fs::write(&staged.staging, &bytes).map_err(|e| {
        FactureError::Render(format!("cannot write {}: {e}", staged.staging.display()))
    })?;
    debug!(path = %staged.staging.display(), size = bytes.len(), "document staged");
    Ok(staged)
}

/// A rendered document waiting to be moved to its final path.
#[derive(Debug)]
#[must_use = "a staged document is discarded unless committed"]
pub struct Staged {
    staging: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl Staged {
    /// Final location of the document.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staging file over the target.
    pub fn commit(mut self) -> Result<PathBuf, FactureError> {
        fs::rename(&self.staging, &self.target).map_err(|e| {
            FactureError::Render(format!("cannot replace {}: {e}", self.target.display()))
        })?;
        self.committed = true;
        Ok(self.target.clone())
    }
}

impl Drop for Staged {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(&self.staging) {
            Ok(()) => debug!(path = %self.staging.display(), "staged document discarded"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %self.staging.display(), "cannot remove staged document"),
        }
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

/// Render `record` to PDF bytes.
pub fn render_to_bytes(
    record: &InvoiceRecord,
    config: &Configuration,
    logo: Option<&[u8]>,
) -> Result<Vec<u8>, FactureError> {
    check_record(record)?;

    let logo = logo.and_then(|bytes| match image::logo_xobject(bytes) {
        Ok(logo) => Some(logo),
        Err(e) => {
            warn!(error = %e, "logo skipped");
            None
        }
    });

    let colour = config.appearance.primary_rgb();
    let mut page = PageBuilder::new();
    if let Some(logo) = &logo {
        page.logo(logo.width, logo.height);
    }
    page.title(DOCUMENT_TITLE);
    page.block(&layout::identity_block(record, config), colour);
    page.table(&layout::line_items(record), colour);
    page.footer(&config.appearance.footer_text);

    let content = Content {
        operations: page.into_operations(),
    };
    let content_bytes = content
        .encode()
        .map_err(|e| FactureError::Render(format!("failed to encode page content: {e}")))?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for (name, base) in [
        (FONT_REGULAR, "Helvetica"),
        (FONT_BOLD, "Helvetica-Bold"),
        (FONT_ITALIC, "Helvetica-Oblique"),
    ] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(name, Object::Reference(font_id));
    }

    let mut resources = dictionary! {
        "Font" => fonts,
    };
    if let Some(logo) = logo {
        let image_id = doc.add_object(logo.stream);
        resources.set(
            "XObject",
            dictionary! { LOGO_NAME => Object::Reference(image_id) },
        );
    }
    let resources_id = doc.add_object(resources);

    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(PAGE_WIDTH), Object::Real(PAGE_HEIGHT)],
        "Contents" => Object::Reference(content_id),
        "Resources" => Object::Reference(resources_id),
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text::pdf_string(&format!("Facture {}", record.invoice_number)),
        "Author" => text::pdf_string(&config.company.name),
        "Producer" => Object::string_literal("vtc-facture"),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| FactureError::Render(format!("failed to save PDF: {e}")))?;
    Ok(output)
}

fn check_record(record: &InvoiceRecord) -> Result<(), FactureError> {
    let required = [
        ("invoice_number", &record.invoice_number),
        ("origin", &record.origin),
        ("destination", &record.destination),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| *field)
        .collect();
    if !missing.is_empty() {
        return Err(FactureError::Render(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    if record
        .invoice_number
        .chars()
        .any(|c| matches!(c, '/' | '\\') || c.is_control())
    {
        return Err(FactureError::Render(format!(
            "invoice number '{}' cannot be used as a file name",
            record.invoice_number
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InvoiceStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(total: rust_decimal::Decimal) -> InvoiceRecord {
        InvoiceRecord {
            id: 3,
            invoice_number: "VTC-20240615-100203".into(),
            trip_date: NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            origin: "Gare de Lyon".into(),
            destination: "Orly".into(),
            distance_km: dec!(18.2),
            duration_min: 30,
            base_fare: total - dec!(5),
            tax_amount: dec!(5),
            total_amount: total,
            client_email: "marie@example.fr".into(),
            status: InvoiceStatus::Issued,
            notes: None,
        }
    }

    #[test]
    fn failed_rewrite_keeps_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::default();
        let path = render(&record(dec!(30)), &config, None, dir.path()).unwrap();
        let before = fs::read(&path).unwrap();

        // an unwritable staging location makes the second write fail
        let staging = staging_path(&path);
        fs::create_dir(&staging).unwrap();
        let err = render(&record(dec!(45)), &config, None, dir.path()).unwrap_err();
        assert!(matches!(err, FactureError::Render(_)));
        assert_eq!(fs::read(&path).unwrap(), before);

        fs::remove_dir(&staging).unwrap();
        render(&record(dec!(45)), &config, None, dir.path()).unwrap();
        assert_ne!(fs::read(&path).unwrap(), before);
        assert!(!staging.exists());
    }

    #[test]
    fn uncommitted_stage_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage(&record(dec!(30)), &Configuration::default(), None, dir.path()).unwrap();
        let target = staged.target().to_path_buf();
        assert!(staging_path(&target).exists());
        assert!(!target.exists());

        drop(staged);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn staging_sits_next_to_the_document() {
        let target = Path::new("/data/factures/facture_VTC-1.pdf");
        assert_eq!(
            staging_path(target),
            Path::new("/data/factures/facture_VTC-1.pdf.part")
        );
    }
}
