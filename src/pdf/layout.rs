//! Page content for the invoice: fixed positions top to bottom. Text that
//! would not fit its column wraps onto further lines.

use lopdf::Object;
use lopdf::content::Operation;

use super::text::{kilometres, minutes, money, pdf_string, tax_label, wrap};
use crate::config::{Configuration, Rgb};
use crate::core::InvoiceRecord;

pub(crate) const PAGE_WIDTH: f32 = 612.0;
pub(crate) const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;

const LOGO_SIZE: f32 = 100.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 12.0;
const FOOTER_SIZE: f32 = 10.0;
const BLOCK_LEADING: f32 = 22.0;
const LINE_LEADING: f32 = 14.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const LABEL_WIDTH: f32 = 180.0;
const VALUE_WIDTH: f32 = 300.0;
const ROW_HEIGHT: f32 = 27.0;
const CELL_PADDING_LEFT: f32 = 6.0;
const CELL_PADDING_BOTTOM: f32 = 12.0;
const LABEL_BACKGROUND: Rgb = Rgb::new(0xF5, 0xF5, 0xF5);

pub(crate) const FONT_REGULAR: &str = "F1";
pub(crate) const FONT_BOLD: &str = "F2";
pub(crate) const FONT_ITALIC: &str = "F3";
pub(crate) const LOGO_NAME: &str = "Im1";

/// Table rows: label, value. The first row is set in bold.
pub(crate) fn line_items(record: &InvoiceRecord) -> Vec<(String, String)> {
    vec![
        ("Départ".into(), record.origin.clone()),
        ("Arrivée".into(), record.destination.clone()),
        ("Kilométrage".into(), kilometres(record.distance_km)),
        ("Durée".into(), minutes(record.duration_min)),
        ("Tarif de base".into(), money(record.base_fare)),
        (
            tax_label(record.base_fare, record.tax_amount),
            money(record.tax_amount),
        ),
        ("Montant total TTC".into(), money(record.total_amount)),
    ]
}

/// Lines of the identity block, blank settings skipped.
pub(crate) fn identity_block(record: &InvoiceRecord, config: &Configuration) -> Vec<String> {
    let company = &config.company;
    let locality = format!("{} {}", company.postal_code.trim(), company.city.trim());
    let labelled = |label: &str, value: &str| {
        let value = value.trim();
        (!value.is_empty()).then(|| format!("{label}{value}"))
    };

    [
        labelled("", &company.name),
        labelled("", &company.address),
        labelled("", &locality),
        labelled("Tél. : ", &company.phone),
        labelled("", &company.email),
        labelled("SIRET : ", &company.siret),
        labelled("N° TVA : ", &company.tva_number),
        Some(format!("Facture N° {}", record.invoice_number)),
        Some(format!("Date : {}", record.trip_date.format("%d/%m/%Y %H:%M"))),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Builds the content stream operations top to bottom.
pub(crate) struct PageBuilder {
    ops: Vec<Operation>,
    cursor: f32,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.ops
    }

    /// Centred logo, scaled into a square box, aspect ratio kept.
    pub fn logo(&mut self, width: u32, height: u32) {
        let (w, h) = fit(width as f32, height as f32, LOGO_SIZE);
        let x = (PAGE_WIDTH - w) / 2.0;
        let y = self.cursor - LOGO_SIZE + (LOGO_SIZE - h) / 2.0;
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![real(w), real(0.0), real(0.0), real(h), real(x), real(y)],
        );
        self.op("Do", vec![name(LOGO_NAME)]);
        self.op("Q", vec![]);
        self.cursor -= LOGO_SIZE + 12.0;
    }

    pub fn title(&mut self, title: &str) {
        self.cursor -= TITLE_SIZE;
        self.fill(Rgb::new(0, 0, 0));
        self.text(FONT_BOLD, TITLE_SIZE, MARGIN, self.cursor, title);
        self.cursor -= 20.0;
    }

    pub fn block(&mut self, lines: &[String], colour: Rgb) {
        self.fill(colour);
        for line in lines.iter().flat_map(|l| wrap(l, BODY_SIZE, TEXT_WIDTH)) {
            self.cursor -= BODY_SIZE;
            self.text(FONT_REGULAR, BODY_SIZE, MARGIN, self.cursor, &line);
            self.cursor -= BLOCK_LEADING - BODY_SIZE;
        }
        self.cursor -= 20.0;
    }

    /// Two-column bordered table: grey label column, bold first row,
    /// grid in `grid_colour`, everything left aligned. A row grows by one
    /// line per wrapped line of its taller cell.
    pub fn table(&mut self, rows: &[(String, String)], grid_colour: Rgb) {
        let left = (PAGE_WIDTH - LABEL_WIDTH - VALUE_WIDTH) / 2.0;
        let cells: Vec<(Vec<String>, Vec<String>)> = rows
            .iter()
            .map(|(label, value)| {
                (
                    wrap(label, BODY_SIZE, LABEL_WIDTH - 2.0 * CELL_PADDING_LEFT),
                    wrap(value, BODY_SIZE, VALUE_WIDTH - 2.0 * CELL_PADDING_LEFT),
                )
            })
            .collect();
        let heights: Vec<f32> = cells
            .iter()
            .map(|(label, value)| row_height(label.len().max(value.len())))
            .collect();
        let top = self.cursor;
        let height: f32 = heights.iter().sum();
        let bottom = top - height;

        self.fill(LABEL_BACKGROUND);
        self.op(
            "re",
            vec![real(left), real(bottom), real(LABEL_WIDTH), real(height)],
        );
        self.op("f", vec![]);

        self.fill(Rgb::new(0, 0, 0));
        let mut row_top = top;
        for (i, ((label, value), row)) in cells.iter().zip(&heights).enumerate() {
            let font = if i == 0 { FONT_BOLD } else { FONT_REGULAR };
            let first = row_top - ROW_HEIGHT + CELL_PADDING_BOTTOM;
            for (x, lines) in [
                (left + CELL_PADDING_LEFT, label),
                (left + LABEL_WIDTH + CELL_PADDING_LEFT, value),
            ] {
                for (n, line) in lines.iter().enumerate() {
                    self.text(font, BODY_SIZE, x, first - LINE_LEADING * n as f32, line);
                }
            }
            row_top -= row;
        }

        self.stroke(grid_colour);
        self.op("w", vec![real(1.0)]);
        self.op(
            "re",
            vec![
                real(left),
                real(bottom),
                real(LABEL_WIDTH + VALUE_WIDTH),
                real(height),
            ],
        );
        let mut y = top;
        for row in heights.iter().take(heights.len().saturating_sub(1)) {
            y -= row;
            self.segment(left, y, left + LABEL_WIDTH + VALUE_WIDTH, y);
        }
        self.segment(left + LABEL_WIDTH, top, left + LABEL_WIDTH, bottom);
        self.op("S", vec![]);

        self.cursor = bottom - 20.0;
    }

    /// Footer pinned to the bottom margin; wrapped lines stack upwards.
    pub fn footer(&mut self, footer: &str) {
        if footer.trim().is_empty() {
            return;
        }
        self.fill(Rgb::new(0x66, 0x66, 0x66));
        let lines = wrap(footer, FOOTER_SIZE, TEXT_WIDTH);
        let lowest = MARGIN / 2.0 + FOOTER_SIZE;
        for (n, line) in lines.iter().enumerate() {
            let above = (lines.len() - 1 - n) as f32;
            self.text(FONT_ITALIC, FOOTER_SIZE, MARGIN, lowest + above * (FOOTER_SIZE + 4.0), line);
        }
    }

    fn text(&mut self, font: &str, size: f32, x: f32, y: f32, s: &str) {
        self.op("BT", vec![]);
        self.op("Tf", vec![name(font), real(size)]);
        self.op("Td", vec![real(x), real(y)]);
        self.op("Tj", vec![pdf_string(s)]);
        self.op("ET", vec![]);
    }

    fn fill(&mut self, c: Rgb) {
        let (r, g, b) = c.unit();
        self.op("rg", vec![real(r), real(g), real(b)]);
    }

    fn stroke(&mut self, c: Rgb) {
        let (r, g, b) = c.unit();
        self.op("RG", vec![real(r), real(g), real(b)]);
    }

    fn segment(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.op("m", vec![real(x1), real(y1)]);
        self.op("l", vec![real(x2), real(y2)]);
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }
}

fn row_height(lines: usize) -> f32 {
    ROW_HEIGHT + LINE_LEADING * lines.saturating_sub(1) as f32
}

/// Scale `(w, h)` to fit in a `size` square, keeping the aspect ratio.
fn fit(w: f32, h: f32, size: f32) -> (f32, f32) {
    if w <= 0.0 || h <= 0.0 {
        return (size, size);
    }
    let scale = size / w.max(h);
    (w * scale, h * scale)
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn name(n: &str) -> Object {
    Object::Name(n.as_bytes().to_vec())
}
