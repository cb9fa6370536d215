//! Text helpers for the standard Type 1 fonts.

use lopdf::{Object, StringFormat};
use rust_decimal::Decimal;

use crate::core::round_commercial;

/// Encode a string for a font using `WinAnsiEncoding`.
///
/// Latin-1 characters map to themselves, the usual typographic extras
/// (euro sign, curly quotes, dashes, œ) to their CP1252 slots; anything
/// else becomes `?`.
pub(crate) fn win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => b' ',
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) < 0x80 => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            'Œ' => 0x8C,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            'œ' => 0x9C,
            'Ÿ' => 0x9F,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Advance widths (1/1000 em) of WinAnsi 0x20..=0x7E, taking the widest of
/// the Helvetica regular, bold and oblique faces.
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 1015,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn glyph_width(byte: u8) -> u16 {
    match byte {
        0x20..=0x7E => ASCII_WIDTHS[usize::from(byte - 0x20)],
        0x85 | 0x8C | 0x97 | 0xC6 => 1000,
        0x9C | 0xE6 => 944,
        0xC0..=0xDE => 778,
        _ => 611,
    }
}

/// Width of `s` in points when set at `size`.
pub(crate) fn text_width(s: &str, size: f32) -> f32 {
    let units: u32 = win_ansi(s).into_iter().map(|b| u32::from(glyph_width(b))).sum();
    units as f32 * size / 1000.0
}

/// Break `s` into lines no wider than `max_width` at `size`.
///
/// Lines break between words; a single word wider than the line is split
/// between characters. Always returns at least one line.
pub(crate) fn wrap(s: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in s.split_whitespace() {
        let joined = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&joined, size) <= max_width {
            line = joined;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for c in word.chars() {
            line.push(c);
            if line.chars().count() > 1 && text_width(&line, size) > max_width {
                line.pop();
                lines.push(std::mem::replace(&mut line, c.to_string()));
            }
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

pub(crate) fn pdf_string(s: &str) -> Object {
    Object::String(win_ansi(s), StringFormat::Literal)
}

pub(crate) fn money(amount: Decimal) -> String {
    format!("{:.2} €", round_commercial(amount, 2))
}

pub(crate) fn kilometres(distance: Decimal) -> String {
    format!("{:.1} km", round_commercial(distance, 1))
}

pub(crate) fn minutes(duration: u32) -> String {
    format!("{duration} min")
}

/// VAT label with the rate actually applied to this invoice.
pub(crate) fn tax_label(base_fare: Decimal, tax_amount: Decimal) -> String {
    if base_fare.is_zero() {
        return "TVA".to_string();
    }
    let percent = round_commercial(tax_amount * Decimal::ONE_HUNDRED / base_fare, 1).normalize();
    format!("TVA ({percent}%)")
}
