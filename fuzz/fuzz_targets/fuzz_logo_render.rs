#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use vtc_facture::config::Configuration;
use vtc_facture::core::*;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as the stored logo: an unreadable logo is skipped, never a panic.
    let Some(trip) = NaiveDate::from_ymd_opt(2024, 6, 15).and_then(|d| d.and_hms_opt(9, 30, 0)) else {
        return;
    };
    let Ok(invoice) = InvoiceBuilder::new(trip)
        .origin("Gare de Lyon")
        .destination("Orly")
        .distance_km(rust_decimal::Decimal::TEN)
        .duration_min(20)
        .base_fare(rust_decimal::Decimal::ONE_HUNDRED)
        .client_email("fuzz@example.fr")
        .build(DEFAULT_PREFIX, rust_decimal::Decimal::new(2, 1), trip)
    else {
        return;
    };
    let record = InvoiceRecord::from_new(1, invoice);
    let _ = vtc_facture::pdf::render_to_bytes(&record, &Configuration::default(), Some(data));
});
