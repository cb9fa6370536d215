use chrono::NaiveDate;
use rust_decimal_macros::dec;
use vtc_facture::core::*;

fn main() {
    let trip = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap();

    // ── 1. Builder error: missing required fields ─────────────────────
    println!("=== Builder Error ===");
    let result = InvoiceBuilder::new(trip)
        .origin("Gare du Nord")
        .build(DEFAULT_PREFIX, dec!(0.20), now);
    match result {
        Ok(inv) => println!("  Built {}", inv.invoice_number),
        Err(e) => println!("  Build failed: {}", e),
    }

    // ── 2. Validation errors, one per field ───────────────────────────
    println!("\n=== Validation Errors ===");
    let mut draft = TripDraft::new(trip);
    draft.origin = "Gare du Nord".into();
    draft.destination = "Orly".into();
    draft.distance_km = dec!(-3);
    draft.base_fare = dec!(40);
    let errors = validate_trip(&draft);
    println!("  Found {} validation errors:", errors.len());
    for e in &errors {
        println!("  - {}", e);
    }

    // ── 3. Fare computation rejects negative input ────────────────────
    println!("\n=== compute_fare() ===");
    match compute_fare(dec!(-10), dec!(0.20)) {
        Ok(fare) => println!("  Total: {}", fare.total_amount),
        Err(e) => println!("  Rejected: {}", e),
    }

    // ── 4. Matching on error variants ─────────────────────────────────
    println!("\n=== Error Variants ===");
    let errors: Vec<FactureError> = vec![
        FactureError::Validation("client_email: client email is required".into()),
        FactureError::DuplicateNumber("VTC-20240615-110000".into()),
        FactureError::Persistence("database is locked".into()),
        FactureError::Render("output directory factures does not exist".into()),
        FactureError::Config("malformed config.json".into()),
    ];
    for err in &errors {
        let kind = match err {
            FactureError::Validation(_) => "fix the form",
            FactureError::DuplicateNumber(_) => "retry in a second",
            FactureError::Persistence(_) => "check the database",
            FactureError::Render(_) => "check the invoices folder",
            FactureError::Config(_) => "check the settings",
            _ => "unexpected",
        };
        println!("  {err} → {kind}");
    }
}
