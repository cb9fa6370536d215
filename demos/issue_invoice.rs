use chrono::{Local, NaiveDate};
use rust_decimal_macros::dec;
use vtc_facture::config::{AppPaths, ConfigStore};
use vtc_facture::core::*;
use vtc_facture::pdf;
use vtc_facture::store::InvoiceStore;

fn main() -> Result<(), FactureError> {
    let root = std::env::temp_dir().join("vtc-facture-demo");
    let paths = AppPaths::new(&root);
    println!("Data directory: {}", root.display());

    // Settings: defaults unless a config.json was saved before
    let settings = ConfigStore::new(&paths);
    let mut config = settings.load();
    config.company.name = "Berline Étoile".into();
    settings.save(&config)?;

    // Suggested fare from the tariff, then the invoice itself
    let km = dec!(31.7);
    let minutes = 42;
    let suggested = quote_fare(km, minutes, &config.billing.tariff());
    println!("Suggested fare: {suggested} € HT");

    let trip = NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(6, 45, 0))
        .ok_or_else(|| FactureError::Validation("bad demo date".into()))?;
    let invoice = InvoiceBuilder::new(trip)
        .origin("12 rue Oberkampf, Paris")
        .destination("Aéroport Charles de Gaulle T2")
        .distance_km(km)
        .duration_min(minutes)
        .base_fare(suggested)
        .client_email("voyageur@example.fr")
        .notes("Siège enfant")
        .build(
            &config.appearance.invoice_prefix,
            config.billing.tax_rate(),
            Local::now().naive_local(),
        )?;

    println!("Invoice:   {}", invoice.invoice_number);
    println!("Base fare: {} €", invoice.base_fare);
    println!("TVA:       {} €", invoice.tax_amount);
    println!("Total TTC: {} €", invoice.total_amount);

    let store = InvoiceStore::open(paths.ensure_data_dir()?)?;
    let id = store.append(&invoice)?;
    let record = InvoiceRecord::from_new(id, invoice);

    let dir = paths.ensure_invoices_dir()?;
    let path = pdf::render(&record, &config, settings.load_logo().as_deref(), &dir)?;
    println!("PDF:       {}", path.display());
    println!("Stored invoices: {}", store.count()?);
    Ok(())
}
