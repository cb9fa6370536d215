#![cfg(feature = "store")]

use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use vtc_facture::core::*;
use vtc_facture::store::InvoiceStore;

fn trip(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, d)
        .unwrap()
        .and_hms_opt(h, 30, 0)
        .unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn invoice(d: u32, h: u32, created: u32) -> NewInvoice {
    InvoiceBuilder::new(trip(d, h))
        .origin("Gare Montparnasse")
        .destination("La Défense")
        .distance_km(dec!(12.4))
        .duration_min(28)
        .base_fare(dec!(35.00))
        .client_email("client@example.fr")
        .build(DEFAULT_PREFIX, dec!(0.20), trip(d, h) + chrono::Duration::seconds(i64::from(created)))
        .unwrap()
}

#[test]
fn append_then_list_round_trips_every_field() {
    let store = InvoiceStore::open_in_memory().unwrap();
    let mut new = invoice(14, 8, 1);
    new.notes = Some("Bagages volumineux".into());
    new.status = InvoiceStatus::Paid;

    let id = store.append(&new).unwrap();
    let all = store.list_all().unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0], InvoiceRecord::from_new(id, new));
    assert_eq!(all[0].tax_amount, dec!(7.00));
    assert_eq!(all[0].total_amount, dec!(42.00));
}

#[test]
fn ids_increase_with_insertion_order() {
    let store = InvoiceStore::open_in_memory().unwrap();
    // trip dates out of order: listing still follows insertion
    let a = store.append(&invoice(20, 8, 1)).unwrap();
    let b = store.append(&invoice(3, 8, 2)).unwrap();
    let c = store.append(&invoice(11, 8, 3)).unwrap();
    assert!(a < b && b < c);

    let ids: Vec<i64> = store.list_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn duplicate_number_rejected_and_store_unchanged() {
    let store = InvoiceStore::open_in_memory().unwrap();
    let first = invoice(14, 8, 1);
    store.append(&first).unwrap();

    let mut clash = invoice(14, 17, 0);
    clash.invoice_number = first.invoice_number.clone();
    let err = store.append(&clash).unwrap_err();

    assert!(matches!(err, FactureError::DuplicateNumber(ref n) if *n == first.invoice_number));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn filter_by_inclusive_date_range() {
    let store = InvoiceStore::open_in_memory().unwrap();
    for (i, d) in [9u32, 10, 12, 15, 16].into_iter().enumerate() {
        store.append(&invoice(d, 23, i as u32)).unwrap();
    }

    let hits = store.list_filtered(day(10), day(15), None).unwrap();
    let days: Vec<NaiveDate> = hits.iter().map(|r| r.trip_day()).collect();
    // late-evening trips on both bounds are included
    assert_eq!(days, vec![day(10), day(12), day(15)]);
}

#[test]
fn filter_by_status() {
    let store = InvoiceStore::open_in_memory().unwrap();
    let mut paid = invoice(10, 9, 1);
    paid.status = InvoiceStatus::Paid;
    let mut cancelled = invoice(11, 9, 2);
    cancelled.status = InvoiceStatus::Cancelled;
    store.append(&invoice(12, 9, 3)).unwrap();
    store.append(&paid).unwrap();
    store.append(&cancelled).unwrap();

    let only_paid = store
        .list_filtered(day(1), day(30), Some(InvoiceStatus::Paid))
        .unwrap();
    assert_eq!(only_paid.len(), 1);
    assert_eq!(only_paid[0].invoice_number, paid.invoice_number);

    let any = store.list_filtered(day(1), day(30), None).unwrap();
    assert_eq!(any.len(), 3);
}

#[test]
fn inverted_range_is_empty_not_an_error() {
    let store = InvoiceStore::open_in_memory().unwrap();
    store.append(&invoice(12, 9, 1)).unwrap();
    let hits = store.list_filtered(day(15), day(10), None).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn lookups() {
    let store = InvoiceStore::open_in_memory().unwrap();
    let new = invoice(12, 9, 1);
    let id = store.append(&new).unwrap();

    assert_eq!(store.get(id).unwrap().unwrap().invoice_number, new.invoice_number);
    assert!(store.get(id + 100).unwrap().is_none());
    assert_eq!(store.find_by_number(&new.invoice_number).unwrap().unwrap().id, id);
    assert!(store.find_by_number("VTC-00000000-000000").unwrap().is_none());
}

#[test]
fn reopening_file_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vtc_factures.db");

    let number = {
        let store = InvoiceStore::open(&path).unwrap();
        let new = invoice(12, 9, 1);
        store.append(&new).unwrap();
        new.invoice_number
    };

    let store = InvoiceStore::open(&path).unwrap();
    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].invoice_number, number);

    // uniqueness survives the reopen
    let mut again = invoice(13, 9, 2);
    again.invoice_number = number;
    assert!(matches!(store.append(&again), Err(FactureError::DuplicateNumber(_))));
}

#[test]
fn open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("vtc_factures.db");
    let err = InvoiceStore::open(&path).unwrap_err();
    assert!(matches!(err, FactureError::Persistence(_)));
}

#[test]
fn concurrent_appends_are_not_lost() {
    let store = Arc::new(InvoiceStore::open_in_memory().unwrap());

    let handles: Vec<_> = (0..8u32)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..10u32 {
                    let mut new = invoice(1 + worker, 8, n);
                    new.invoice_number = format!("VTC-T{worker}-{n:02}");
                    store.append(&new).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 80);
    let mut ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 80);
}

#[test]
fn racing_same_number_only_one_wins() {
    let store = Arc::new(InvoiceStore::open_in_memory().unwrap());
    let handles: Vec<_> = (0..4u32)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut new = invoice(5, 8, n);
                new.invoice_number = "VTC-20240605-083000".into();
                store.append(&new).is_ok()
            })
        })
        .collect();
    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(wins, 1);
    assert_eq!(store.count().unwrap(), 1);
}
