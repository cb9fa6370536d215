#![cfg(feature = "core")]

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vtc_facture::core::*;
use vtc_facture::stats::*;

fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn record(id: i64, trip_date: NaiveDateTime, total: Decimal) -> InvoiceRecord {
    InvoiceRecord {
        id,
        invoice_number: format!("VTC-{}-{id:06}", trip_date.format("%Y%m%d")),
        trip_date,
        origin: "Châtelet".into(),
        destination: "Orly".into(),
        distance_km: dec!(10),
        duration_min: 20,
        base_fare: total,
        tax_amount: Decimal::ZERO,
        total_amount: total,
        client_email: "c@example.fr".into(),
        status: InvoiceStatus::Issued,
        notes: None,
    }
}

#[test]
fn three_trips_three_days() {
    let records = vec![
        record(1, at(6, 14, 9), dec!(12.00)),
        record(2, at(6, 15, 9), dec!(18.00)),
        record(3, at(6, 16, 9), dec!(30.00)),
    ];
    let stats = aggregate(&records, Window::All, at(6, 20, 12));

    assert_eq!(stats.total_trips, 3);
    assert_eq!(stats.total_revenue, dec!(60.00));
    assert_eq!(stats.mean_ticket, dec!(20.00));
    assert_eq!(stats.mean_trips_per_day, dec!(1));
}

#[test]
fn busy_day_and_quiet_day() {
    let records = vec![
        record(1, at(6, 10, 8), dec!(20)),
        record(2, at(6, 10, 12), dec!(20)),
        record(3, at(6, 10, 18), dec!(20)),
        record(4, at(6, 19, 8), dec!(20)),
    ];
    let stats = aggregate(&records, Window::All, at(6, 20, 12));
    assert_eq!(stats.mean_trips_per_day, dec!(2));
}

#[test]
fn rolling_windows_respect_now() {
    let now = at(6, 20, 12);
    let records = vec![
        record(1, at(6, 13, 12), dec!(1)), // exactly 7 days back: kept
        record(2, at(6, 13, 11), dec!(2)), // just outside 7 days
        record(3, at(5, 21, 12), dec!(4)), // exactly 30 days back
        record(4, at(1, 2, 9), dec!(8)),
        record(5, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap().and_hms_opt(23, 0, 0).unwrap(), dec!(16)),
    ];

    assert_eq!(aggregate(&records, Window::Last7Days, now).total_revenue, dec!(1));
    assert_eq!(aggregate(&records, Window::Last30Days, now).total_revenue, dec!(7));
    assert_eq!(aggregate(&records, Window::ThisYear, now).total_revenue, dec!(15));
    assert_eq!(aggregate(&records, Window::All, now).total_revenue, dec!(31));
}

#[test]
fn no_data_state() {
    let records = vec![record(1, at(1, 2, 9), dec!(50))];
    let dashboard = Dashboard::build(&records, Window::Last7Days, at(6, 20, 12));
    assert!(dashboard.stats.is_empty());
    assert_eq!(dashboard.stats, Stats::default());
    assert!(dashboard.daily_revenue.is_empty());
    assert!(dashboard.daily_trips.is_empty());
}

#[test]
fn daily_series_are_sorted_by_date() {
    let records = vec![
        record(1, at(6, 18, 9), dec!(30)),
        record(2, at(6, 16, 9), dec!(12)),
        record(3, at(6, 18, 20), dec!(20)),
    ];
    let dashboard = Dashboard::build(&records, Window::All, at(6, 20, 12));

    assert_eq!(
        dashboard.daily_revenue,
        vec![
            (NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), dec!(12)),
            (NaiveDate::from_ymd_opt(2024, 6, 18).unwrap(), dec!(50)),
        ]
    );
    assert_eq!(
        dashboard.daily_trips,
        vec![
            (NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), 1),
            (NaiveDate::from_ymd_opt(2024, 6, 18).unwrap(), 2),
        ]
    );
    assert_eq!(dashboard.window, Window::All);
}

#[test]
fn window_codes_parse() {
    for window in Window::ALL {
        assert_eq!(window.code().parse::<Window>().unwrap(), window);
    }
    assert!("fortnight".parse::<Window>().is_err());
}

// ── Properties ──────────────────────────────────────────────────────────────

fn arb_records() -> impl Strategy<Value = Vec<InvoiceRecord>> {
    prop::collection::vec((1u32..=28, 0u32..24, 0i64..100_000), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (d, h, cents))| record(i as i64 + 1, at(6, d, h), Decimal::new(cents, 2)))
            .collect()
    })
}

proptest! {
    #[test]
    fn totals_match_filtered_records(records in arb_records(), w in 0usize..4) {
        let window = Window::ALL[w];
        let now = at(6, 20, 12);
        let stats = aggregate(&records, window, now);

        let selected: Vec<&InvoiceRecord> =
            records.iter().filter(|r| window.contains(r.trip_date, now)).collect();
        let revenue: Decimal = selected.iter().map(|r| r.total_amount).sum();

        prop_assert_eq!(stats.total_trips, selected.len() as u64);
        prop_assert_eq!(stats.total_revenue, revenue);
        if selected.is_empty() {
            prop_assert_eq!(stats, Stats::default());
        } else {
            let count = Decimal::from(selected.len() as u64);
            prop_assert_eq!(stats.mean_ticket, revenue / count);
        }
    }

    #[test]
    fn daily_series_sum_to_totals(records in arb_records()) {
        let dashboard = Dashboard::build(&records, Window::All, at(6, 20, 12));
        let revenue: Decimal = dashboard.daily_revenue.iter().map(|(_, v)| *v).sum();
        let trips: u64 = dashboard.daily_trips.iter().map(|(_, n)| *n).sum();

        prop_assert_eq!(revenue, dashboard.stats.total_revenue);
        prop_assert_eq!(trips, dashboard.stats.total_trips);
        prop_assert!(dashboard.daily_trips.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
