//! Dashboard statistics over recorded trips.
//!
//! Records are filtered by a [`Window`] relative to an injected `now`,
//! then summarised into [`Stats`] and two per-day series for charting.
//!
//! # Example
//!
//! ```ignore
//! use vtc_facture::stats::*;
//!
//! let dashboard = Dashboard::build(&records, Window::Last30Days, now);
//! if dashboard.stats.is_empty() {
//!     println!("Aucune course sur la période");
//! }
//! ```

mod series;
mod window;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::InvoiceRecord;

pub use series::{daily_revenue, daily_trips};
pub use window::Window;

/// Summary metrics for the trips in a window.
///
/// An empty window yields `Stats::default()`: every field zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_trips: u64,
    /// Σ total_amount.
    pub total_revenue: Decimal,
    /// Σ distance_km.
    pub total_distance_km: Decimal,
    pub mean_duration_min: Decimal,
    /// Mean total_amount per trip.
    pub mean_ticket: Decimal,
    /// Mean number of trips over the dates that have at least one trip.
    pub mean_trips_per_day: Decimal,
}

impl Stats {
    /// No trip matched: the dashboard shows a no-data state.
    pub fn is_empty(&self) -> bool {
        self.total_trips == 0
    }
}

/// Compute [`Stats`] for the records whose trip date falls in `window`.
pub fn aggregate(records: &[InvoiceRecord], window: Window, now: NaiveDateTime) -> Stats {
    let selected: Vec<&InvoiceRecord> = records
        .iter()
        .filter(|r| window.contains(r.trip_date, now))
        .collect();
    summarise(&selected)
}

fn summarise(records: &[&InvoiceRecord]) -> Stats {
    if records.is_empty() {
        return Stats::default();
    }

    let count = Decimal::from(records.len() as u64);
    let total_revenue: Decimal = records.iter().map(|r| r.total_amount).sum();
    let total_distance_km: Decimal = records.iter().map(|r| r.distance_km).sum();
    let total_duration: Decimal = records.iter().map(|r| Decimal::from(r.duration_min)).sum();

    let days = daily_trips(records.iter().copied());
    let mean_trips_per_day = count / Decimal::from(days.len() as u64);

    Stats {
        total_trips: records.len() as u64,
        total_revenue,
        total_distance_km,
        mean_duration_min: total_duration / count,
        mean_ticket: total_revenue / count,
        mean_trips_per_day,
    }
}

/// Everything one dashboard refresh needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub window: Window,
    pub stats: Stats,
    pub daily_revenue: Vec<(chrono::NaiveDate, Decimal)>,
    pub daily_trips: Vec<(chrono::NaiveDate, u64)>,
}

impl Dashboard {
    pub fn build(records: &[InvoiceRecord], window: Window, now: NaiveDateTime) -> Self {
        let selected: Vec<&InvoiceRecord> = records
            .iter()
            .filter(|r| window.contains(r.trip_date, now))
            .collect();
        tracing::debug!(
            window = window.code(),
            matched = selected.len(),
            total = records.len(),
            "building dashboard"
        );

        Self {
            window,
            stats: summarise(&selected),
            daily_revenue: daily_revenue(selected.iter().copied()),
            daily_trips: daily_trips(selected.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InvoiceStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(id: i64, day: u32, hour: u32, total: Decimal, km: Decimal, minutes: u32) -> InvoiceRecord {
        InvoiceRecord {
            id,
            invoice_number: format!("VTC-202406{day:02}-{hour:02}0000"),
            trip_date: NaiveDate::from_ymd_opt(2024, 6, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            origin: "A".into(),
            destination: "B".into(),
            distance_km: km,
            duration_min: minutes,
            base_fare: total,
            tax_amount: Decimal::ZERO,
            total_amount: total,
            client_email: "c@example.fr".into(),
            status: InvoiceStatus::Issued,
            notes: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_input_is_zeroed() {
        for window in Window::ALL {
            let stats = aggregate(&[], window, now());
            assert!(stats.is_empty());
            assert_eq!(stats, Stats::default());
        }
    }

    #[test]
    fn one_trip_per_day() {
        let records = vec![
            record(1, 14, 9, dec!(12.00), dec!(5), 10),
            record(2, 15, 9, dec!(18.00), dec!(8), 20),
            record(3, 16, 9, dec!(30.00), dec!(20), 30),
        ];
        let stats = aggregate(&records, Window::All, now());
        assert_eq!(stats.total_trips, 3);
        assert_eq!(stats.total_revenue, dec!(60.00));
        assert_eq!(stats.mean_ticket, dec!(20));
        assert_eq!(stats.mean_trips_per_day, dec!(1));
        assert_eq!(stats.total_distance_km, dec!(33));
        assert_eq!(stats.mean_duration_min, dec!(20));
    }

    #[test]
    fn trips_per_day_ignores_empty_days() {
        // 3 trips on the 10th, 1 on the 19th: mean over 2 days, not 10
        let records = vec![
            record(1, 10, 8, dec!(10), dec!(1), 5),
            record(2, 10, 9, dec!(10), dec!(1), 5),
            record(3, 10, 10, dec!(10), dec!(1), 5),
            record(4, 19, 8, dec!(10), dec!(1), 5),
        ];
        let stats = aggregate(&records, Window::All, now());
        assert_eq!(stats.mean_trips_per_day, dec!(2));
    }

    #[test]
    fn window_filters_before_summarising() {
        let records = vec![
            record(1, 1, 8, dec!(100), dec!(1), 5),
            record(2, 18, 8, dec!(40), dec!(1), 5),
        ];
        let stats = aggregate(&records, Window::Last7Days, now());
        assert_eq!(stats.total_trips, 1);
        assert_eq!(stats.total_revenue, dec!(40));
    }

    #[test]
    fn series_are_sorted_by_date_without_gaps_filled() {
        let records = vec![
            record(1, 18, 8, dec!(40), dec!(1), 5),
            record(2, 12, 8, dec!(10), dec!(1), 5),
            record(3, 18, 17, dec!(25.50), dec!(1), 5),
        ];
        let dashboard = Dashboard::build(&records, Window::All, now());
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        assert_eq!(
            dashboard.daily_revenue,
            vec![(d(12), dec!(10)), (d(18), dec!(65.50))]
        );
        assert_eq!(dashboard.daily_trips, vec![(d(12), 1), (d(18), 2)]);
        assert_eq!(dashboard.stats.total_trips, 3);
    }
}
