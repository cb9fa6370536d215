use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vtc_facture::core::*;
use vtc_facture::stats::{Dashboard, Window};

fn main() {
    let now = NaiveDate::from_ymd_opt(2024, 6, 20)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();

    // A fortnight of trips, two or three a day
    let mut records = Vec::new();
    for day in 0..14i64 {
        for slot in 0..(2 + day % 2) {
            let trip = now - Duration::days(day) - Duration::hours(3 * slot + 1);
            let invoice = InvoiceBuilder::new(trip)
                .origin("Gare Saint-Lazare")
                .destination("La Défense")
                .distance_km(Decimal::new(80 + day * 7, 1))
                .duration_min(20 + slot as u32 * 5)
                .base_fare(Decimal::new(2500 + day * 150, 2))
                .client_email("client@example.fr")
                .build(DEFAULT_PREFIX, dec!(0.20), trip + Duration::minutes(30))
                .unwrap();
            records.push(InvoiceRecord::from_new(records.len() as i64 + 1, invoice));
        }
    }

    for window in Window::ALL {
        let dashboard = Dashboard::build(&records, window, now);
        let s = &dashboard.stats;
        println!("── {} ──", window);
        if s.is_empty() {
            println!("  Aucune course");
            continue;
        }
        println!("  Courses:        {}", s.total_trips);
        println!("  CA total:       {:.2} €", round_commercial(s.total_revenue, 2));
        println!("  Distance:       {:.1} km", round_commercial(s.total_distance_km, 1));
        println!("  Ticket moyen:   {:.2} €", round_commercial(s.mean_ticket, 2));
        println!("  Durée moyenne:  {:.0} min", round_commercial(s.mean_duration_min, 0));
        println!("  Courses / jour: {:.1}", round_commercial(s.mean_trips_per_day, 1));
    }

    println!("\n── CA par jour (7 derniers jours) ──");
    let week = Dashboard::build(&records, Window::Last7Days, now);
    for ((day, revenue), (_, trips)) in week.daily_revenue.iter().zip(&week.daily_trips) {
        println!("  {}  {:>8.2} €  {} courses", day.format("%d/%m"), round_commercial(*revenue, 2), trips);
    }
}
