use chrono::NaiveDateTime;

/// Default invoice number prefix.
pub const DEFAULT_PREFIX: &str = "VTC-";

/// Generate an invoice number in the format `{prefix}{YYYYMMDD}-{HHMMSS}`.
///
/// The date part comes from the trip, the time part from the moment the
/// invoice is created. `now` is passed in so the result is a pure function
/// of its inputs.
///
/// ```
/// use chrono::NaiveDate;
/// use vtc_facture::core::generate_invoice_number;
///
/// let trip = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let now = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap().and_hms_opt(14, 5, 7).unwrap();
/// assert_eq!(generate_invoice_number("VTC-", trip, now), "VTC-20240615-140507");
/// ```
pub fn generate_invoice_number(prefix: &str, trip_date: NaiveDateTime, now: NaiveDateTime) -> String {
    format!(
        "{}{}-{}",
        prefix,
        trip_date.format("%Y%m%d"),
        now.format("%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn date_from_trip_time_from_now() {
        let trip = at(2024, 1, 2, 23, 59, 0);
        let now = at(2024, 3, 4, 8, 7, 6);
        assert_eq!(generate_invoice_number("VTC-", trip, now), "VTC-20240102-080706");
    }

    #[test]
    fn custom_prefix() {
        let trip = at(2024, 12, 31, 0, 0, 0);
        let now = at(2025, 1, 1, 0, 0, 1);
        assert_eq!(generate_invoice_number("F", trip, now), "F20241231-000001");
        assert_eq!(generate_invoice_number("", trip, now), "20241231-000001");
    }

    #[test]
    fn deterministic() {
        let trip = at(2024, 6, 15, 10, 0, 0);
        let now = at(2024, 6, 15, 10, 30, 0);
        assert_eq!(
            generate_invoice_number(DEFAULT_PREFIX, trip, now),
            generate_invoice_number(DEFAULT_PREFIX, trip, now)
        );
    }
}
