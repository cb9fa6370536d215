use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::InvoiceRecord;

/// Revenue (sum of totals) per trip date, ascending, one entry per date present.
pub fn daily_revenue<'a, I>(records: I) -> Vec<(NaiveDate, Decimal)>
where
    I: IntoIterator<Item = &'a InvoiceRecord>,
{
    let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        *by_day.entry(record.trip_day()).or_insert(Decimal::ZERO) += record.total_amount;
    }
    by_day.into_iter().collect()
}

/// Trip count per trip date, ascending, one entry per date present.
pub fn daily_trips<'a, I>(records: I) -> Vec<(NaiveDate, u64)>
where
    I: IntoIterator<Item = &'a InvoiceRecord>,
{
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *by_day.entry(record.trip_day()).or_insert(0) += 1;
    }
    by_day.into_iter().collect()
}
