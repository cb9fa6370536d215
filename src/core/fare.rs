use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::FactureError;
use super::types::Fare;

/// Compute tax and total for a base fare.
///
/// `tax_rate` is a multiplier (0.20 for 20 %). Both amounts are rounded
/// half-up to cents here, so what is stored is exactly what is printed.
pub fn compute_fare(base_fare: Decimal, tax_rate: Decimal) -> Result<Fare, FactureError> {
    if base_fare.is_sign_negative() && !base_fare.is_zero() {
        return Err(FactureError::Validation(format!(
            "base_fare: must not be negative (got {base_fare})"
        )));
    }
    if tax_rate.is_sign_negative() && !tax_rate.is_zero() {
        return Err(FactureError::Validation(format!(
            "tax_rate: must not be negative (got {tax_rate})"
        )));
    }

    let tax_amount = round_half_up(base_fare * tax_rate);
    let total_amount = round_half_up(base_fare + tax_amount);
    Ok(Fare {
        tax_amount,
        total_amount,
    })
}

/// Per-distance and per-time rates used to suggest a base fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tariff {
    /// Euros per hour of driving.
    pub hourly_rate: Decimal,
    /// Floor applied to every quote.
    pub min_fare: Decimal,
    /// Euros per kilometre.
    pub km_rate: Decimal,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            hourly_rate: dec!(45),
            min_fare: dec!(15),
            km_rate: dec!(1.5),
        }
    }
}

/// Suggest a base fare for a trip: distance and time components, never
/// below the minimum fare.
///
/// Advisory only; the invoiced base fare is always the one the driver enters.
pub fn quote_fare(distance_km: Decimal, duration_min: u32, tariff: &Tariff) -> Decimal {
    let distance = distance_km.max(Decimal::ZERO) * tariff.km_rate;
    let time = tariff.hourly_rate * Decimal::from(duration_min) / dec!(60);
    round_half_up((distance + time).max(tariff.min_fare))
}

/// Round to cents using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal) -> Decimal {
    round_commercial(value, 2)
}

/// Round half-up to `dp` decimal places.
///
/// `Decimal`'s `{:.N}` formatting truncates, so every displayed amount or
/// distance goes through here first.
pub fn round_commercial(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
