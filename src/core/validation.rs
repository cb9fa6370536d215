use super::error::ValidationError;
use super::types::TripDraft;

/// Validate a creation-form draft.
/// Returns all validation errors found (not just the first).
///
/// Distance, duration and fare are required: a value of zero counts as
/// "not filled in", as on the creation form.
pub fn validate_trip(draft: &TripDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.origin.trim().is_empty() {
        errors.push(ValidationError::new("origin", "origin must not be empty"));
    }
    if draft.destination.trim().is_empty() {
        errors.push(ValidationError::new(
            "destination",
            "destination must not be empty",
        ));
    }

    if draft.distance_km.is_sign_negative() && !draft.distance_km.is_zero() {
        errors.push(ValidationError::new(
            "distance_km",
            "distance must not be negative",
        ));
    } else if draft.distance_km.is_zero() {
        errors.push(ValidationError::new("distance_km", "distance is required"));
    }

    if draft.duration_min == 0 {
        errors.push(ValidationError::new("duration_min", "duration is required"));
    }

    if draft.base_fare.is_sign_negative() && !draft.base_fare.is_zero() {
        errors.push(ValidationError::new(
            "base_fare",
            "base fare must not be negative",
        ));
    } else if draft.base_fare.is_zero() {
        errors.push(ValidationError::new("base_fare", "base fare is required"));
    }

    if draft.client_email.trim().is_empty() {
        errors.push(ValidationError::new(
            "client_email",
            "client email must not be empty",
        ));
    }

    errors
}
