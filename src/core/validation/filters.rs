//! Normalization applied to a draft once it has passed validation

/// Filter: trim surrounding whitespace
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Filter: round to whole cents, matching the backend's DECIMAL(10, 2) column
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
