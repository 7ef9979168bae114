//! Field validators and their messages
//!
//! Used through `#[validate(custom(...))]` on [`GarmentDraft`](crate::core::garment::GarmentDraft).

use std::borrow::Cow;
use validator::ValidationError;

pub const NAME_REQUIRED: &str = "Name is required";
pub const COLOR_REQUIRED: &str = "Color is required";
pub const MATERIAL_REQUIRED: &str = "Material is required";
pub const QUANTITY_NEGATIVE: &str = "Quantity cannot be negative";
pub const QUANTITY_TOO_LARGE: &str = "Quantity is too large";
pub const PRICE_NEGATIVE: &str = "Price cannot be negative";
pub const PRICE_INVALID: &str = "Price must be a number";

fn blank(message: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed(message))
}

/// Validator: name must contain something other than whitespace
pub fn name_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(blank(NAME_REQUIRED))
    } else {
        Ok(())
    }
}

/// Validator: color must contain something other than whitespace
pub fn color_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(blank(COLOR_REQUIRED))
    } else {
        Ok(())
    }
}

/// Validator: material must contain something other than whitespace
pub fn material_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(blank(MATERIAL_REQUIRED))
    } else {
        Ok(())
    }
}
