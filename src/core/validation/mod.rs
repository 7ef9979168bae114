//! Form validation for garment drafts
//!
//! A draft is checked before every submit. Errors are keyed by [`Field`] so
//! that a form can show them next to their inputs and clear each one as the
//! user edits that field.

pub mod extractor;
pub mod filters;
pub mod validators;

use crate::core::error::InventoryError;
use crate::core::garment::{GarmentDraft, NewGarment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

pub use extractor::ValidatedDraft;

/// Editable garment fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Size,
    Color,
    Material,
    Quantity,
    Price,
    Description,
    Paid,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Size => "size",
            Field::Color => "color",
            Field::Material => "material",
            Field::Quantity => "quantity",
            Field::Price => "price",
            Field::Description => "description",
            Field::Paid => "paid",
        }
    }

    fn from_name(name: &str) -> Option<Field> {
        match name {
            "name" => Some(Field::Name),
            "size" => Some(Field::Size),
            "color" => Some(Field::Color),
            "material" => Some(Field::Material),
            "quantity" => Some(Field::Quantity),
            "price" => Some(Field::Price),
            "description" => Some(Field::Description),
            "paid" => Some(Field::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record a message; the first message for a field wins
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drop the message for a field the user just edited
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", msgs.join(", "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (name, errs) in errors.field_errors() {
            let Some(field) = Field::from_name(&name) else {
                continue;
            };
            if let Some(first) = errs.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                out.insert(field, message);
            }
        }
        out
    }
}

/// Check a draft; an empty result means it may be submitted
pub fn validate(draft: &GarmentDraft) -> FieldErrors {
    let mut errors = match draft.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(e),
    };

    // range() lets NaN through
    if !draft.price.is_finite() {
        errors.insert(Field::Price, validators::PRICE_INVALID);
    }

    errors
}

impl GarmentDraft {
    /// Validate and normalize into store input
    pub fn into_new_garment(self) -> Result<NewGarment, InventoryError> {
        let errors = validate(&self);
        if !errors.is_empty() {
            return Err(InventoryError::ValidationFailed(errors));
        }

        let quantity = u32::try_from(self.quantity).map_err(|_| {
            let mut errors = FieldErrors::default();
            errors.insert(Field::Quantity, validators::QUANTITY_TOO_LARGE);
            InventoryError::ValidationFailed(errors)
        })?;

        let description = filters::trim(&self.description);
        Ok(NewGarment {
            name: filters::trim(&self.name),
            size: self.size,
            color: filters::trim(&self.color),
            material: filters::trim(&self.material),
            quantity,
            price: filters::round_cents(self.price),
            description: (!description.is_empty()).then_some(description),
            paid: self.paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::garment::Size;

    fn ana() -> GarmentDraft {
        GarmentDraft {
            name: "Ana Silva".to_string(),
            size: Size::Medium,
            color: "Rosa".to_string(),
            material: "Algodão".to_string(),
            quantity: 1,
            price: 39.90,
            description: String::new(),
            paid: false,
        }
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(validate(&ana()).is_empty());
    }

    #[test]
    fn test_empty_name_rejected_then_accepted() {
        let mut draft = ana();
        draft.name = String::new();
        let errors = validate(&draft);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::Name));

        draft.name = "Ana Silva".to_string();
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn test_whitespace_only_text_fields_rejected() {
        let mut draft = ana();
        draft.name = "   ".to_string();
        draft.color = "\t".to_string();
        draft.material = " \n ".to_string();
        let errors = validate(&draft);
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::Color));
        assert!(errors.contains(Field::Material));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_negative_numbers_rejected() {
        let mut draft = ana();
        draft.quantity = -1;
        draft.price = -0.01;
        let errors = validate(&draft);
        assert_eq!(errors.get(Field::Quantity), Some(validators::QUANTITY_NEGATIVE));
        assert_eq!(errors.get(Field::Price), Some(validators::PRICE_NEGATIVE));
    }

    #[test]
    fn test_zero_quantity_and_price_allowed() {
        let mut draft = ana();
        draft.quantity = 0;
        draft.price = 0.0;
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn test_nan_price_rejected() {
        let mut draft = ana();
        draft.price = f64::NAN;
        assert!(validate(&draft).contains(Field::Price));
    }

    #[test]
    fn test_clear_removes_single_field() {
        let mut draft = ana();
        draft.name = String::new();
        draft.color = String::new();
        let mut errors = validate(&draft);
        errors.clear(Field::Name);
        assert!(!errors.contains(Field::Name));
        assert!(errors.contains(Field::Color));
    }

    #[test]
    fn test_into_new_garment_normalizes() {
        let mut draft = ana();
        draft.name = "  Ana Silva ".to_string();
        draft.price = 39.899;
        draft.description = "   ".to_string();

        let fields = draft.into_new_garment().unwrap();
        assert_eq!(fields.name, "Ana Silva");
        assert_eq!(fields.price, 39.9);
        assert_eq!(fields.description, None);
        assert_eq!(fields.quantity, 1);
    }

    #[test]
    fn test_into_new_garment_rejects_invalid() {
        let mut draft = ana();
        draft.material = String::new();
        match draft.into_new_garment() {
            Err(InventoryError::ValidationFailed(errors)) => {
                assert!(errors.contains(Field::Material))
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::default();
        errors.insert(Field::Color, "required");
        errors.insert(Field::Name, "required");
        assert_eq!(errors.to_string(), "name: required, color: required");
    }
}
