//! Create/edit form state

use crate::core::error::InventoryError;
use crate::core::garment::{Garment, GarmentDraft, NewGarment, Size};
use crate::core::validation::{self, Field, FieldErrors};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What a submit will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Identity of the garment being edited; both survive the update
    Edit { id: Uuid, created_at: DateTime<Utc> },
}

/// A single user edit to one draft field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Size(Size),
    Color(String),
    Material(String),
    Quantity(i64),
    Price(f64),
    Description(String),
    Paid(bool),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Name(_) => Field::Name,
            FieldEdit::Size(_) => Field::Size,
            FieldEdit::Color(_) => Field::Color,
            FieldEdit::Material(_) => Field::Material,
            FieldEdit::Quantity(_) => Field::Quantity,
            FieldEdit::Price(_) => Field::Price,
            FieldEdit::Description(_) => Field::Description,
            FieldEdit::Paid(_) => Field::Paid,
        }
    }

    fn apply_to(self, draft: &mut GarmentDraft) {
        match self {
            FieldEdit::Name(v) => draft.name = v,
            FieldEdit::Size(v) => draft.size = v,
            FieldEdit::Color(v) => draft.color = v,
            FieldEdit::Material(v) => draft.material = v,
            FieldEdit::Quantity(v) => draft.quantity = v,
            FieldEdit::Price(v) => draft.price = v,
            FieldEdit::Description(v) => draft.description = v,
            FieldEdit::Paid(v) => draft.paid = v,
        }
    }
}

/// An open form: the draft, its field errors and the last submit failure
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    mode: FormMode,
    draft: GarmentDraft,
    errors: FieldErrors,
    last_error: Option<String>,
}

impl FormSession {
    /// Empty draft for a new garment
    pub fn create() -> Self {
        Self::with_draft(FormMode::Create, GarmentDraft::default())
    }

    /// Draft pre-filled from an existing garment
    pub fn edit(garment: &Garment) -> Self {
        Self::with_draft(
            FormMode::Edit {
                id: garment.id,
                created_at: garment.created_at,
            },
            GarmentDraft::from(garment),
        )
    }

    fn with_draft(mode: FormMode, draft: GarmentDraft) -> Self {
        Self {
            mode,
            draft,
            errors: FieldErrors::default(),
            last_error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &GarmentDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Message of the last failed submit, cleared on the next attempt
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply an edit and drop the stale error for that field
    pub fn edit_field(&mut self, edit: FieldEdit) {
        self.errors.clear(edit.field());
        edit.apply_to(&mut self.draft);
    }

    /// Re-run every rule, replacing the current field errors
    pub fn validate(&mut self) -> bool {
        self.errors = validation::validate(&self.draft);
        self.errors.is_empty()
    }

    /// Validate and build store input, recording errors on failure
    pub(crate) fn prepare(&mut self) -> Result<NewGarment, InventoryError> {
        self.last_error = None;
        match self.draft.clone().into_new_garment() {
            Ok(fields) => {
                self.errors = FieldErrors::default();
                Ok(fields)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub(crate) fn fail(&mut self, err: &InventoryError) {
        if let InventoryError::ValidationFailed(errors) = err {
            self.errors = errors.clone();
        }
        self.last_error = Some(err.to_string());
    }
}
