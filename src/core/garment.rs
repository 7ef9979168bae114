//! The garment record and its input shapes
//!
//! A [`Garment`] is one inventory line as stored by the backend. [`NewGarment`]
//! carries the mutable fields for create/update calls, and [`GarmentDraft`]
//! is the unvalidated form state a user edits before submitting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// DDL for the backing table, for operators bootstrapping a new project.
pub const TABLE_SCHEMA: &str = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp";

CREATE TABLE shirts (
  id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
  name TEXT NOT NULL,
  size TEXT NOT NULL,
  color TEXT NOT NULL,
  material TEXT NOT NULL,
  quantity INTEGER NOT NULL,
  price DECIMAL(10, 2) NOT NULL,
  description TEXT,
  paid BOOLEAN DEFAULT FALSE,
  created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);
"#;

/// Garment sizes, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "PP")]
    ExtraSmall,
    #[serde(rename = "P")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "G")]
    Large,
    #[serde(rename = "GG")]
    ExtraLarge,
    #[serde(rename = "XGG")]
    DoubleExtraLarge,
}

impl Size {
    /// All sizes in display order
    pub const ALL: [Size; 6] = [
        Size::ExtraSmall,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::ExtraLarge,
        Size::DoubleExtraLarge,
    ];

    /// The label used on the wire and in the shop
    pub fn code(&self) -> &'static str {
        match self {
            Size::ExtraSmall => "PP",
            Size::Small => "P",
            Size::Medium => "M",
            Size::Large => "G",
            Size::ExtraLarge => "GG",
            Size::DoubleExtraLarge => "XGG",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown size label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSize(pub String);

impl fmt::Display for UnknownSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown size '{}' (expected one of PP, P, M, G, GG, XGG)", self.0)
    }
}

impl std::error::Error for UnknownSize {}

impl FromStr for Size {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.code() == s)
            .ok_or_else(|| UnknownSize(s.to_string()))
    }
}

/// A stored inventory line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garment {
    pub id: Uuid,
    pub name: String,
    pub size: Size,
    pub color: String,
    pub material: String,
    pub quantity: u32,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Rows written before the column existed carry `null`
    #[serde(default, deserialize_with = "null_as_false")]
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl Garment {
    /// Replace every mutable field, keeping `id` and `created_at`
    pub fn with_changes(&self, changes: NewGarment) -> Garment {
        changes.into_garment(self.id, self.created_at)
    }

    /// The mutable part of this record
    pub fn fields(&self) -> NewGarment {
        NewGarment {
            name: self.name.clone(),
            size: self.size,
            color: self.color.clone(),
            material: self.material.clone(),
            quantity: self.quantity,
            price: self.price,
            description: self.description.clone(),
            paid: self.paid,
        }
    }

    /// Stock value of this line (price × quantity)
    pub fn line_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Mutable garment fields, already validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGarment {
    pub name: String,
    pub size: Size,
    pub color: String,
    pub material: String,
    pub quantity: u32,
    pub price: f64,
    pub description: Option<String>,
    pub paid: bool,
}

impl NewGarment {
    /// Attach identity and creation time
    pub fn into_garment(self, id: Uuid, created_at: DateTime<Utc>) -> Garment {
        Garment {
            id,
            name: self.name,
            size: self.size,
            color: self.color,
            material: self.material,
            quantity: self.quantity,
            price: self.price,
            description: self.description.filter(|d| !d.is_empty()),
            paid: self.paid,
            created_at,
        }
    }
}

/// Unvalidated form state for creating or editing a garment
///
/// Numeric fields are signed so that out-of-range user input can be
/// represented and rejected by the validator instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GarmentDraft {
    #[serde(default)]
    #[validate(custom(function = "crate::core::validation::validators::name_not_blank"))]
    pub name: String,
    #[serde(default = "default_size")]
    pub size: Size,
    #[serde(default)]
    #[validate(custom(function = "crate::core::validation::validators::color_not_blank"))]
    pub color: String,
    #[serde(default)]
    #[validate(custom(function = "crate::core::validation::validators::material_not_blank"))]
    pub material: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub paid: bool,
}

fn default_size() -> Size {
    Size::Medium
}

impl Default for GarmentDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: default_size(),
            color: String::new(),
            material: String::new(),
            quantity: 0,
            price: 0.0,
            description: String::new(),
            paid: false,
        }
    }
}

impl From<&Garment> for GarmentDraft {
    fn from(garment: &Garment) -> Self {
        Self {
            name: garment.name.clone(),
            size: garment.size,
            color: garment.color.clone(),
            material: garment.material.clone(),
            quantity: i64::from(garment.quantity),
            price: garment.price,
            description: garment.description.clone().unwrap_or_default(),
            paid: garment.paid,
        }
    }
}
