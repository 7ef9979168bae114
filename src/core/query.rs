//! In-memory search, filtering and sorting of garment lists
//!
//! [`apply`] is a pure function over a slice of garments: it never touches
//! the store, so the dashboard can re-run it on every keystroke.
//!
//! ```rust,ignore
//! let filters = FilterSet {
//!     size: Some(Size::Medium),
//!     paid: PaidFilter::Unpaid,
//!     ..FilterSet::default()
//! };
//! let shown = apply(&garments, "rosa", &filters, SortKey::Price, SortDirection::Desc);
//! ```
//!
//! The HTTP form of the same inputs is [`ListQuery`]:
//!
//! ```text
//! GET /garments?search=rosa&size=M&paid=unpaid&sort=price:desc
//! GET /garments?min_price=20&max_price=50&min_quantity=1
//! ```

use crate::core::error::InventoryError;
use crate::core::garment::{Garment, Size};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Tri-state payment filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidFilter {
    #[default]
    Any,
    Paid,
    Unpaid,
}

impl PaidFilter {
    fn matches(&self, paid: bool) -> bool {
        match self {
            PaidFilter::Any => true,
            PaidFilter::Paid => paid,
            PaidFilter::Unpaid => !paid,
        }
    }
}

impl FromStr for PaidFilter {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" | "all" => Ok(PaidFilter::Any),
            "paid" | "true" => Ok(PaidFilter::Paid),
            "unpaid" | "false" => Ok(PaidFilter::Unpaid),
            other => Err(InventoryError::InvalidQuery {
                message: format!("paid must be 'paid', 'unpaid' or 'any', got '{}'", other),
            }),
        }
    }
}

/// Field filters; unset fields do not constrain the result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub size: Option<Size>,
    /// Case-insensitive substring
    pub color: Option<String>,
    /// Case-insensitive substring
    pub material: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
    #[serde(default)]
    pub paid: PaidFilter,
}

impl FilterSet {
    /// Number of active filters
    pub fn active_count(&self) -> usize {
        [
            self.size.is_some(),
            self.color.is_some(),
            self.material.is_some(),
            self.min_price.is_some(),
            self.max_price.is_some(),
            self.min_quantity.is_some(),
            self.max_quantity.is_some(),
            self.paid != PaidFilter::Any,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// True when every active filter holds for `garment`
    pub fn matches(&self, garment: &Garment) -> bool {
        self.size.is_none_or(|size| garment.size == size)
            && self
                .color
                .as_deref()
                .is_none_or(|color| contains_ignore_case(&garment.color, color))
            && self
                .material
                .as_deref()
                .is_none_or(|material| contains_ignore_case(&garment.material, material))
            && self.min_price.is_none_or(|min| garment.price >= min)
            && self.max_price.is_none_or(|max| garment.price <= max)
            && self
                .min_quantity
                .is_none_or(|min| i64::from(garment.quantity) >= min)
            && self
                .max_quantity
                .is_none_or(|max| i64::from(garment.quantity) <= max)
            && self.paid.matches(garment.paid)
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    Color,
    Material,
    Quantity,
    Price,
    Paid,
    CreatedAt,
}

type Comparator = fn(&Garment, &Garment) -> Ordering;

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Size => "size",
            SortKey::Color => "color",
            SortKey::Material => "material",
            SortKey::Quantity => "quantity",
            SortKey::Price => "price",
            SortKey::Paid => "paid",
            SortKey::CreatedAt => "created_at",
        }
    }

    /// Ascending comparator for this column
    pub fn comparator(&self) -> Comparator {
        match self {
            SortKey::Name => |a, b| collate(&a.name, &b.name),
            SortKey::Size => |a, b| a.size.cmp(&b.size),
            SortKey::Color => |a, b| collate(&a.color, &b.color),
            SortKey::Material => |a, b| collate(&a.material, &b.material),
            SortKey::Quantity => |a, b| a.quantity.cmp(&b.quantity),
            SortKey::Price => |a, b| a.price.total_cmp(&b.price),
            // false < true
            SortKey::Paid => |a, b| a.paid.cmp(&b.paid),
            SortKey::CreatedAt => |a, b| a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "size" => Ok(SortKey::Size),
            "color" => Ok(SortKey::Color),
            "material" => Ok(SortKey::Material),
            "quantity" => Ok(SortKey::Quantity),
            "price" => Ok(SortKey::Price),
            "paid" => Ok(SortKey::Paid),
            "created_at" => Ok(SortKey::CreatedAt),
            other => Err(InventoryError::InvalidQuery {
                message: format!("unknown sort field '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort column and direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: same column flips direction, a new column starts ascending
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }
}

impl FromStr for SortState {
    type Err = InventoryError;

    /// `field`, `field:asc` or `field:desc`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some((_, other)) => {
                return Err(InventoryError::InvalidQuery {
                    message: format!("sort direction must be 'asc' or 'desc', got '{}'", other),
                });
            }
            None => (s, SortDirection::Asc),
        };
        Ok(SortState::new(field.parse()?, direction))
    }
}

/// Search, filter and sort `records`
///
/// Returns a new list; equal sort keys keep their input order.
pub fn apply(
    records: &[Garment],
    search: &str,
    filters: &FilterSet,
    key: SortKey,
    direction: SortDirection,
) -> Vec<Garment> {
    let query = search.to_lowercase();
    let mut result: Vec<Garment> = records
        .iter()
        .filter(|g| matches_search(g, &query))
        .filter(|g| filters.matches(g))
        .cloned()
        .collect();

    let compare = key.comparator();
    match direction {
        SortDirection::Asc => result.sort_by(compare),
        SortDirection::Desc => result.sort_by(|a, b| compare(a, b).reverse()),
    }

    result
}

/// `query` must already be lowercase
fn matches_search(garment: &Garment, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    garment.name.to_lowercase().contains(query)
        || garment.color.to_lowercase().contains(query)
        || garment.material.to_lowercase().contains(query)
        || garment
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Locale-style string ordering: case and accents only break ties
///
/// "algodão" sorts next to "algodao" and before "Linho", as a shop owner
/// reading the list expects.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(fold_accent)
            .collect::<Vec<char>>()
    };
    folded(a)
        .cmp(&folded(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// List parameters as they arrive in a URL query string
///
/// Blank values mean "not set", matching an HTML form that submits every
/// input whether or not it was filled in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_quantity: Option<String>,
    pub max_quantity: Option<String>,
    pub paid: Option<String>,
    /// `field[:asc|:desc]`
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    /// Parse the filter fields
    pub fn filters(&self) -> Result<FilterSet, InventoryError> {
        Ok(FilterSet {
            size: non_blank(&self.size)
                .map(|s| {
                    s.parse::<Size>().map_err(|e| InventoryError::InvalidQuery {
                        message: e.to_string(),
                    })
                })
                .transpose()?,
            color: non_blank(&self.color).map(str::to_string),
            material: non_blank(&self.material).map(str::to_string),
            min_price: parse_price("min_price", &self.min_price)?,
            max_price: parse_price("max_price", &self.max_price)?,
            min_quantity: parse_number("min_quantity", &self.min_quantity)?,
            max_quantity: parse_number("max_quantity", &self.max_quantity)?,
            paid: non_blank(&self.paid).unwrap_or("").parse()?,
        })
    }

    /// Parse the sort field, defaulting to name ascending
    pub fn sort(&self) -> Result<SortState, InventoryError> {
        non_blank(&self.sort)
            .map(|s| s.parse::<SortState>())
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, InventoryError> {
    non_blank(value)
        .map(|v| {
            v.parse::<T>().map_err(|_| InventoryError::InvalidQuery {
                message: format!("{} must be a number, got '{}'", name, v),
            })
        })
        .transpose()
}

/// A NaN bound would match nothing, so only finite prices are accepted
fn parse_price(name: &str, value: &Option<String>) -> Result<Option<f64>, InventoryError> {
    match parse_number::<f64>(name, value)? {
        Some(price) if !price.is_finite() => Err(InventoryError::InvalidQuery {
            message: format!("{} must be a finite number, got '{}'", name, price),
        }),
        price => Ok(price),
    }
}
