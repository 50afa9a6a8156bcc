// src/domain/catalog.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::listing::{CanonicalListing, SchoolField, MAX_SCHOOLS};

pub const COL_ADDRESS: &str = "ADDRESS";
pub const COL_APARTMENT_NAME: &str = "APARTMENT NAME";
pub const COL_RENT: &str = "RENT";
pub const COL_AVERAGE_RENT: &str = "AVERAGE RENT";
pub const COL_ZIP_CODE: &str = "ZIP CODE";
pub const COL_CITY: &str = "CITY";
pub const COL_BORO: &str = "BORO";
pub const COL_PET_POLICY: &str = "IF_PETS_ALLOWED";
pub const COL_FEATURES: &str = "FEATURES";
pub const COL_APPLIANCES: &str = "APPLIANCES";
pub const COL_INCIDENTS: &str = "INCIDENTS REPORTED";
pub const COL_SAFETY_LEVEL: &str = "SAFETY_LEVEL";

/// Listing columns that precede the facility count columns.
pub const LISTING_COLUMNS: [&str; 10] = [
    COL_ADDRESS,
    COL_APARTMENT_NAME,
    COL_RENT,
    COL_AVERAGE_RENT,
    COL_ZIP_CODE,
    COL_CITY,
    COL_BORO,
    COL_PET_POLICY,
    COL_FEATURES,
    COL_APPLIANCES,
];

/// Columns kept when the result is narrowed to selected facility categories.
pub const IDENTITY_COLUMNS: [&str; 5] = [
    COL_ADDRESS,
    COL_APARTMENT_NAME,
    COL_AVERAGE_RENT,
    COL_ZIP_CODE,
    COL_CITY,
];

/// School columns slot by slot: `SCHOOL_NAME_1`, `GRADES_1`, `RANK_1`,
/// `RATING_1`, then slot 2 and 3.
pub fn school_columns() -> Vec<String> {
    (1..=MAX_SCHOOLS)
        .flat_map(|slot| {
            SchoolField::ALL
                .iter()
                .map(move |f| format!("{}_{slot}", f.column_prefix()))
        })
        .collect()
}

/// Zero-based slot and field for a normalized school column name.
fn school_column(column: &str) -> Option<(usize, SchoolField)> {
    let (prefix, slot) = column.rsplit_once('_')?;
    let slot: usize = slot.parse().ok()?;
    if !(1..=MAX_SCHOOLS).contains(&slot) {
        return None;
    }
    let field = SchoolField::ALL
        .into_iter()
        .find(|f| f.column_prefix() == prefix)?;
    Some((slot - 1, field))
}

/// A single catalog cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    fn from_opt_text(s: Option<&str>) -> Value {
        s.map(|s| Value::Text(s.to_string())).unwrap_or(Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::Missing => Ok(()),
        }
    }
}

/// One listing joined with its regional facility counts and safety label.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub listing: CanonicalListing,
    /// Keyed by upper-case category. Every configured category is present.
    pub facility_counts: BTreeMap<String, u64>,
    pub incidents_reported: bool,
    pub safety_level: String,
}

impl CatalogRow {
    pub fn facility_count(&self, category: &str) -> u64 {
        self.facility_counts.get(category).copied().unwrap_or(0)
    }
}

/// The fully joined table the filter engine runs over.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Facility categories in column order.
    pub categories: Vec<String>,
    pub rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn new(categories: Vec<String>, rows: Vec<CatalogRow>) -> Self {
        Self { categories, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every column name in output order, all upper-case.
    pub fn columns(&self) -> Vec<String> {
        LISTING_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(school_columns())
            .chain(self.categories.iter().cloned())
            .chain([COL_INCIDENTS.to_string(), COL_SAFETY_LEVEL.to_string()])
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        let column = normalize_column(column);
        LISTING_COLUMNS.contains(&column.as_str())
            || column == COL_INCIDENTS
            || column == COL_SAFETY_LEVEL
            || school_column(&column).is_some()
            || self.categories.contains(&column)
    }

    /// Average rent and facility counts hold numbers; everything else is text.
    pub fn is_numeric_column(&self, column: &str) -> bool {
        let column = normalize_column(column);
        column == COL_AVERAGE_RENT || self.categories.contains(&column)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(&normalize_column(category))
    }

    /// Resolves `column` for `row`. Returns `None` if the catalog has no such column.
    pub fn value(&self, row: &CatalogRow, column: &str) -> Option<Value> {
        let column = normalize_column(column);
        let l = &row.listing;
        if let Some((slot, field)) = school_column(&column) {
            return Some(Value::from_opt_text(l.schools[slot].get(field)));
        }
        let value = match column.as_str() {
            COL_ADDRESS => Value::Text(l.address.clone()),
            COL_APARTMENT_NAME => Value::from_opt_text(l.apartment_name.as_deref()),
            COL_RENT => Value::from_opt_text(l.rent.as_deref()),
            COL_AVERAGE_RENT => l.average_rent.map(Value::Number).unwrap_or(Value::Missing),
            COL_ZIP_CODE => Value::Text(l.zip_code.clone()),
            COL_CITY => Value::from_opt_text(l.city.as_deref()),
            COL_BORO => Value::Text(l.region.as_str().to_string()),
            COL_PET_POLICY => Value::Text(l.pet_policy.as_str().to_string()),
            COL_FEATURES => Value::from_opt_text(l.features.as_deref()),
            COL_APPLIANCES => Value::from_opt_text(l.appliances.as_deref()),
            COL_INCIDENTS => Value::Text(if row.incidents_reported { "Yes" } else { "No" }.to_string()),
            COL_SAFETY_LEVEL => Value::Text(row.safety_level.clone()),
            other if self.categories.iter().any(|c| c == other) => {
                Value::Number(row.facility_count(other) as f64)
            }
            _ => return None,
        };
        Some(value)
    }

    /// Flattens the whole catalog into a result table.
    pub fn to_result_set(&self) -> ResultSet {
        let columns = self.columns();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| self.value(row, c).unwrap_or(Value::Missing))
                    .collect()
            })
            .collect();
        ResultSet { columns, rows }
    }
}

/// Column names are compared upper-cased and trimmed everywhere.
pub fn normalize_column(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Tabular output of the filter engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        let column = normalize_column(column);
        self.columns.iter().position(|c| *c == column)
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}
