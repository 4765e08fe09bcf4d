//! Record types held by the catalog store.
//!
//! Books and stock items have the same shape: a named entry with a few
//! descriptive strings, some numeric attributes, and a non-negative
//! quantity. Serialized field names follow the snapshot files written by
//! earlier releases (`nombre`, `cantidad`, ...), so existing data loads as-is.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;
use crate::key::composite;

// ── Identity ────────────────────────────────────────────────────────────────

/// Stable identity of a record, assigned on creation and kept across merges.
///
/// Snapshots from releases that predate ids deserialize with a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ── Record surface ──────────────────────────────────────────────────────────

/// Searchable text fields. A field a record kind does not carry never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Category,
    Author,
    Publisher,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Author => "author",
            Self::Publisher => "publisher",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "title" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "author" => Ok(Self::Author),
            "publisher" => Ok(Self::Publisher),
            other => Err(format!(
                "unknown field '{other}' (expected name, category, author or publisher)"
            )),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKind {
    /// Singular display noun ("book").
    pub noun: &'static str,
    /// Plural display noun ("books").
    pub plural: &'static str,
    /// Default snapshot file name inside the data directory.
    pub file_name: &'static str,
}

/// Field-level checks run before a record enters a store or a snapshot loads.
pub trait Validate {
    fn validate(&self) -> Result<(), CatalogError>;
}

/// Shared surface of every record kind the store can hold.
pub trait Record: Validate + Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
    fn name(&self) -> &str;
    fn quantity(&self) -> u64;
    fn quantity_mut(&mut self) -> &mut u64;

    /// Text of a searchable field, or `None` if this kind lacks it.
    fn field(&self, field: Field) -> Option<&str>;

    /// Normalized key used to detect duplicates. See [`crate::key`].
    fn identity_key(&self) -> String;
}

/// Convert a caller-supplied signed quantity, rejecting negatives.
pub fn checked_quantity(quantity: i64) -> Result<u64, CatalogError> {
    u64::try_from(quantity)
        .map_err(|_| CatalogError::validation(format!("quantity must be >= 0, got {quantity}")))
}

fn require_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::validation("name must not be empty"));
    }
    Ok(())
}

// ── Book ────────────────────────────────────────────────────────────────────

/// A library catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "autor", default)]
    pub author: String,
    #[serde(rename = "editorial", default)]
    pub publisher: String,
    #[serde(rename = "paginas")]
    pub pages: u32,
    #[serde(rename = "cantidad")]
    pub quantity: u64,
}

impl Book {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        author: impl Into<String>,
        publisher: impl Into<String>,
        pages: u32,
        quantity: u64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into().trim().to_string(),
            category: category.into().trim().to_string(),
            author: author.into().trim().to_string(),
            publisher: publisher.into().trim().to_string(),
            pages,
            quantity,
        }
    }
}

impl Validate for Book {
    fn validate(&self) -> Result<(), CatalogError> {
        require_name(&self.name)?;
        if self.pages == 0 {
            return Err(CatalogError::validation(format!(
                "page count of '{}' must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

impl Record for Book {
    const KIND: RecordKind = RecordKind {
        noun: "book",
        plural: "books",
        file_name: "biblioteca.json",
    };

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn quantity_mut(&mut self) -> &mut u64 {
        &mut self.quantity
    }

    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Category => Some(&self.category),
            Field::Author => Some(&self.author),
            Field::Publisher => Some(&self.publisher),
        }
    }

    fn identity_key(&self) -> String {
        composite(&[&self.name, &self.publisher])
    }
}

// ── Item ────────────────────────────────────────────────────────────────────

/// A stock item in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: RecordId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "categoria", default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(rename = "precio")]
    pub unit_price: f64,
    #[serde(rename = "cantidad")]
    pub quantity: u64,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: f64,
        quantity: u64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into().trim().to_string(),
            category: category.into().trim().to_string(),
            unit_price,
            quantity,
        }
    }
}

impl Validate for Item {
    fn validate(&self) -> Result<(), CatalogError> {
        require_name(&self.name)?;
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(CatalogError::validation(format!(
                "price of '{}' must be a number >= 0, got {}",
                self.name, self.unit_price
            )));
        }
        Ok(())
    }
}

impl Record for Item {
    const KIND: RecordKind = RecordKind {
        noun: "item",
        plural: "items",
        file_name: "inventario.json",
    };

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn quantity(&self) -> u64 {
        self.quantity
    }

    fn quantity_mut(&mut self) -> &mut u64 {
        &mut self.quantity
    }

    fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Category => Some(&self.category),
            Field::Author | Field::Publisher => None,
        }
    }

    fn identity_key(&self) -> String {
        composite(&[&self.name])
    }
}
