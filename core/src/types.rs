//! Catalog DTOs for the EcoMarket API.
//!
//! # Design
//! The backend speaks Spanish field names (`nombre`, `precio`, ...). The
//! Rust side uses English names and maps them with `#[serde(rename)]`, so the
//! wire format stays untouched while the code reads naturally. These types
//! mirror the mock-server's schema but are defined independently; integration
//! tests catch drift between the two crates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Product categories accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Frutas,
    Verduras,
    Lacteos,
    Miel,
    Conservas,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Frutas,
        Category::Verduras,
        Category::Lacteos,
        Category::Miel,
        Category::Conservas,
    ];

    /// Wire name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Frutas => "frutas",
            Category::Verduras => "verduras",
            Category::Lacteos => "lacteos",
            Category::Miel => "miel",
            Category::Conservas => "conservas",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ISO-8601 creation time. The backend may send it with an offset
/// (`2024-01-15T10:30:00Z`), without one (`2024-01-15T10:30:00`), or as a
/// bare date (`2024-01-15`); the form is preserved as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an ISO-8601 date or date-time: {0}")]
pub struct TimestampError(pub String);

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl Timestamp {
    pub fn parse(text: &str) -> Result<Self, TimestampError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Timestamp::Offset(dt));
        }
        if let Some(dt) = NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        {
            return Ok(Timestamp::Naive(dt));
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Timestamp::Date)
            .map_err(|_| TimestampError(text.to_string()))
    }

    /// Wall-clock date-time, dropping any offset. A bare date is midnight.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Offset(dt) => dt.naive_local(),
            Timestamp::Naive(dt) => *dt,
            Timestamp::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        }
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Offset(dt) => f.write_str(&dt.to_rfc3339()),
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Timestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(de::Error::custom)
    }
}

/// The producer a product comes from. Both fields are optional on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Producer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A single product returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "disponible", default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(rename = "productor", default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
    #[serde(rename = "creado_en", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Payload for creating a product (POST) or replacing one wholesale (PUT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "disponible", default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(rename = "productor", default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, category: Category) -> Self {
        Self {
            name: name.into(),
            price,
            category,
            available: None,
            producer: None,
        }
    }
}

/// Payload for a partial update (PATCH). Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(rename = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(rename = "disponible", default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}
