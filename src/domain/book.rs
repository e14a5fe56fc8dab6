//! Book domain model
//!
//! A book record as served by the remote catalog. Every field except the id
//! may be missing in what the server sends back; readers treat a missing
//! string as empty and a missing number as zero.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned book identifier
///
/// The catalog decides the shape of its ids. Numeric ids are kept as numbers
/// so they serialize back the way they arrived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Numeric(n) => write!(f, "{}", n),
            BookId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => BookId::Numeric(n),
            Err(_) => BookId::Text(s.to_string()),
        })
    }
}

impl From<i64> for BookId {
    fn from(n: i64) -> Self {
        BookId::Numeric(n)
    }
}

/// A book record in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Server-assigned identifier
    pub id: BookId,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,

    /// Genre label; an empty string means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
}

/// Reads a string field that the server may send as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Book {
    /// Creates a book with only the required fields set
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: None,
            published_year: None,
            genre: None,
            quantity: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.published_year = Some(year);
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// Returns the genre, or `None` when missing or empty
    pub fn genre_label(&self) -> Option<&str> {
        self.genre.as_deref().filter(|g| !g.is_empty())
    }

    /// Copies on hand, counting a missing quantity as zero
    pub fn copies(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }

    /// Publication year, counting a missing year as zero
    pub fn year_or_zero(&self) -> i64 {
        self.published_year.unwrap_or(0)
    }

    /// Returns true if the record has two or fewer copies
    pub fn is_low_stock(&self) -> bool {
        self.copies() <= LOW_STOCK_THRESHOLD
    }
}

/// Books with this many copies or fewer count as low stock
pub const LOW_STOCK_THRESHOLD: i64 = 2;

/// The normalized body sent to the catalog on create and replace
///
/// Strings are trimmed, the year is a number or null, the quantity is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: Option<i64>,
    pub genre: String,
    pub quantity: i64,
}

/// Parses user input the way a browser number field does
///
/// Accepts integers and decimals (truncated toward zero) after trimming.
/// Returns `None` for blank or non-numeric input.
pub fn coerce_number(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }

    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(f.trunc() as i64),
        _ => None,
    }
}

/// Coerces a year field: blank, non-numeric or negative input is absent
pub fn coerce_year(input: &str) -> Option<i64> {
    coerce_number(input).filter(|year| *year >= 0)
}

/// Coerces a quantity field: blank, non-numeric or negative input becomes zero
pub fn coerce_quantity(input: &str) -> i64 {
    coerce_number(input).unwrap_or(0).max(0)
}
