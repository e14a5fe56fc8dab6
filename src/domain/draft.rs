//! Drafts: staged, possibly invalid book fields
//!
//! A draft holds raw text exactly as the user typed it. It only becomes a
//! [`BookPayload`] through [`BookDraft::normalize`], which is where the two
//! required fields are checked and numbers are coerced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::book::{coerce_quantity, coerce_year, Book, BookId, BookPayload};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title and author are required.")]
    MissingTitleOrAuthor,

    #[error("Cannot save changes: the draft has no book id.")]
    MissingId,

    #[error("Unknown field '{0}'. Expected one of: title, author, isbn, publishedYear, genre, quantity")]
    UnknownField(String),
}

/// Whether a submission creates a new record or replaces an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Create,
    Edit,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Create => "create",
            EditMode::Edit => "edit",
        }
    }
}

/// A single editable draft field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Author,
    Isbn,
    PublishedYear,
    Genre,
    Quantity,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Title,
        DraftField::Author,
        DraftField::Isbn,
        DraftField::PublishedYear,
        DraftField::Genre,
        DraftField::Quantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Author => "author",
            DraftField::Isbn => "isbn",
            DraftField::PublishedYear => "publishedYear",
            DraftField::Genre => "genre",
            DraftField::Quantity => "quantity",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(DraftField::Title),
            "author" => Ok(DraftField::Author),
            "isbn" => Ok(DraftField::Isbn),
            "publishedYear" | "published_year" | "year" => Ok(DraftField::PublishedYear),
            "genre" => Ok(DraftField::Genre),
            "quantity" => Ok(DraftField::Quantity),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// Book-shaped record of raw field text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    /// Present only when editing an existing record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: String,
    pub genre: String,
    pub quantity: String,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            published_year: String::new(),
            genre: String::new(),
            quantity: "1".to_string(),
        }
    }
}

impl BookDraft {
    /// Seeds a draft from an existing record
    ///
    /// Missing optional fields become empty text, except the quantity which
    /// falls back to `default_quantity`.
    pub fn from_book(book: &Book, default_quantity: &str) -> Self {
        Self {
            id: Some(book.id.clone()),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone().unwrap_or_default(),
            published_year: book
                .published_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            genre: book.genre.clone().unwrap_or_default(),
            quantity: book
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| default_quantity.to_string()),
        }
    }

    /// Returns the raw text of one field
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.title,
            DraftField::Author => &self.author,
            DraftField::Isbn => &self.isbn,
            DraftField::PublishedYear => &self.published_year,
            DraftField::Genre => &self.genre,
            DraftField::Quantity => &self.quantity,
        }
    }

    /// Replaces one field's text without validating it
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Title => self.title = value,
            DraftField::Author => self.author = value,
            DraftField::Isbn => self.isbn = value,
            DraftField::PublishedYear => self.published_year = value,
            DraftField::Genre => self.genre = value,
            DraftField::Quantity => self.quantity = value,
        }
    }

    /// Returns true if title and author are non-empty after trimming
    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty() && !self.author.trim().is_empty()
    }

    /// Validates the draft and produces the payload sent to the catalog
    pub fn normalize(&self) -> Result<BookPayload, ValidationError> {
        if !self.has_required_fields() {
            return Err(ValidationError::MissingTitleOrAuthor);
        }

        Ok(BookPayload {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            published_year: coerce_year(&self.published_year),
            genre: self.genre.trim().to_string(),
            quantity: coerce_quantity(&self.quantity),
        })
    }
}
