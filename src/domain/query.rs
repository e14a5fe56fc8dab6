//! Query parameters for the derived inventory view

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("Invalid sort key '{0}'. Expected one of: title, author, year, copies")]
    InvalidSortKey(String),
}

/// Ordering applied to the visible books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Title, A to Z
    #[default]
    Title,
    /// Author, A to Z
    Author,
    /// Newest publication year first
    Year,
    /// Most copies first
    Copies,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Year => "year",
            SortKey::Copies => "copies",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(SortKey::Title),
            "author" => Ok(SortKey::Author),
            "year" => Ok(SortKey::Year),
            "copies" => Ok(SortKey::Copies),
            other => Err(QueryError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Genre restriction: every genre, or one exact genre
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl GenreFilter {
    /// Sentinel text that selects every genre
    pub const ALL: &'static str = "all";

    pub fn is_all(&self) -> bool {
        matches!(self, GenreFilter::All)
    }

    /// Exact, case-sensitive match against a book's genre
    pub fn matches(&self, genre: Option<&str>) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Only(wanted) => genre == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => f.write_str(Self::ALL),
            GenreFilter::Only(genre) => f.write_str(genre),
        }
    }
}

impl From<String> for GenreFilter {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            GenreFilter::All
        } else {
            GenreFilter::Only(value)
        }
    }
}

impl From<&str> for GenreFilter {
    fn from(value: &str) -> Self {
        GenreFilter::from(value.to_string())
    }
}

impl From<GenreFilter> for String {
    fn from(filter: GenreFilter) -> Self {
        filter.to_string()
    }
}

/// Search, genre and sort settings for a derived view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query {
    /// Case-insensitive substring matched against title, author, isbn and genre
    pub search_term: String,
    pub genre_filter: GenreFilter,
    pub sort_key: SortKey,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn genre(mut self, filter: impl Into<GenreFilter>) -> Self {
        self.genre_filter = filter.into();
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// The search term lower-cased and trimmed, or `None` when blank
    pub fn normalized_term(&self) -> Option<String> {
        let term = self.search_term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_lowercase())
        }
    }

    /// Counts the active filter controls
    ///
    /// Search, genre and sort each contribute one independently. A sort key
    /// is always selected, so the count is never below one.
    pub fn active_filter_count(&self) -> usize {
        let search = usize::from(!self.search_term.trim().is_empty());
        let genre = usize::from(!self.genre_filter.is_all());
        let sort = 1;
        search + genre + sort
    }

    /// Restores the default search, genre and sort
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
