//! Derived inventory view
//!
//! [`derive`] turns the collection and a [`Query`] into what the user sees:
//! the filtered, sorted books plus statistics over the whole collection.
//! It is a pure function. Nothing here is cached, so callers recompute on
//! every read and identical inputs always give identical output.
//!
//! ## Pipeline
//!
//! 1. Search: keep books whose title, author, isbn or genre contains the
//!    lower-cased term (missing fields count as empty)
//! 2. Genre: keep exact genre matches unless the filter is `all`
//! 3. Sort: stable sort on a copy, per [`SortKey`]
//!
//! Statistics and the genre list ignore the query entirely.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::book::Book;
use super::query::{Query, SortKey};

/// Aggregate statistics over the full collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total_titles: usize,
    pub total_copies: i64,
    pub distinct_genres: usize,
    pub low_stock_count: usize,
}

impl Stats {
    pub fn from_books(books: &[Book]) -> Self {
        let distinct: BTreeSet<&str> = books.iter().filter_map(Book::genre_label).collect();

        Self {
            total_titles: books.len(),
            total_copies: books
                .iter()
                .map(Book::copies)
                .fold(0i64, |total, copies| total.saturating_add(copies)),
            distinct_genres: distinct.len(),
            low_stock_count: books.iter().filter(|b| b.is_low_stock()).count(),
        }
    }
}

/// Result of [`derive`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    /// Books passing the query, in display order
    pub visible: Vec<Book>,
    pub stats: Stats,
    /// Distinct non-empty genres for the filter selector
    pub genres: Vec<String>,
    pub active_filters: usize,
}

impl DerivedView {
    /// Number of books shown
    pub fn shown(&self) -> usize {
        self.visible.len()
    }

    /// True when there is nothing in the collection at all
    pub fn is_empty_collection(&self) -> bool {
        self.stats.total_titles == 0
    }

    /// True when the collection has books but none match the query
    pub fn has_no_matches(&self) -> bool {
        !self.is_empty_collection() && self.visible.is_empty()
    }
}

/// Computes the visible books and statistics for a query
pub fn derive(books: &[Book], query: &Query) -> DerivedView {
    DerivedView {
        visible: visible_books(books, query),
        stats: Stats::from_books(books),
        genres: genres(books),
        active_filters: query.active_filter_count(),
    }
}

/// Filters and sorts without touching the input order
pub fn visible_books(books: &[Book], query: &Query) -> Vec<Book> {
    let term = query.normalized_term();

    let mut visible: Vec<Book> = books
        .iter()
        .filter(|book| term.as_deref().map_or(true, |t| matches_term(book, t)))
        .filter(|book| query.genre_filter.matches(book.genre.as_deref()))
        .cloned()
        .collect();

    sort_books(&mut visible, query.sort_key);
    visible
}

/// Sorted distinct non-empty genres
pub fn genres(books: &[Book]) -> Vec<String> {
    let unique: BTreeSet<&str> = books.iter().filter_map(Book::genre_label).collect();
    let mut genres: Vec<String> = unique.into_iter().map(str::to_string).collect();
    genres.sort_by(|a, b| locale_cmp(a, b));
    genres
}

/// Stable in-place sort by the given key
pub fn sort_books(books: &mut [Book], key: SortKey) {
    match key {
        SortKey::Title => books.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortKey::Author => books.sort_by(|a, b| locale_cmp(&a.author, &b.author)),
        SortKey::Year => books.sort_by_key(|b| std::cmp::Reverse(b.year_or_zero())),
        SortKey::Copies => books.sort_by_key(|b| std::cmp::Reverse(b.copies())),
    }
}

fn matches_term(book: &Book, term: &str) -> bool {
    let fields = [
        book.title.as_str(),
        book.author.as_str(),
        book.isbn.as_deref().unwrap_or(""),
        book.genre.as_deref().unwrap_or(""),
    ];
    fields.iter().any(|field| field.to_lowercase().contains(term))
}

/// Human-friendly string ordering
///
/// Compares base letters first (accents and case ignored), then accents,
/// then case with lower case first. Strings that differ only in those
/// respects stay adjacent, as in a dictionary.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| a.to_lowercase().nfc().cmp(b.to_lowercase().nfc()))
        .then_with(|| b.cmp(a))
}

fn base_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
