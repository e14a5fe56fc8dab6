//! Domain models for the inventory client
//!
//! Contains the core business logic without any I/O concerns: the book
//! record, drafts and their validation, queries, and the derived view.

mod book;
mod draft;
mod query;
mod view;

pub use book::{
    coerce_number, coerce_quantity, coerce_year, Book, BookId, BookPayload, LOW_STOCK_THRESHOLD,
};
pub use draft::{BookDraft, DraftField, EditMode, ValidationError};
pub use query::{GenreFilter, Query, QueryError, SortKey};
pub use view::{derive, genres, locale_cmp, sort_books, visible_books, DerivedView, Stats};
