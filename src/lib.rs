//! Book Inventory - a command-line client for a remote book catalog
//!
//! Holds the collection fetched from the catalog service, stages creates and
//! edits through an [`EditSession`], and derives searchable, sorted views
//! with aggregate statistics.

pub mod domain;
pub mod storage;
pub mod session;
pub mod cli;

pub use domain::{Book, BookDraft, BookId, DerivedView, Query, SortKey, Stats};
pub use session::EditSession;
pub use storage::{BookRepository, Config, HttpBookRepository, InventoryStore, Outcome};
