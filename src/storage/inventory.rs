//! Inventory store
//!
//! Owns the authoritative copy of the collection. Every mutation goes to the
//! catalog first and is followed by a full reload; the local collection is
//! only ever replaced wholesale, never patched.
//!
//! Failures never escape as errors. They are logged, stored in
//! [`InventoryStore::last_error`] and reported as [`Outcome::Failed`], and
//! the collection is left as it was so the same action can be retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::repository::{BookRepository, RepositoryError};
use crate::domain::{
    derive, Book, BookDraft, BookId, DerivedView, EditMode, Query, ValidationError,
};

/// How a store operation ended
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The round trip succeeded
    Completed,
    /// A load was already in flight, so this one did nothing
    Skipped,
    /// The round trip failed; the message is also in `last_error`
    Failed(String),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Clears the loading flag when dropped
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// In-memory collection synchronized with a [`BookRepository`]
pub struct InventoryStore<R> {
    repo: R,
    books: RwLock<Arc<Vec<Book>>>,
    loading: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl<R: BookRepository> InventoryStore<R> {
    /// Creates an empty store; call [`load`](Self::load) to populate it
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            books: RwLock::new(Arc::new(Vec::new())),
            loading: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Returns the repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Snapshot of the collection in the order last received
    pub fn books(&self) -> Arc<Vec<Book>> {
        Arc::clone(&self.books.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns true while a load is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// The message from the most recent failure, if not cleared since
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Looks up a book in the current collection
    pub fn find(&self, id: &BookId) -> Option<Book> {
        self.books().iter().find(|b| &b.id == id).cloned()
    }

    /// Derives the view for a query from the current collection
    pub fn view(&self, query: &Query) -> DerivedView {
        derive(&self.books(), query)
    }

    /// Replaces the collection with the catalog's current contents
    ///
    /// A load started while another is in flight returns [`Outcome::Skipped`].
    pub fn load(&self) -> Outcome {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("load already in flight, skipping");
            return Outcome::Skipped;
        }
        let _guard = LoadingGuard(&self.loading);

        self.set_error(None);

        match self.repo.list() {
            Ok(books) => {
                info!(count = books.len(), "collection loaded");
                *self.books.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(books);
                Outcome::Completed
            }
            Err(e) => self.fail("load", e),
        }
    }

    /// Validates and submits a draft, then reloads
    ///
    /// Create mode posts a new record; Edit mode replaces the record named by
    /// the draft's id. Only validation problems are returned as errors, and
    /// those never reach the catalog.
    pub fn save(&self, draft: &BookDraft, mode: EditMode) -> Result<Outcome, ValidationError> {
        self.set_error(None);

        let payload = match draft.normalize() {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "draft rejected");
                self.set_error(Some(e.to_string()));
                return Err(e);
            }
        };

        let result = match mode {
            EditMode::Create => self.repo.create(&payload),
            EditMode::Edit => {
                let Some(id) = draft.id.as_ref() else {
                    let e = ValidationError::MissingId;
                    self.set_error(Some(e.to_string()));
                    return Err(e);
                };
                self.repo.replace(id, &payload)
            }
        };

        match result {
            Ok(saved) => {
                info!(id = %saved.id, mode = mode.as_str(), "book saved");
                self.reload_after_mutation();
                Ok(Outcome::Completed)
            }
            Err(e) => Ok(self.fail("save", e)),
        }
    }

    /// Deletes a record, then reloads
    ///
    /// Confirmation is the caller's job; this deletes unconditionally.
    pub fn delete(&self, id: &BookId) -> Outcome {
        self.set_error(None);

        match self.repo.remove(id) {
            Ok(()) => {
                info!(%id, "book deleted");
                self.reload_after_mutation();
                Outcome::Completed
            }
            Err(e) => self.fail("delete", e),
        }
    }

    fn reload_after_mutation(&self) {
        // The mutation already succeeded; a failed reload only shows up in last_error
        let _ = self.load();
    }

    fn fail(&self, operation: &str, error: RepositoryError) -> Outcome {
        warn!(operation, error = %error, "catalog operation failed");
        let message = error.to_string();
        self.set_error(Some(message.clone()));
        Outcome::Failed(message)
    }

    fn set_error(&self, message: Option<String>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }
}
