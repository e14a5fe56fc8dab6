//! Edit session state machine
//!
//! Tracks whether the form is creating a new record or editing an existing
//! one, plus the staged draft.
//!
//! ```text
//!            start_edit(book)
//!   Create ─────────────────────▶ Edit
//!     ▲  ◀───────────────────────  │
//!     │  start_create / saved      │ start_edit(other)
//!     └── update_field ──┘         └── update_field
//! ```
//!
//! A successful submission always lands back in Create with a fresh draft,
//! whichever mode it started in. A failed one leaves the state untouched.

use serde::Serialize;

use crate::domain::{Book, BookDraft, DraftField, EditMode, ValidationError};
use crate::storage::{BookRepository, InventoryStore, Outcome};

/// Form state for creating or editing one book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditSession {
    mode: EditMode,
    draft: BookDraft,
    validation_error: Option<String>,
    #[serde(skip)]
    template: BookDraft,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(BookDraft::default())
    }
}

impl EditSession {
    /// Starts in Create mode with `template` as the empty draft
    pub fn new(template: BookDraft) -> Self {
        let template = BookDraft { id: None, ..template };
        Self {
            mode: EditMode::Create,
            draft: template.clone(),
            validation_error: None,
            template,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Edit
    }

    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Resets to Create mode with a fresh draft
    pub fn start_create(&mut self) {
        self.mode = EditMode::Create;
        self.draft = self.template.clone();
        self.validation_error = None;
    }

    /// Switches to Edit mode seeded from `book`
    pub fn start_edit(&mut self, book: &Book) {
        self.mode = EditMode::Edit;
        self.draft = BookDraft::from_book(book, &self.template.quantity);
        self.validation_error = None;
    }

    /// Replaces one draft field; nothing is validated until submit
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Validates the draft and hands it to the store
    ///
    /// Invalid drafts are rejected here without touching the store. When the
    /// store completes the save the session resets to Create; when the
    /// catalog rejects it the draft is kept for another attempt.
    pub fn submit<R: BookRepository>(
        &mut self,
        store: &InventoryStore<R>,
    ) -> Result<Outcome, ValidationError> {
        if !self.draft.has_required_fields() {
            let e = ValidationError::MissingTitleOrAuthor;
            self.validation_error = Some(e.to_string());
            return Err(e);
        }
        self.validation_error = None;

        let outcome = store.save(&self.draft, self.mode).inspect_err(|e| {
            self.validation_error = Some(e.to_string());
        })?;

        if outcome.is_completed() {
            self.start_create();
        }
        Ok(outcome)
    }
}
