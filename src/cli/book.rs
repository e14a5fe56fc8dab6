//! Book CLI commands

use anyhow::{anyhow, bail, Result};
use clap::Args;

use super::app::load;
use super::output::Output;
use crate::domain::{BookId, DraftField};
use crate::session::EditSession;
use crate::storage::{Config, HttpBookRepository, InventoryStore, Outcome};

type Store = InventoryStore<HttpBookRepository>;

/// Field values given on the command line
///
/// Values are passed through as typed; numbers are coerced on save, so an
/// unparseable year is dropped and an unparseable quantity becomes 0.
#[derive(Args, Debug, Default)]
pub struct BookFields {
    /// Book title
    #[arg(long)]
    pub title: Option<String>,

    /// Author name
    #[arg(long)]
    pub author: Option<String>,

    /// ISBN (free-form)
    #[arg(long)]
    pub isbn: Option<String>,

    /// Publication year
    #[arg(long)]
    pub year: Option<String>,

    /// Genre
    #[arg(long)]
    pub genre: Option<String>,

    /// Copies on hand
    #[arg(long)]
    pub quantity: Option<String>,
}

impl BookFields {
    /// Applies every given field to the session draft
    fn apply(self, session: &mut EditSession) {
        let fields = [
            (DraftField::Title, self.title),
            (DraftField::Author, self.author),
            (DraftField::Isbn, self.isbn),
            (DraftField::PublishedYear, self.year),
            (DraftField::Genre, self.genre),
            (DraftField::Quantity, self.quantity),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                session.update_field(field, value);
            }
        }
    }
}

/// Show one book
pub fn show(store: &Store, output: &Output, id_str: &str) -> Result<()> {
    load(store)?;

    let id: BookId = id_str.parse()?;
    let book = store
        .find(&id)
        .ok_or_else(|| anyhow!("Book not found: {}", id))?;

    if output.is_json() {
        output.data(&book);
    } else {
        println!("Book: {}", book.id);
        println!("Title: {}", book.title);
        println!("Author: {}", book.author);
        println!("Genre: {}", book.genre_label().unwrap_or("Genre not set"));
        match book.published_year.filter(|y| *y != 0) {
            Some(year) => println!("Year: {}", year),
            None => println!("Year: N/A"),
        }
        println!(
            "ISBN: {}",
            book.isbn.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
        );
        println!("Copies: {}", book.copies());
        if book.is_low_stock() {
            println!();
            println!("Low stock: 2 or fewer copies on hand");
        }
    }

    Ok(())
}

/// Add a new book
pub fn add(store: &Store, output: &Output, config: &Config, fields: BookFields) -> Result<()> {
    let mut session = EditSession::new(config.draft.to_draft());
    fields.apply(&mut session);
    let title = session.draft().title.trim().to_string();

    submit(store, &mut session)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "mode": "create",
            "title": title,
            "total_titles": store.books().len(),
        }));
    } else {
        output.success(&format!("Added book: {}", title));
    }

    Ok(())
}

/// Edit an existing book
pub fn edit(
    store: &Store,
    output: &Output,
    config: &Config,
    id_str: &str,
    fields: BookFields,
) -> Result<()> {
    load(store)?;

    let id: BookId = id_str.parse()?;
    let book = store
        .find(&id)
        .ok_or_else(|| anyhow!("Book not found: {}", id))?;

    let mut session = EditSession::new(config.draft.to_draft());
    session.start_edit(&book);
    fields.apply(&mut session);

    submit(store, &mut session)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "mode": "edit",
            "book": store.find(&id),
        }));
    } else {
        output.success(&format!("Updated book: {}", id));
    }

    Ok(())
}

/// Delete a book
pub fn delete(store: &Store, output: &Output, id_str: &str, confirmed: bool) -> Result<()> {
    let id: BookId = id_str.parse()?;

    if !confirmed {
        bail!(
            "Refusing to remove book {} from inventory without confirmation. Re-run with --yes.",
            id
        );
    }

    match store.delete(&id) {
        Outcome::Failed(message) => bail!(message),
        Outcome::Completed | Outcome::Skipped => {}
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "success": true,
            "deleted": id,
            "total_titles": store.books().len(),
        }));
    } else {
        output.success(&format!("Deleted book: {}", id));
    }

    Ok(())
}

fn submit(store: &Store, session: &mut EditSession) -> Result<()> {
    match session.submit(store)? {
        Outcome::Failed(message) => bail!(message),
        Outcome::Completed | Outcome::Skipped => Ok(()),
    }
}
