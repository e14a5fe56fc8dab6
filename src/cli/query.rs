//! Query commands (list, stats, genres)
//!
//! These load the full collection and print a derived view of it.

use anyhow::Result;

use super::app::load;
use super::output::Output;
use crate::domain::{Book, GenreFilter, Query, SortKey};
use crate::storage::{HttpBookRepository, InventoryStore};

type Store = InventoryStore<HttpBookRepository>;

/// Show the filtered, sorted books
pub fn list(
    store: &Store,
    output: &Output,
    search: String,
    genre: String,
    sort: SortKey,
) -> Result<()> {
    load(store)?;

    let query = Query::new()
        .search(search)
        .genre(GenreFilter::from(genre))
        .sort(sort);
    let view = store.view(&query);

    if output.is_json() {
        output.data(&serde_json::json!({
            "books": view.visible,
            "shown": view.shown(),
            "active_filters": view.active_filters,
            "query": query,
            "stats": view.stats,
        }));
    } else if view.is_empty_collection() {
        println!("No books yet. Add your first record with 'bookinv add'.");
    } else if view.has_no_matches() {
        println!("No matches. Try a different search or filter.");
    } else {
        println!(
            "{:<10} {:<30} {:<20} {:<6} {:<14} COPIES",
            "ID", "TITLE", "AUTHOR", "YEAR", "GENRE"
        );
        println!("{}", "-".repeat(90));
        for book in &view.visible {
            print_row(book);
        }
        println!();
        println!(
            "{} shown, {} active filter(s)",
            view.shown(),
            view.active_filters
        );
    }

    Ok(())
}

/// Show inventory totals
pub fn stats(store: &Store, output: &Output) -> Result<()> {
    load(store)?;
    let view = store.view(&Query::default());
    let stats = view.stats;

    if output.is_json() {
        output.data(&stats);
    } else {
        println!("Inventory Snapshot");
        println!("{}", "=".repeat(40));
        println!();
        println!("  Titles:    {}", stats.total_titles);
        println!("  Copies:    {}", stats.total_copies);
        println!("  Genres:    {}", stats.distinct_genres);
        println!();
        println!("  Low stock: {} (2 or fewer copies)", stats.low_stock_count);
    }

    Ok(())
}

/// List genres in use
pub fn genres(store: &Store, output: &Output) -> Result<()> {
    load(store)?;
    let genres = store.view(&Query::default()).genres;

    if output.is_json() {
        output.data(&genres);
    } else if genres.is_empty() {
        println!("No genres set.");
    } else {
        for genre in &genres {
            println!("{}", genre);
        }
    }

    Ok(())
}

fn print_row(book: &Book) {
    let year = book
        .published_year
        .filter(|y| *y != 0)
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    println!(
        "{:<10} {:<30} {:<20} {:<6} {:<14} {}",
        book.id.to_string(),
        truncate(&book.title, 30),
        truncate(&book.author, 20),
        year,
        truncate(book.genre_label().unwrap_or("-"), 14),
        book.copies()
    );
}

/// Shortens text to fit a column, marking the cut with '~'
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
