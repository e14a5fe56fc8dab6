//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::book::{self, BookFields};
use super::config_cmd::{self, ConfigCommands};
use super::output::{Output, OutputFormat};
use super::query;
use crate::domain::SortKey;
use crate::storage::{Config, HttpBookRepository, InventoryStore, Outcome};

#[derive(Parser)]
#[command(name = "bookinv")]
#[command(author, version, about = "Manage a remote book inventory")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog collection URL (overrides the config file)
    #[arg(long, global = true, env = "BOOKINV_API_URL")]
    pub api_url: Option<String>,

    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List books, optionally searched, filtered and sorted
    List {
        /// Case-insensitive text matched against title, author, ISBN and genre
        #[arg(long, short)]
        search: Option<String>,

        /// Only show this genre ("all" for every genre)
        #[arg(long, short, default_value = "all")]
        genre: String,

        /// Sort order: title, author, year (newest first) or copies (most first)
        #[arg(long, default_value = "title")]
        sort: SortKey,
    },

    /// Show inventory totals
    Stats,

    /// List the genres in use
    Genres,

    /// Show one book
    Show {
        /// Book ID
        id: String,
    },

    /// Add a new book
    Add(BookFields),

    /// Edit an existing book (unspecified fields keep their values)
    Edit {
        /// Book ID
        id: String,

        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book
    Delete {
        /// Book ID
        id: String,

        /// Confirm the deletion
        #[arg(long, short)]
        yes: bool,
    },

    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(cli.format);

    let config_path = cli.config.clone().or_else(Config::default_path);
    debug!(path = ?config_path, "resolving configuration");

    let api_url = cli.api_url;
    let open = || open_catalog(config_path.as_deref(), api_url.as_deref());

    match cli.command {
        Commands::Config(cmd) => {
            config_cmd::run(cmd, &output, config_path.as_deref(), api_url.clone())?
        }

        Commands::List { search, genre, sort } => {
            let (_, store) = open()?;
            query::list(&store, &output, search.unwrap_or_default(), genre, sort)?
        }
        Commands::Stats => {
            let (_, store) = open()?;
            query::stats(&store, &output)?
        }
        Commands::Genres => {
            let (_, store) = open()?;
            query::genres(&store, &output)?
        }

        Commands::Show { id } => {
            let (_, store) = open()?;
            book::show(&store, &output, &id)?
        }
        Commands::Add(fields) => {
            let (config, store) = open()?;
            book::add(&store, &output, &config, fields)?
        }
        Commands::Edit { id, fields } => {
            let (config, store) = open()?;
            book::edit(&store, &output, &config, &id, fields)?
        }
        Commands::Delete { id, yes } => {
            let (_, store) = open()?;
            book::delete(&store, &output, &id, yes)?
        }
    }

    debug!("command completed successfully");
    Ok(())
}

/// Sets up `tracing` on stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "book_inventory=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads the configuration and builds the store for its catalog
///
/// `api_url` (flag or environment) wins over the file.
fn open_catalog(
    config_path: Option<&Path>,
    api_url: Option<&str>,
) -> Result<(Config, InventoryStore<HttpBookRepository>)> {
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    }
    .with_api_url(api_url.map(str::to_string))?;
    debug!(api_url = %config.api_url, "using catalog");

    let store = InventoryStore::new(HttpBookRepository::new(&config.api_url, config.timeout()));
    Ok((config, store))
}

/// Loads the collection, turning a failed load into a command error
pub(super) fn load(store: &InventoryStore<HttpBookRepository>) -> Result<()> {
    match store.load() {
        Outcome::Failed(message) => bail!(message),
        Outcome::Completed | Outcome::Skipped => Ok(()),
    }
}
