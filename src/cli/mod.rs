//! # Command-Line Interface
//!
//! User-facing commands over the inventory store.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Query | Derived views | `list`, `stats`, `genres` |
//! | Book | Record lifecycle | `show`, `add`, `edit`, `delete` |
//! | Config | Settings | `config show`, `config init` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logging on stderr; `RUST_LOG`
//! overrides it:
//! ```bash
//! bookinv --verbose list --sort copies
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod book;
mod query;
mod config_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
