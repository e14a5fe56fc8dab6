//! # Storage Layer
//!
//! Everything that talks to the outside world: the remote catalog and the
//! configuration file.
//!
//! ## Data Flow
//!
//! ```text
//! load ──▶ InventoryStore ──▶ BookRepository::list ──▶ GET {api_url}
//!                │
//! save/delete ───┴──▶ create / replace / remove ──▶ then load again
//! ```
//!
//! ## Concurrency Safety
//!
//! - [`InventoryStore`] methods take `&self` and the store is `Sync`
//! - The collection is an `Arc` snapshot replaced wholesale, never edited in place
//! - A second [`InventoryStore::load`] during a load is skipped
//!
//! ## Key Types
//!
//! - [`BookRepository`] - The catalog contract
//! - [`HttpBookRepository`] - The contract over HTTP
//! - [`InventoryStore`] - Authoritative in-memory collection
//! - [`Config`] - Client configuration

mod config;
mod inventory;
mod repository;

pub use config::{Config, ConfigError, DraftDefaults, DEFAULT_API_URL};
pub use inventory::{InventoryStore, Outcome};
pub use repository::{BookRepository, HttpBookRepository, RepositoryError};

#[cfg(test)]
pub(crate) use inventory::testing;
