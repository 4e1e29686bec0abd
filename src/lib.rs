//! Book catalog core
//!
//! Data layer for a library catalog: books, authors, genres, publishers,
//! editions, users, feedback and favourites on SQLite, with derived
//! ratings recomputed on read.
//!
//! - [`storage`] owns the schema, row models and query functions.
//! - [`catalog`] is the service façade presentation code calls into.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;

pub use catalog::{Actor, BookLinks, Catalog};
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use storage::Database;
