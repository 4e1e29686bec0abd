// Book Catalog - library catalog data layer
// Copyright (C) 2025 Book Catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Catalog services
//!
//! `Catalog` is the façade the presentation layer talks to. It owns a
//! `Database` handle, runs each operation in its own transaction, and hands
//! back plain model structs with derived ratings already recomputed.
//!
//! Every mutation takes an explicit [`Actor`]; nothing reads ambient
//! "current user" state.
//!
//! # Usage Example
//! ```no_run
//! use catalog_core::catalog::{Actor, Catalog};
//! use catalog_core::storage::{Database, NewUser};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(Database::new("./catalog.db").await?);
//!
//! let user = catalog
//!     .register_user(&NewUser::new("john".to_string(), "john@example.com".to_string()))
//!     .await?;
//! let actor = Actor::from_user(&user);
//!
//! catalog.add_favourite(&actor, 9780261102217).await?;
//! let favourites = catalog.list_favourite_books(user.user_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod actor;
pub mod admin;
pub mod browse;
pub mod favourites;
pub mod feedback;
pub mod ratings;
pub mod validation;

pub use actor::Actor;
pub use admin::BookLinks;
pub use browse::{AuthorDetails, BookDetails, GenreDetails, Landing, PublisherDetails, SearchResults};
pub use ratings::format_rating;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::storage::models::{Author, Book, Genre, Publisher, User};
use crate::storage::{queries, Database};
use sqlx::{Executor, Sqlite};

/// Number of entries on the landing view unless configured otherwise
pub const DEFAULT_TOP_N: i64 = 4;

/// Catalog service façade
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
    top_n: i64,
}

impl Catalog {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            top_n: DEFAULT_TOP_N,
        }
    }

    /// Open the configured database and apply the configured landing size
    pub async fn open(config: &CatalogConfig) -> Result<Self> {
        config.validate()?;
        let db = Database::from_config(config).await?;
        Ok(Self::new(db).with_top_n(config.top_n))
    }

    pub fn with_top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    pub fn top_n(&self) -> i64 {
        self.top_n
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

// ============================================================================
// LOOKUP HELPERS
// ============================================================================
//
// Shared by the service modules: fetch by key or fail with NotFound.

pub(crate) async fn require_book<'e, E>(executor: E, isbn: i64) -> Result<Book>
where
    E: Executor<'e, Database = Sqlite>,
{
    queries::find_book_by_isbn(executor, isbn)
        .await?
        .ok_or_else(|| CatalogError::not_found("book", isbn))
}

pub(crate) async fn require_user<'e, E>(executor: E, user_id: i64) -> Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    queries::find_user_by_id(executor, user_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("user", user_id))
}

pub(crate) async fn require_author_named<'e, E>(executor: E, name: &str) -> Result<Author>
where
    E: Executor<'e, Database = Sqlite>,
{
    queries::find_author_by_name(executor, name)
        .await?
        .ok_or_else(|| CatalogError::not_found("author", name))
}

pub(crate) async fn require_genre_named<'e, E>(executor: E, name: &str) -> Result<Genre>
where
    E: Executor<'e, Database = Sqlite>,
{
    queries::find_genre_by_name(executor, name)
        .await?
        .ok_or_else(|| CatalogError::not_found("genre", name))
}

pub(crate) async fn require_publisher_named<'e, E>(executor: E, name: &str) -> Result<Publisher>
where
    E: Executor<'e, Database = Sqlite>,
{
    queries::find_publisher_by_name(executor, name)
        .await?
        .ok_or_else(|| CatalogError::not_found("publisher", name))
}
