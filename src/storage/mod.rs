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


//! Database storage and models
//!
//! This module handles all database operations using SQLite via sqlx.
//!
//! # Database Schema
//! - Books, Authors, Genres, Publishers, Editions, Users, Feedback
//! - BookAuthors, BookGenres, Favourites junction tables
//! - Editions point at their publisher (required) and book (optional)
//!
//! # Usage Example
//! ```no_run
//! use catalog_core::storage::{Database, queries, models::NewBook};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./catalog.db").await?;
//!
//! let isbn = queries::insert_book(db.pool(), &NewBook::new("The Hobbit".to_string())).await?;
//! let book = queries::find_book_by_isbn(db.pool(), isbn).await?;
//! # Ok(())
//! # }
//! ```

pub mod associations;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

// Re-export commonly used types
pub use associations::{Association, SetDiff};
pub use database::{Database, DatabaseStats};
pub use models::{
    Author, Book, Edition, Feedback, Genre, NewAuthor, NewBook, NewEdition, NewFeedback,
    NewPublisher, NewUser, Publisher, User, UserRole,
};
