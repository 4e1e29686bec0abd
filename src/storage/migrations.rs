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


//! Database migrations
//!
//! This module handles database schema creation and migrations.
//!
//! # Migration Strategy
//! Since sqlx's compile-time migration system requires build-time database connection,
//! migrations are plain SQL executed at runtime and tracked in `_migrations`.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};

/// Run all database migrations
///
/// This function creates the database schema and applies any pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    tracing::debug!(id, name, "applied migration");
    Ok(())
}

/// Create initial database schema
///
/// Creates all tables with their relationships, indexes, and constraints.
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- ============================================================================
-- MAIN ENTITIES
-- ============================================================================

-- Books: ISBN doubles as the rowid, so it may be supplied or assigned
CREATE TABLE IF NOT EXISTS Books (
    isbn INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    image TEXT,
    rating REAL NOT NULL DEFAULT 0.0  -- derived from Feedback, see catalog::ratings
);

CREATE TABLE IF NOT EXISTS Authors (
    author_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    date_birth TEXT,  -- YYYY-MM-DD
    date_death TEXT,
    country TEXT,
    image TEXT,
    rating REAL NOT NULL DEFAULT 0.0  -- derived from book ratings
);

CREATE TABLE IF NOT EXISTS Genres (
    genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Publishers (
    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL,
    phone TEXT NOT NULL
);

-- Editions: owned by exactly one publisher, optionally attached to one book
CREATE TABLE IF NOT EXISTS Editions (
    edition_id INTEGER PRIMARY KEY AUTOINCREMENT,
    language TEXT NOT NULL,
    year TEXT NOT NULL,
    publisher_id INTEGER NOT NULL,
    book_isbn INTEGER,
    FOREIGN KEY (publisher_id) REFERENCES Publishers(publisher_id) ON DELETE CASCADE,
    FOREIGN KEY (book_isbn) REFERENCES Books(isbn) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS Users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT,
    about_me TEXT,
    last_seen TEXT NOT NULL,
    role INTEGER NOT NULL DEFAULT 0  -- UserRole enum (Regular=0, Admin=1)
);

-- Feedback keeps a copy of the book title so it outlives the book
CREATE TABLE IF NOT EXISTS Feedback (
    feedback_id INTEGER PRIMARY KEY AUTOINCREMENT,
    body TEXT NOT NULL,
    rate INTEGER NOT NULL CHECK (rate BETWEEN 1 AND 5),
    timestamp TEXT NOT NULL,
    book_title_reserved TEXT NOT NULL,
    user_id INTEGER NOT NULL,
    book_isbn INTEGER,
    FOREIGN KEY (user_id) REFERENCES Users(user_id) ON DELETE CASCADE,
    FOREIGN KEY (book_isbn) REFERENCES Books(isbn) ON DELETE SET NULL
);

-- ============================================================================
-- JUNCTION TABLES (Many-to-Many Relationships)
-- ============================================================================

CREATE TABLE IF NOT EXISTS BookAuthors (
    author_id INTEGER NOT NULL,
    isbn INTEGER NOT NULL,
    FOREIGN KEY (author_id) REFERENCES Authors(author_id) ON DELETE CASCADE,
    FOREIGN KEY (isbn) REFERENCES Books(isbn) ON DELETE CASCADE,
    PRIMARY KEY (author_id, isbn)
);

CREATE TABLE IF NOT EXISTS BookGenres (
    genre_id INTEGER NOT NULL,
    isbn INTEGER NOT NULL,
    FOREIGN KEY (genre_id) REFERENCES Genres(genre_id) ON DELETE CASCADE,
    FOREIGN KEY (isbn) REFERENCES Books(isbn) ON DELETE CASCADE,
    PRIMARY KEY (genre_id, isbn)
);

CREATE TABLE IF NOT EXISTS Favourites (
    user_id INTEGER NOT NULL,
    isbn INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES Users(user_id) ON DELETE CASCADE,
    FOREIGN KEY (isbn) REFERENCES Books(isbn) ON DELETE CASCADE,
    PRIMARY KEY (user_id, isbn)
);

-- ============================================================================
-- INDEXES for Performance
-- ============================================================================

CREATE INDEX IF NOT EXISTS idx_books_title ON Books(title);
CREATE INDEX IF NOT EXISTS idx_books_rating ON Books(rating);
CREATE INDEX IF NOT EXISTS idx_authors_rating ON Authors(rating);
CREATE INDEX IF NOT EXISTS idx_editions_publisher ON Editions(publisher_id);
CREATE INDEX IF NOT EXISTS idx_editions_book ON Editions(book_isbn);
CREATE INDEX IF NOT EXISTS idx_feedback_book ON Feedback(book_isbn);
CREATE INDEX IF NOT EXISTS idx_feedback_user ON Feedback(user_id);
CREATE INDEX IF NOT EXISTS idx_feedback_timestamp ON Feedback(timestamp);
CREATE INDEX IF NOT EXISTS idx_book_authors_isbn ON BookAuthors(isbn);
CREATE INDEX IF NOT EXISTS idx_book_genres_isbn ON BookGenres(isbn);
CREATE INDEX IF NOT EXISTS idx_favourites_isbn ON Favourites(isbn);
        "#,
    )
    .await?;

    Ok(())
}
