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


//! Database query functions
//!
//! This module implements repository pattern for database operations.
//!
//! # Query Patterns
//! - Repository functions per entity type
//! - Every function takes any sqlx executor, so the same call works on the
//!   pool (`db.pool()`) or inside a transaction (`&mut *tx`)
//! - Listings come back as materialized `Vec`s in a fixed order
//! - UNIQUE violations on natural keys surface as `DuplicateKey`

use crate::error::{map_unique_violation, Result};
use crate::storage::models::*;
use chrono::Utc;
use sqlx::{Executor, Sqlite};

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book
///
/// Returns the ISBN of the inserted book (the supplied one, or the one the
/// store assigned).
pub async fn insert_book<'e, E>(executor: E, book: &NewBook) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO Books (isbn, title, description, image) VALUES (?, ?, ?, ?)",
    )
    .bind(book.isbn)
    .bind(&book.title)
    .bind(&book.description)
    .bind(&book.image)
    .execute(executor)
    .await
    .map_err(|e| {
        let key = book.isbn.map(|isbn| isbn.to_string()).unwrap_or_default();
        map_unique_violation(e, "book", key)
    })?;

    Ok(result.last_insert_rowid())
}

/// Find book by ISBN
pub async fn find_book_by_isbn<'e, E>(executor: E, isbn: i64) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>("SELECT * FROM Books WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(executor)
        .await?;

    Ok(book)
}

/// Replace the editable fields of a book
pub async fn update_book<'e, E>(executor: E, isbn: i64, book: &NewBook) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Books SET title = ?, description = ?, image = ? WHERE isbn = ?")
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.image)
        .bind(isbn)
        .execute(executor)
        .await?;

    Ok(())
}

/// Persist a freshly computed rating
pub async fn set_book_rating<'e, E>(executor: E, isbn: i64, rating: f64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Books SET rating = ? WHERE isbn = ?")
        .bind(rating)
        .bind(isbn)
        .execute(executor)
        .await?;

    Ok(())
}

/// Delete a book
///
/// Join-table rows go with it via CASCADE; editions and feedback keep their
/// rows with `book_isbn` cleared. Returns false if no such book existed.
pub async fn delete_book<'e, E>(executor: E, isbn: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Books WHERE isbn = ?")
        .bind(isbn)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all books ordered by title
pub async fn list_books<'e, E>(executor: E) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>("SELECT * FROM Books ORDER BY title, isbn")
        .fetch_all(executor)
        .await?;

    Ok(books)
}

/// ISBNs of every book, for bulk rating refresh
pub async fn list_book_isbns<'e, E>(executor: E) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let isbns: Vec<i64> = sqlx::query_scalar("SELECT isbn FROM Books ORDER BY isbn")
        .fetch_all(executor)
        .await?;

    Ok(isbns)
}

/// Highest-rated books; ties go to the alphabetically first title
pub async fn top_books<'e, E>(executor: E, limit: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM Books ORDER BY rating DESC, title ASC, isbn ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Books written by an author, ordered by title
pub async fn list_books_by_author<'e, E>(executor: E, author_id: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.* FROM Books b
        INNER JOIN BookAuthors ba ON b.isbn = ba.isbn
        WHERE ba.author_id = ?
        ORDER BY b.title, b.isbn
        "#,
    )
    .bind(author_id)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Books tagged with a genre, ordered by title
pub async fn list_books_by_genre<'e, E>(executor: E, genre_id: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.* FROM Books b
        INNER JOIN BookGenres bg ON b.isbn = bg.isbn
        WHERE bg.genre_id = ?
        ORDER BY b.title, b.isbn
        "#,
    )
    .bind(genre_id)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// A user's favourite books, ordered by title
pub async fn list_favourite_books<'e, E>(executor: E, user_id: i64) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT b.* FROM Books b
        INNER JOIN Favourites f ON b.isbn = f.isbn
        WHERE f.user_id = ?
        ORDER BY b.title, b.isbn
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(books)
}

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

/// Insert a new author, returning its id
pub async fn insert_author<'e, E>(executor: E, author: &NewAuthor) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO Authors (name, date_birth, date_death, country, image)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&author.name)
    .bind(author.date_birth)
    .bind(author.date_death)
    .bind(&author.country)
    .bind(&author.image)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "author", &author.name))?;

    Ok(result.last_insert_rowid())
}

pub async fn find_author_by_id<'e, E>(executor: E, author_id: i64) -> Result<Option<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author = sqlx::query_as::<_, Author>("SELECT * FROM Authors WHERE author_id = ?")
        .bind(author_id)
        .fetch_optional(executor)
        .await?;

    Ok(author)
}

pub async fn find_author_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let author = sqlx::query_as::<_, Author>("SELECT * FROM Authors WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(author)
}

/// Replace the editable fields of an author
pub async fn update_author<'e, E>(executor: E, author_id: i64, author: &NewAuthor) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        UPDATE Authors SET
            name = ?, date_birth = ?, date_death = ?, country = ?, image = ?
        WHERE author_id = ?
        "#,
    )
    .bind(&author.name)
    .bind(author.date_birth)
    .bind(author.date_death)
    .bind(&author.country)
    .bind(&author.image)
    .bind(author_id)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "author", &author.name))?;

    Ok(())
}

pub async fn set_author_rating<'e, E>(executor: E, author_id: i64, rating: f64) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Authors SET rating = ? WHERE author_id = ?")
        .bind(rating)
        .bind(author_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_author<'e, E>(executor: E, author_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Authors WHERE author_id = ?")
        .bind(author_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all authors ordered by name
pub async fn list_authors<'e, E>(executor: E) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>("SELECT * FROM Authors ORDER BY name")
        .fetch_all(executor)
        .await?;

    Ok(authors)
}

pub async fn list_author_ids<'e, E>(executor: E) -> Result<Vec<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ids: Vec<i64> = sqlx::query_scalar("SELECT author_id FROM Authors ORDER BY author_id")
        .fetch_all(executor)
        .await?;

    Ok(ids)
}

/// Highest-rated authors; ties go to the alphabetically first name
pub async fn top_authors<'e, E>(executor: E, limit: i64) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>(
        "SELECT * FROM Authors ORDER BY rating DESC, name ASC, author_id ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

/// Authors of a book, ordered by name
pub async fn list_authors_by_book<'e, E>(executor: E, isbn: i64) -> Result<Vec<Author>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, Author>(
        r#"
        SELECT a.* FROM Authors a
        INNER JOIN BookAuthors ba ON a.author_id = ba.author_id
        WHERE ba.isbn = ?
        ORDER BY a.name
        "#,
    )
    .bind(isbn)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

// ============================================================================
// GENRE QUERIES
// ============================================================================

pub async fn insert_genre<'e, E>(executor: E, name: &str) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO Genres (name) VALUES (?)")
        .bind(name)
        .execute(executor)
        .await
        .map_err(|e| map_unique_violation(e, "genre", name))?;

    Ok(result.last_insert_rowid())
}

pub async fn find_genre_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Genre>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let genre = sqlx::query_as::<_, Genre>("SELECT * FROM Genres WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(genre)
}

pub async fn rename_genre<'e, E>(executor: E, genre_id: i64, name: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Genres SET name = ? WHERE genre_id = ?")
        .bind(name)
        .bind(genre_id)
        .execute(executor)
        .await
        .map_err(|e| map_unique_violation(e, "genre", name))?;

    Ok(())
}

pub async fn delete_genre<'e, E>(executor: E, genre_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Genres WHERE genre_id = ?")
        .bind(genre_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all genres ordered by name
pub async fn list_genres<'e, E>(executor: E) -> Result<Vec<Genre>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let genres = sqlx::query_as::<_, Genre>("SELECT * FROM Genres ORDER BY name")
        .fetch_all(executor)
        .await?;

    Ok(genres)
}

/// Genres of a book, ordered by name
pub async fn list_genres_by_book<'e, E>(executor: E, isbn: i64) -> Result<Vec<Genre>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let genres = sqlx::query_as::<_, Genre>(
        r#"
        SELECT g.* FROM Genres g
        INNER JOIN BookGenres bg ON g.genre_id = bg.genre_id
        WHERE bg.isbn = ?
        ORDER BY g.name
        "#,
    )
    .bind(isbn)
    .fetch_all(executor)
    .await?;

    Ok(genres)
}

// ============================================================================
// PUBLISHER QUERIES
// ============================================================================

pub async fn insert_publisher<'e, E>(executor: E, publisher: &NewPublisher) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO Publishers (name, url, address, phone) VALUES (?, ?, ?, ?)",
    )
    .bind(&publisher.name)
    .bind(&publisher.url)
    .bind(&publisher.address)
    .bind(&publisher.phone)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "publisher", &publisher.name))?;

    Ok(result.last_insert_rowid())
}

pub async fn find_publisher_by_id<'e, E>(executor: E, publisher_id: i64) -> Result<Option<Publisher>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let publisher = sqlx::query_as::<_, Publisher>("SELECT * FROM Publishers WHERE publisher_id = ?")
        .bind(publisher_id)
        .fetch_optional(executor)
        .await?;

    Ok(publisher)
}

pub async fn find_publisher_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Publisher>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let publisher = sqlx::query_as::<_, Publisher>("SELECT * FROM Publishers WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(publisher)
}

pub async fn update_publisher<'e, E>(
    executor: E,
    publisher_id: i64,
    publisher: &NewPublisher,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE Publishers SET name = ?, url = ?, address = ?, phone = ? WHERE publisher_id = ?",
    )
    .bind(&publisher.name)
    .bind(&publisher.url)
    .bind(&publisher.address)
    .bind(&publisher.phone)
    .bind(publisher_id)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "publisher", &publisher.name))?;

    Ok(())
}

/// Delete a publisher together with its editions (CASCADE)
pub async fn delete_publisher<'e, E>(executor: E, publisher_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Publishers WHERE publisher_id = ?")
        .bind(publisher_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// List all publishers ordered by name
pub async fn list_publishers<'e, E>(executor: E) -> Result<Vec<Publisher>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let publishers = sqlx::query_as::<_, Publisher>("SELECT * FROM Publishers ORDER BY name")
        .fetch_all(executor)
        .await?;

    Ok(publishers)
}

// ============================================================================
// EDITION QUERIES
// ============================================================================

pub async fn insert_edition<'e, E>(executor: E, edition: &NewEdition) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO Editions (language, year, publisher_id) VALUES (?, ?, ?)",
    )
    .bind(&edition.language)
    .bind(&edition.year)
    .bind(edition.publisher_id)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_edition_by_id<'e, E>(executor: E, edition_id: i64) -> Result<Option<Edition>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let edition = sqlx::query_as::<_, Edition>("SELECT * FROM Editions WHERE edition_id = ?")
        .bind(edition_id)
        .fetch_optional(executor)
        .await?;

    Ok(edition)
}

/// Replace language, year and publisher; the book link is left alone
pub async fn update_edition<'e, E>(executor: E, edition_id: i64, edition: &NewEdition) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE Editions SET language = ?, year = ?, publisher_id = ? WHERE edition_id = ?",
    )
    .bind(&edition.language)
    .bind(&edition.year)
    .bind(edition.publisher_id)
    .bind(edition_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete_edition<'e, E>(executor: E, edition_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Editions WHERE edition_id = ?")
        .bind(edition_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_editions<'e, E>(executor: E) -> Result<Vec<Edition>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let editions = sqlx::query_as::<_, Edition>("SELECT * FROM Editions ORDER BY edition_id")
        .fetch_all(executor)
        .await?;

    Ok(editions)
}

pub async fn list_editions_by_book<'e, E>(executor: E, isbn: i64) -> Result<Vec<Edition>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let editions = sqlx::query_as::<_, Edition>(
        "SELECT * FROM Editions WHERE book_isbn = ? ORDER BY year, edition_id",
    )
    .bind(isbn)
    .fetch_all(executor)
    .await?;

    Ok(editions)
}

pub async fn list_editions_by_publisher<'e, E>(executor: E, publisher_id: i64) -> Result<Vec<Edition>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let editions = sqlx::query_as::<_, Edition>(
        "SELECT * FROM Editions WHERE publisher_id = ? ORDER BY year, edition_id",
    )
    .bind(publisher_id)
    .fetch_all(executor)
    .await?;

    Ok(editions)
}

// ============================================================================
// USER QUERIES
// ============================================================================

/// Insert a new regular user, returning its id
pub async fn insert_user<'e, E>(executor: E, user: &NewUser) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO Users (username, email, password_hash, last_seen, role)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(Utc::now())
    .bind(UserRole::Regular)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, "user", &user.username))?;

    Ok(result.last_insert_rowid())
}

pub async fn find_user_by_id<'e, E>(executor: E, user_id: i64) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM Users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

pub async fn find_user_by_username<'e, E>(executor: E, username: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM Users WHERE username = ?")
        .bind(username)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

pub async fn find_user_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT * FROM Users WHERE email = ?")
        .bind(email)
        .fetch_optional(executor)
        .await?;

    Ok(user)
}

pub async fn update_user_profile<'e, E>(
    executor: E,
    user_id: i64,
    username: &str,
    about_me: Option<&str>,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Users SET username = ?, about_me = ? WHERE user_id = ?")
        .bind(username)
        .bind(about_me)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(|e| map_unique_violation(e, "user", username))?;

    Ok(())
}

pub async fn set_user_password_hash<'e, E>(executor: E, user_id: i64, hash: &str) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Users SET password_hash = ? WHERE user_id = ?")
        .bind(hash)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Stamp `last_seen` with the current time; returns false for unknown users
pub async fn touch_user_last_seen<'e, E>(executor: E, user_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE Users SET last_seen = ? WHERE user_id = ?")
        .bind(Utc::now())
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_user_role<'e, E>(executor: E, user_id: i64, role: UserRole) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE Users SET role = ? WHERE user_id = ?")
        .bind(role)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(())
}

/// Users who favourited a book, ordered by username
pub async fn list_users_by_favourite<'e, E>(executor: E, isbn: i64) -> Result<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT u.* FROM Users u
        INNER JOIN Favourites f ON u.user_id = f.user_id
        WHERE f.isbn = ?
        ORDER BY u.username
        "#,
    )
    .bind(isbn)
    .fetch_all(executor)
    .await?;

    Ok(users)
}

// ============================================================================
// FEEDBACK QUERIES
// ============================================================================

/// Insert feedback for a book, snapshotting the title it had at the time
pub async fn insert_feedback<'e, E>(
    executor: E,
    user_id: i64,
    book: &Book,
    feedback: &NewFeedback,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO Feedback (body, rate, timestamp, book_title_reserved, user_id, book_isbn)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&feedback.body)
    .bind(feedback.rate)
    .bind(Utc::now())
    .bind(&book.title)
    .bind(user_id)
    .bind(book.isbn)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_feedback_by_id<'e, E>(executor: E, feedback_id: i64) -> Result<Option<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let feedback = sqlx::query_as::<_, Feedback>("SELECT * FROM Feedback WHERE feedback_id = ?")
        .bind(feedback_id)
        .fetch_optional(executor)
        .await?;

    Ok(feedback)
}

pub async fn delete_feedback<'e, E>(executor: E, feedback_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM Feedback WHERE feedback_id = ?")
        .bind(feedback_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Feedback on a book, newest first
pub async fn list_feedback_by_book<'e, E>(executor: E, isbn: i64) -> Result<Vec<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let feedback = sqlx::query_as::<_, Feedback>(
        "SELECT * FROM Feedback WHERE book_isbn = ? ORDER BY timestamp DESC, feedback_id DESC",
    )
    .bind(isbn)
    .fetch_all(executor)
    .await?;

    Ok(feedback)
}

/// Feedback written by a user, newest first (includes feedback on deleted books)
pub async fn list_feedback_by_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<Feedback>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let feedback = sqlx::query_as::<_, Feedback>(
        "SELECT * FROM Feedback WHERE user_id = ? ORDER BY timestamp DESC, feedback_id DESC",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(feedback)
}

/// Number of feedback rows and the sum of their rates for a book
pub async fn feedback_rate_totals<'e, E>(executor: E, isbn: i64) -> Result<(i64, i64)>
where
    E: Executor<'e, Database = Sqlite>,
{
    let totals: (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(rate), 0) FROM Feedback WHERE book_isbn = ?",
    )
    .bind(isbn)
    .fetch_one(executor)
    .await?;

    Ok(totals)
}
