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


//! Rating aggregation
//!
//! A book's rating is the mean of its feedback rates; an author's rating is
//! the mean of their books' ratings. Both are recomputed whenever they are
//! read and written back to the row, so the stored column is only a cache
//! of the last computation. Nothing is maintained incrementally.
//!
//! Values are stored at full precision; [`format_rating`] renders them for
//! display.

use super::Catalog;
use crate::error::{CatalogError, Result};
use crate::storage::associations::{self, Association};
use crate::storage::queries;
use sqlx::SqliteConnection;

/// Mean of `count` values summing to `sum`, or 0.0 when there are none
pub fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Render a rating with one decimal place
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// Recompute and persist a book's rating from its feedback
pub async fn compute_book_rating(conn: &mut SqliteConnection, isbn: i64) -> Result<f64> {
    if queries::find_book_by_isbn(&mut *conn, isbn).await?.is_none() {
        return Err(CatalogError::not_found("book", isbn));
    }

    let (count, sum) = queries::feedback_rate_totals(&mut *conn, isbn).await?;
    let rating = average(sum as f64, count as usize);
    queries::set_book_rating(&mut *conn, isbn, rating).await?;

    tracing::debug!(isbn, count, rating, "recomputed book rating");
    Ok(rating)
}

/// Recompute and persist an author's rating
///
/// The ratings of the author's books are recomputed first, so the result
/// never averages stale book values.
pub async fn compute_author_rating(conn: &mut SqliteConnection, author_id: i64) -> Result<f64> {
    if queries::find_author_by_id(&mut *conn, author_id).await?.is_none() {
        return Err(CatalogError::not_found("author", author_id));
    }

    let isbns = associations::isbns_of(&mut *conn, Association::BookAuthors, author_id).await?;
    let mut sum = 0.0;
    for isbn in &isbns {
        sum += compute_book_rating(&mut *conn, *isbn).await?;
    }

    let rating = average(sum, isbns.len());
    queries::set_author_rating(&mut *conn, author_id, rating).await?;

    tracing::debug!(author_id, books = isbns.len(), rating, "recomputed author rating");
    Ok(rating)
}

/// Author rating from the book ratings currently stored
async fn aggregate_stored_author_rating(conn: &mut SqliteConnection, author_id: i64) -> Result<f64> {
    let books = queries::list_books_by_author(&mut *conn, author_id).await?;
    let sum: f64 = books.iter().map(|book| book.rating).sum();
    let rating = average(sum, books.len());
    queries::set_author_rating(&mut *conn, author_id, rating).await?;
    Ok(rating)
}

/// Recompute every book rating, then every author rating
pub async fn refresh_all_ratings(conn: &mut SqliteConnection) -> Result<()> {
    let isbns = queries::list_book_isbns(&mut *conn).await?;
    for isbn in &isbns {
        compute_book_rating(&mut *conn, *isbn).await?;
    }

    let author_ids = queries::list_author_ids(&mut *conn).await?;
    for author_id in &author_ids {
        aggregate_stored_author_rating(&mut *conn, *author_id).await?;
    }

    tracing::debug!(books = isbns.len(), authors = author_ids.len(), "refreshed all ratings");
    Ok(())
}

impl Catalog {
    /// Current rating of a book, persisted before returning
    pub async fn book_rating(&self, isbn: i64) -> Result<f64> {
        let mut tx = self.db.pool().begin().await?;
        let rating = compute_book_rating(&mut tx, isbn).await?;
        tx.commit().await?;
        Ok(rating)
    }

    /// Current rating of an author, persisted before returning
    pub async fn author_rating(&self, author_id: i64) -> Result<f64> {
        let mut tx = self.db.pool().begin().await?;
        let rating = compute_author_rating(&mut tx, author_id).await?;
        tx.commit().await?;
        Ok(rating)
    }

    pub async fn refresh_all_ratings(&self) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
