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


//! Read-side views: lookups, listings, relation views, landing and search
//!
//! Views that expose a rating recompute it first, inside the same
//! transaction as the read, so callers never see a stale value.

use super::ratings::{compute_author_rating, compute_book_rating, refresh_all_ratings};
use super::{require_author_named, require_book, require_genre_named, require_publisher_named, require_user};
use super::{Actor, Catalog};
use crate::error::{CatalogError, Result};
use crate::storage::associations::{self, Association};
use crate::storage::models::{Author, Book, Edition, Feedback, Genre, Publisher, User};
use crate::storage::queries;
use serde::Serialize;

/// A book with everything linked to it
#[derive(Debug, Clone, Serialize)]
pub struct BookDetails {
    pub book: Book,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub editions: Vec<Edition>,
    pub feedback: Vec<Feedback>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetails {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreDetails {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublisherDetails {
    pub publisher: Publisher,
    pub editions: Vec<Edition>,
}

/// Landing page content
#[derive(Debug, Clone, Serialize)]
pub struct Landing {
    pub top_authors: Vec<Author>,
    pub top_books: Vec<Book>,
    /// Only present for an authenticated actor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favourites: Option<Vec<Book>>,
}

/// Matches per entity kind, each in that kind's listing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub publishers: Vec<Publisher>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
            && self.authors.is_empty()
            && self.genres.is_empty()
            && self.publishers.is_empty()
    }

    pub fn total(&self) -> usize {
        self.books.len() + self.authors.len() + self.genres.len() + self.publishers.len()
    }
}

/// Case-insensitive substring test; `needle` must already be lowercased
fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn check_limit(n: i64) -> Result<()> {
    if n < 1 {
        return Err(CatalogError::validation("n", "must be at least 1"));
    }
    Ok(())
}

impl Catalog {
    // ========================================================================
    // FIND BY KEY
    // ========================================================================

    pub async fn find_book(&self, isbn: i64) -> Result<Book> {
        let mut tx = self.db.pool().begin().await?;
        compute_book_rating(&mut tx, isbn).await?;
        let book = require_book(&mut *tx, isbn).await?;
        tx.commit().await?;
        Ok(book)
    }

    pub async fn find_author(&self, name: &str) -> Result<Author> {
        let mut tx = self.db.pool().begin().await?;
        let author = require_author_named(&mut *tx, name).await?;
        let rating = compute_author_rating(&mut tx, author.author_id).await?;
        tx.commit().await?;
        Ok(Author { rating, ..author })
    }

    pub async fn find_genre(&self, name: &str) -> Result<Genre> {
        require_genre_named(self.db.pool(), name).await
    }

    pub async fn find_publisher(&self, name: &str) -> Result<Publisher> {
        require_publisher_named(self.db.pool(), name).await
    }

    pub async fn find_edition(&self, edition_id: i64) -> Result<Edition> {
        queries::find_edition_by_id(self.db.pool(), edition_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("edition", edition_id))
    }

    pub async fn find_user(&self, username: &str) -> Result<User> {
        queries::find_user_by_username(self.db.pool(), username)
            .await?
            .ok_or_else(|| CatalogError::not_found("user", username))
    }

    // ========================================================================
    // RELATION VIEWS
    // ========================================================================

    pub async fn book_details(&self, isbn: i64) -> Result<BookDetails> {
        let mut tx = self.db.pool().begin().await?;
        compute_book_rating(&mut tx, isbn).await?;

        let book = require_book(&mut *tx, isbn).await?;
        let authors = queries::list_authors_by_book(&mut *tx, isbn).await?;
        let genres = queries::list_genres_by_book(&mut *tx, isbn).await?;
        let editions = queries::list_editions_by_book(&mut *tx, isbn).await?;
        let feedback = queries::list_feedback_by_book(&mut *tx, isbn).await?;
        tx.commit().await?;

        Ok(BookDetails {
            book,
            authors,
            genres,
            editions,
            feedback,
        })
    }

    pub async fn author_details(&self, name: &str) -> Result<AuthorDetails> {
        let mut tx = self.db.pool().begin().await?;
        let author = require_author_named(&mut *tx, name).await?;
        let rating = compute_author_rating(&mut tx, author.author_id).await?;
        let books = queries::list_books_by_author(&mut *tx, author.author_id).await?;
        tx.commit().await?;

        Ok(AuthorDetails {
            author: Author { rating, ..author },
            books,
        })
    }

    pub async fn genre_details(&self, name: &str) -> Result<GenreDetails> {
        let mut tx = self.db.pool().begin().await?;
        let genre = require_genre_named(&mut *tx, name).await?;
        let isbns = associations::isbns_of(&mut *tx, Association::BookGenres, genre.genre_id).await?;
        for isbn in &isbns {
            compute_book_rating(&mut tx, *isbn).await?;
        }
        let books = queries::list_books_by_genre(&mut *tx, genre.genre_id).await?;
        tx.commit().await?;

        Ok(GenreDetails { genre, books })
    }

    pub async fn publisher_details(&self, name: &str) -> Result<PublisherDetails> {
        let publisher = require_publisher_named(self.db.pool(), name).await?;
        let editions = queries::list_editions_by_publisher(self.db.pool(), publisher.publisher_id).await?;
        Ok(PublisherDetails { publisher, editions })
    }

    // ========================================================================
    // LISTINGS
    // ========================================================================

    /// All books by title, ratings refreshed
    pub async fn list_books(&self) -> Result<Vec<Book>> {
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        let books = queries::list_books(&mut *tx).await?;
        tx.commit().await?;
        Ok(books)
    }

    /// All authors by name, ratings refreshed
    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        let authors = queries::list_authors(&mut *tx).await?;
        tx.commit().await?;
        Ok(authors)
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        queries::list_genres(self.db.pool()).await
    }

    pub async fn list_publishers(&self) -> Result<Vec<Publisher>> {
        queries::list_publishers(self.db.pool()).await
    }

    pub async fn list_editions(&self) -> Result<Vec<Edition>> {
        queries::list_editions(self.db.pool()).await
    }

    // ========================================================================
    // RANKINGS
    // ========================================================================

    /// Highest-rated books; ties by title, then ISBN
    pub async fn top_books(&self, n: i64) -> Result<Vec<Book>> {
        check_limit(n)?;
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        let books = queries::top_books(&mut *tx, n).await?;
        tx.commit().await?;
        Ok(books)
    }

    /// Highest-rated authors; ties by name, then id
    pub async fn top_authors(&self, n: i64) -> Result<Vec<Author>> {
        check_limit(n)?;
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        let authors = queries::top_authors(&mut *tx, n).await?;
        tx.commit().await?;
        Ok(authors)
    }

    /// Landing view: top authors and books, plus the actor's favourites
    pub async fn landing(&self, actor: Option<&Actor>) -> Result<Landing> {
        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;

        let top_authors = queries::top_authors(&mut *tx, self.top_n).await?;
        let top_books = queries::top_books(&mut *tx, self.top_n).await?;
        let favourites = match actor {
            Some(actor) => {
                require_user(&mut *tx, actor.user_id).await?;
                Some(queries::list_favourite_books(&mut *tx, actor.user_id).await?)
            }
            None => None,
        };
        tx.commit().await?;

        tracing::debug!(
            top_n = self.top_n,
            authenticated = actor.is_some(),
            "built landing view"
        );
        Ok(Landing {
            top_authors,
            top_books,
            favourites,
        })
    }

    // ========================================================================
    // SEARCH
    // ========================================================================

    /// Case-insensitive substring search across titles and names
    pub async fn search(&self, text: &str) -> Result<SearchResults> {
        if text.trim().is_empty() {
            return Err(CatalogError::validation("text", "search text is required"));
        }
        let needle = text.to_lowercase();

        let mut tx = self.db.pool().begin().await?;
        refresh_all_ratings(&mut tx).await?;
        let books = queries::list_books(&mut *tx).await?;
        let authors = queries::list_authors(&mut *tx).await?;
        let genres = queries::list_genres(&mut *tx).await?;
        let publishers = queries::list_publishers(&mut *tx).await?;
        tx.commit().await?;

        let results = SearchResults {
            books: books.into_iter().filter(|b| matches(&b.title, &needle)).collect(),
            authors: authors.into_iter().filter(|a| matches(&a.name, &needle)).collect(),
            genres: genres.into_iter().filter(|g| matches(&g.name, &needle)).collect(),
            publishers: publishers
                .into_iter()
                .filter(|p| matches(&p.name, &needle))
                .collect(),
        };

        tracing::debug!(query = %needle, hits = results.total(), "search");
        Ok(results)
    }
}
