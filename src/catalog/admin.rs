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


//! Catalog administration
//!
//! Create, edit and delete for every catalog entity. All operations here
//! require an admin [`Actor`] and run as a single transaction, so a failed
//! lookup or a key collision leaves the store untouched.
//!
//! Association edits take the complete new set and apply only the
//! difference against what is stored.

use super::ratings::{compute_author_rating, compute_book_rating};
use super::validation;
use super::{require_author_named, require_book, require_genre_named, require_publisher_named};
use super::{Actor, Catalog};
use crate::error::{CatalogError, Result};
use crate::storage::associations::{self, Association};
use crate::storage::models::{NewAuthor, NewBook, NewEdition, NewPublisher, UserRole};
use crate::storage::queries;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use std::collections::BTreeSet;

/// Complete association sets for a book, by natural key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLinks {
    /// Author names
    pub authors: Vec<String>,
    /// Genre names
    pub genres: Vec<String>,
    /// Edition ids
    pub editions: Vec<i64>,
}

impl BookLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authors<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.authors = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.genres = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_editions(mut self, edition_ids: impl IntoIterator<Item = i64>) -> Self {
        self.editions = edition_ids.into_iter().collect();
        self
    }
}

// ============================================================================
// KEY RESOLUTION
// ============================================================================

async fn resolve_author_ids(conn: &mut SqliteConnection, names: &[String]) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    for name in names {
        ids.insert(require_author_named(&mut *conn, name).await?.author_id);
    }
    Ok(ids)
}

async fn resolve_genre_ids(conn: &mut SqliteConnection, names: &[String]) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    for name in names {
        ids.insert(require_genre_named(&mut *conn, name).await?.genre_id);
    }
    Ok(ids)
}

async fn check_editions_exist(conn: &mut SqliteConnection, edition_ids: &[i64]) -> Result<BTreeSet<i64>> {
    let mut ids = BTreeSet::new();
    for edition_id in edition_ids {
        if queries::find_edition_by_id(&mut *conn, *edition_id).await?.is_none() {
            return Err(CatalogError::not_found("edition", edition_id));
        }
        ids.insert(*edition_id);
    }
    Ok(ids)
}

async fn check_books_exist(conn: &mut SqliteConnection, isbns: &BTreeSet<i64>) -> Result<()> {
    for isbn in isbns {
        require_book(&mut *conn, *isbn).await?;
    }
    Ok(())
}

/// Apply a book's association sets and return the authors whose book list changed
async fn apply_book_links(conn: &mut SqliteConnection, isbn: i64, links: &BookLinks) -> Result<BTreeSet<i64>> {
    let author_ids = resolve_author_ids(&mut *conn, &links.authors).await?;
    let genre_ids = resolve_genre_ids(&mut *conn, &links.genres).await?;
    let edition_ids = check_editions_exist(&mut *conn, &links.editions).await?;

    let authors = associations::replace_owners(&mut *conn, Association::BookAuthors, isbn, &author_ids).await?;
    associations::replace_owners(&mut *conn, Association::BookGenres, isbn, &genre_ids).await?;
    associations::replace_book_editions(&mut *conn, isbn, &edition_ids).await?;

    Ok(authors.added.iter().chain(&authors.removed).copied().collect())
}

async fn recompute_authors(conn: &mut SqliteConnection, author_ids: impl IntoIterator<Item = i64>) -> Result<()> {
    for author_id in author_ids {
        compute_author_rating(&mut *conn, author_id).await?;
    }
    Ok(())
}

impl Catalog {
    // ========================================================================
    // AUTHORS
    // ========================================================================

    /// Create an author linked to exactly `isbns`; returns the new id
    pub async fn create_author(&self, actor: &Actor, author: &NewAuthor, isbns: &BTreeSet<i64>) -> Result<i64> {
        actor.require_admin("create author")?;
        validation::validate_new_author(author)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_author_by_name(&mut *tx, &author.name).await?.is_some() {
            return Err(CatalogError::duplicate("author", &author.name));
        }
        check_books_exist(&mut tx, isbns).await?;

        let author_id = queries::insert_author(&mut *tx, author).await?;
        associations::replace_isbns(&mut tx, Association::BookAuthors, author_id, isbns).await?;
        compute_author_rating(&mut tx, author_id).await?;
        tx.commit().await?;

        tracing::info!(author_id, name = %author.name, books = isbns.len(), "created author");
        Ok(author_id)
    }

    /// Replace an author's fields and book set
    pub async fn edit_author(
        &self,
        actor: &Actor,
        name: &str,
        author: &NewAuthor,
        isbns: &BTreeSet<i64>,
    ) -> Result<()> {
        actor.require_admin("edit author")?;
        validation::validate_new_author(author)?;

        let mut tx = self.db.pool().begin().await?;
        let existing = require_author_named(&mut *tx, name).await?;
        if author.name != existing.name {
            if let Some(other) = queries::find_author_by_name(&mut *tx, &author.name).await? {
                if other.author_id != existing.author_id {
                    return Err(CatalogError::duplicate("author", &author.name));
                }
            }
        }
        check_books_exist(&mut tx, isbns).await?;

        queries::update_author(&mut *tx, existing.author_id, author).await?;
        let diff = associations::replace_isbns(&mut tx, Association::BookAuthors, existing.author_id, isbns).await?;
        compute_author_rating(&mut tx, existing.author_id).await?;
        tx.commit().await?;

        tracing::info!(
            author_id = existing.author_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "edited author"
        );
        Ok(())
    }

    pub async fn delete_author(&self, actor: &Actor, name: &str) -> Result<()> {
        actor.require_admin("delete author")?;

        let mut tx = self.db.pool().begin().await?;
        let author = require_author_named(&mut *tx, name).await?;
        queries::delete_author(&mut *tx, author.author_id).await?;
        tx.commit().await?;

        tracing::info!(author_id = author.author_id, name, "deleted author");
        Ok(())
    }

    // ========================================================================
    // BOOKS
    // ========================================================================

    /// Create a book with its authors, genres and editions; returns its ISBN
    pub async fn create_book(&self, actor: &Actor, book: &NewBook, links: &BookLinks) -> Result<i64> {
        actor.require_admin("create book")?;
        validation::validate_new_book(book)?;

        let mut tx = self.db.pool().begin().await?;
        if let Some(isbn) = book.isbn {
            if queries::find_book_by_isbn(&mut *tx, isbn).await?.is_some() {
                return Err(CatalogError::duplicate("book", isbn));
            }
        }

        let isbn = queries::insert_book(&mut *tx, book).await?;
        let touched = apply_book_links(&mut tx, isbn, links).await?;
        recompute_authors(&mut tx, touched).await?;
        tx.commit().await?;

        tracing::info!(isbn, title = %book.title, "created book");
        Ok(isbn)
    }

    /// Replace a book's fields and association sets
    ///
    /// The ISBN itself cannot change; a payload carrying a different one is
    /// rejected.
    pub async fn edit_book(&self, actor: &Actor, isbn: i64, book: &NewBook, links: &BookLinks) -> Result<()> {
        actor.require_admin("edit book")?;
        validation::validate_new_book(book)?;
        if book.isbn.is_some_and(|new_isbn| new_isbn != isbn) {
            return Err(CatalogError::validation("isbn", "cannot be changed"));
        }

        let mut tx = self.db.pool().begin().await?;
        require_book(&mut *tx, isbn).await?;

        queries::update_book(&mut *tx, isbn, book).await?;
        let touched = apply_book_links(&mut tx, isbn, links).await?;
        compute_book_rating(&mut tx, isbn).await?;
        recompute_authors(&mut tx, touched).await?;
        tx.commit().await?;

        tracing::info!(isbn, "edited book");
        Ok(())
    }

    /// Set a book's authors to exactly `names`
    pub async fn replace_book_authors(&self, actor: &Actor, isbn: i64, names: &[String]) -> Result<()> {
        actor.require_admin("edit book authors")?;

        let mut tx = self.db.pool().begin().await?;
        require_book(&mut *tx, isbn).await?;
        let author_ids = resolve_author_ids(&mut tx, names).await?;
        let diff = associations::replace_owners(&mut tx, Association::BookAuthors, isbn, &author_ids).await?;
        recompute_authors(&mut tx, diff.added.iter().chain(&diff.removed).copied()).await?;
        tx.commit().await?;

        tracing::info!(isbn, added = diff.added.len(), removed = diff.removed.len(), "replaced book authors");
        Ok(())
    }

    /// Delete a book; its feedback and editions survive unlinked
    pub async fn delete_book(&self, actor: &Actor, isbn: i64) -> Result<()> {
        actor.require_admin("delete book")?;

        let mut tx = self.db.pool().begin().await?;
        require_book(&mut *tx, isbn).await?;
        let author_ids = associations::owners_of(&mut *tx, Association::BookAuthors, isbn).await?;
        queries::delete_book(&mut *tx, isbn).await?;
        recompute_authors(&mut tx, author_ids).await?;
        tx.commit().await?;

        tracing::info!(isbn, "deleted book");
        Ok(())
    }

    // ========================================================================
    // GENRES
    // ========================================================================

    pub async fn create_genre(&self, actor: &Actor, name: &str) -> Result<i64> {
        actor.require_admin("create genre")?;
        validation::validate_genre_name(name)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_genre_by_name(&mut *tx, name).await?.is_some() {
            return Err(CatalogError::duplicate("genre", name));
        }
        let genre_id = queries::insert_genre(&mut *tx, name).await?;
        tx.commit().await?;

        tracing::info!(genre_id, name, "created genre");
        Ok(genre_id)
    }

    pub async fn rename_genre(&self, actor: &Actor, name: &str, new_name: &str) -> Result<()> {
        actor.require_admin("rename genre")?;
        validation::validate_genre_name(new_name)?;

        let mut tx = self.db.pool().begin().await?;
        let genre = require_genre_named(&mut *tx, name).await?;
        if let Some(other) = queries::find_genre_by_name(&mut *tx, new_name).await? {
            if other.genre_id != genre.genre_id {
                return Err(CatalogError::duplicate("genre", new_name));
            }
        }
        queries::rename_genre(&mut *tx, genre.genre_id, new_name).await?;
        tx.commit().await?;

        tracing::info!(genre_id = genre.genre_id, from = name, to = new_name, "renamed genre");
        Ok(())
    }

    pub async fn delete_genre(&self, actor: &Actor, name: &str) -> Result<()> {
        actor.require_admin("delete genre")?;

        let mut tx = self.db.pool().begin().await?;
        let genre = require_genre_named(&mut *tx, name).await?;
        queries::delete_genre(&mut *tx, genre.genre_id).await?;
        tx.commit().await?;

        tracing::info!(genre_id = genre.genre_id, name, "deleted genre");
        Ok(())
    }

    // ========================================================================
    // PUBLISHERS
    // ========================================================================

    pub async fn create_publisher(&self, actor: &Actor, publisher: &NewPublisher) -> Result<i64> {
        actor.require_admin("create publisher")?;
        validation::validate_new_publisher(publisher)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_publisher_by_name(&mut *tx, &publisher.name).await?.is_some() {
            return Err(CatalogError::duplicate("publisher", &publisher.name));
        }
        let publisher_id = queries::insert_publisher(&mut *tx, publisher).await?;
        tx.commit().await?;

        tracing::info!(publisher_id, name = %publisher.name, "created publisher");
        Ok(publisher_id)
    }

    pub async fn edit_publisher(&self, actor: &Actor, name: &str, publisher: &NewPublisher) -> Result<()> {
        actor.require_admin("edit publisher")?;
        validation::validate_new_publisher(publisher)?;

        let mut tx = self.db.pool().begin().await?;
        let existing = require_publisher_named(&mut *tx, name).await?;
        if let Some(other) = queries::find_publisher_by_name(&mut *tx, &publisher.name).await? {
            if other.publisher_id != existing.publisher_id {
                return Err(CatalogError::duplicate("publisher", &publisher.name));
            }
        }
        queries::update_publisher(&mut *tx, existing.publisher_id, publisher).await?;
        tx.commit().await?;

        tracing::info!(publisher_id = existing.publisher_id, "edited publisher");
        Ok(())
    }

    /// Delete a publisher and all of its editions
    pub async fn delete_publisher(&self, actor: &Actor, name: &str) -> Result<()> {
        actor.require_admin("delete publisher")?;

        let mut tx = self.db.pool().begin().await?;
        let publisher = require_publisher_named(&mut *tx, name).await?;
        queries::delete_publisher(&mut *tx, publisher.publisher_id).await?;
        tx.commit().await?;

        tracing::info!(publisher_id = publisher.publisher_id, name, "deleted publisher");
        Ok(())
    }

    // ========================================================================
    // EDITIONS
    // ========================================================================

    /// Create an edition under an existing publisher; attach it to a book
    /// through [`BookLinks::editions`]
    pub async fn create_edition(&self, actor: &Actor, edition: &NewEdition) -> Result<i64> {
        actor.require_admin("create edition")?;
        validation::validate_new_edition(edition)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_publisher_by_id(&mut *tx, edition.publisher_id).await?.is_none() {
            return Err(CatalogError::not_found("publisher", edition.publisher_id));
        }
        let edition_id = queries::insert_edition(&mut *tx, edition).await?;
        tx.commit().await?;

        tracing::info!(edition_id, publisher_id = edition.publisher_id, "created edition");
        Ok(edition_id)
    }

    pub async fn edit_edition(&self, actor: &Actor, edition_id: i64, edition: &NewEdition) -> Result<()> {
        actor.require_admin("edit edition")?;
        validation::validate_new_edition(edition)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_edition_by_id(&mut *tx, edition_id).await?.is_none() {
            return Err(CatalogError::not_found("edition", edition_id));
        }
        if queries::find_publisher_by_id(&mut *tx, edition.publisher_id).await?.is_none() {
            return Err(CatalogError::not_found("publisher", edition.publisher_id));
        }
        queries::update_edition(&mut *tx, edition_id, edition).await?;
        tx.commit().await?;

        tracing::info!(edition_id, "edited edition");
        Ok(())
    }

    pub async fn delete_edition(&self, actor: &Actor, edition_id: i64) -> Result<()> {
        actor.require_admin("delete edition")?;

        if !queries::delete_edition(self.db.pool(), edition_id).await? {
            return Err(CatalogError::not_found("edition", edition_id));
        }

        tracing::info!(edition_id, "deleted edition");
        Ok(())
    }

    // ========================================================================
    // USERS
    // ========================================================================

    /// Grant or revoke the admin role
    pub async fn set_admin(&self, actor: &Actor, username: &str, admin: bool) -> Result<()> {
        actor.require_admin("change user role")?;

        let mut tx = self.db.pool().begin().await?;
        let user = queries::find_user_by_username(&mut *tx, username)
            .await?
            .ok_or_else(|| CatalogError::not_found("user", username))?;
        let role = if admin { UserRole::Admin } else { UserRole::Regular };
        queries::set_user_role(&mut *tx, user.user_id, role).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.user_id, ?role, "changed user role");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{NewFeedback, NewUser};
    use crate::storage::Database;
    use chrono::NaiveDate;

    const ADMIN: Actor = Actor {
        user_id: 1,
        role: UserRole::Admin,
    };

    async fn catalog() -> Catalog {
        Catalog::new(Database::new_in_memory().await.unwrap())
    }

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    fn author(name: &str) -> NewAuthor {
        NewAuthor {
            date_birth: NaiveDate::from_ymd_opt(1809, 4, 1),
            country: Some("Russia".to_string()),
            ..NewAuthor::new(name.to_string())
        }
    }

    fn publisher(name: &str) -> NewPublisher {
        NewPublisher::new(name.to_string(), "Moscow".to_string(), "8 800 555 35 35".to_string())
    }

    async fn author_names(catalog: &Catalog, isbn: i64) -> Vec<String> {
        queries::list_authors_by_book(catalog.database().pool(), isbn)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect()
    }

    #[tokio::test]
    async fn test_create_author_with_books() {
        let catalog = catalog().await;
        let a = catalog.create_book(&ADMIN, &NewBook::new("A".to_string()), &BookLinks::new()).await.unwrap();
        let b = catalog.create_book(&ADMIN, &NewBook::new("B".to_string()), &BookLinks::new()).await.unwrap();

        let author_id = catalog
            .create_author(&ADMIN, &author("Gogol"), &set(&[a, b]))
            .await
            .unwrap();

        let books = queries::list_books_by_author(catalog.database().pool(), author_id).await.unwrap();
        assert_eq!(books.len(), 2);
    }

    #[tokio::test]
    async fn test_author_needs_birth_date_and_country() {
        let catalog = catalog().await;

        let undated = NewAuthor {
            date_birth: None,
            ..author("Gogol")
        };
        let err = catalog.create_author(&ADMIN, &undated, &BTreeSet::new()).await.unwrap_err();
        assert!(err.is_validation());

        let stateless = NewAuthor {
            country: None,
            ..author("Gogol")
        };
        let err = catalog.create_author(&ADMIN, &stateless, &BTreeSet::new()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(catalog.find_author("Gogol").await.unwrap_err().is_not_found());

        catalog.create_author(&ADMIN, &author("Gogol"), &BTreeSet::new()).await.unwrap();
        let err = catalog
            .edit_author(&ADMIN, "Gogol", &stateless, &BTreeSet::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_create_with_existing_name_is_duplicate() {
        let catalog = catalog().await;

        catalog
            .create_author(&ADMIN, &author("Gogol"), &BTreeSet::new())
            .await
            .unwrap();
        let err = catalog
            .create_author(&ADMIN, &author("Gogol"), &BTreeSet::new())
            .await
            .unwrap_err();
        assert!(err.is_duplicate_key());

        catalog.create_genre(&ADMIN, "Drama").await.unwrap();
        assert!(catalog.create_genre(&ADMIN, "Drama").await.unwrap_err().is_duplicate_key());

        catalog.create_publisher(&ADMIN, &publisher("AST")).await.unwrap();
        assert!(catalog
            .create_publisher(&ADMIN, &publisher("AST"))
            .await
            .unwrap_err()
            .is_duplicate_key());

        let isbn = catalog
            .create_book(&ADMIN, &NewBook::new("Nose".to_string()).with_isbn(42), &BookLinks::new())
            .await
            .unwrap();
        assert_eq!(isbn, 42);
        assert!(catalog
            .create_book(&ADMIN, &NewBook::new("Overcoat".to_string()).with_isbn(42), &BookLinks::new())
            .await
            .unwrap_err()
            .is_duplicate_key());
    }

    #[tokio::test]
    async fn test_rename_collisions() {
        let catalog = catalog().await;
        catalog.create_genre(&ADMIN, "Drama").await.unwrap();
        catalog.create_genre(&ADMIN, "Poetry").await.unwrap();

        assert!(catalog
            .rename_genre(&ADMIN, "Drama", "Poetry")
            .await
            .unwrap_err()
            .is_duplicate_key());
        catalog.rename_genre(&ADMIN, "Drama", "Drama").await.unwrap();
        catalog.rename_genre(&ADMIN, "Drama", "Tragedy").await.unwrap();
        assert!(catalog.find_genre("Tragedy").await.is_ok());

        catalog.create_publisher(&ADMIN, &publisher("AST")).await.unwrap();
        catalog.create_publisher(&ADMIN, &publisher("Eksmo")).await.unwrap();
        assert!(catalog
            .edit_publisher(&ADMIN, "AST", &publisher("Eksmo"))
            .await
            .unwrap_err()
            .is_duplicate_key());
        catalog.edit_publisher(&ADMIN, "AST", &publisher("AST")).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_book_authors_applies_difference() {
        let catalog = catalog().await;
        for name in ["X", "Y", "Z"] {
            catalog
                .create_author(&ADMIN, &author(name), &BTreeSet::new())
                .await
                .unwrap();
        }
        let links = BookLinks::new().with_authors(["X", "Y"]);
        let isbn = catalog.create_book(&ADMIN, &NewBook::new("Shared".to_string()), &links).await.unwrap();
        assert_eq!(author_names(&catalog, isbn).await, vec!["X", "Y"]);

        catalog
            .replace_book_authors(&ADMIN, isbn, &["Y".to_string(), "Z".to_string()])
            .await
            .unwrap();
        assert_eq!(author_names(&catalog, isbn).await, vec!["Y", "Z"]);
    }

    #[tokio::test]
    async fn test_edit_book_with_missing_author_rolls_back() {
        let catalog = catalog().await;
        catalog.create_genre(&ADMIN, "Drama").await.unwrap();
        let isbn = catalog
            .create_book(
                &ADMIN,
                &NewBook::new("Inspector".to_string()),
                &BookLinks::new().with_genres(["Drama"]),
            )
            .await
            .unwrap();

        let err = catalog
            .edit_book(
                &ADMIN,
                isbn,
                &NewBook::new("Renamed".to_string()),
                &BookLinks::new().with_authors(["Ghost"]),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let book = catalog.find_book(isbn).await.unwrap();
        assert_eq!(book.title, "Inspector");
        let genres = queries::list_genres_by_book(catalog.database().pool(), isbn).await.unwrap();
        assert_eq!(genres.len(), 1);
    }

    #[tokio::test]
    async fn test_editions_move_between_books() {
        let catalog = catalog().await;
        let publisher_id = catalog.create_publisher(&ADMIN, &publisher("AST")).await.unwrap();
        let edition_id = catalog
            .create_edition(&ADMIN, &NewEdition::new("Russian".to_string(), "1836".to_string(), publisher_id))
            .await
            .unwrap();

        let first = catalog
            .create_book(&ADMIN, &NewBook::new("First".to_string()), &BookLinks::new().with_editions([edition_id]))
            .await
            .unwrap();
        let second = catalog
            .create_book(&ADMIN, &NewBook::new("Second".to_string()), &BookLinks::new().with_editions([edition_id]))
            .await
            .unwrap();

        assert!(queries::list_editions_by_book(catalog.database().pool(), first).await.unwrap().is_empty());
        assert_eq!(catalog.find_edition(edition_id).await.unwrap().book_isbn, Some(second));

        let err = catalog
            .create_edition(&ADMIN, &NewEdition::new("Russian".to_string(), "99".to_string(), publisher_id))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(catalog
            .create_edition(&ADMIN, &NewEdition::new("Russian".to_string(), "1999".to_string(), 404))
            .await
            .unwrap_err()
            .is_not_found());

        catalog.delete_publisher(&ADMIN, "AST").await.unwrap();
        assert!(catalog.find_edition(edition_id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_book_keeps_feedback() {
        let catalog = catalog().await;
        let pool = catalog.database().pool().clone();
        let user_id = queries::insert_user(&pool, &NewUser::new("ann".to_string(), "ann@example.com".to_string()))
            .await
            .unwrap();
        let isbn = catalog
            .create_book(&ADMIN, &NewBook::new("Doomed".to_string()), &BookLinks::new())
            .await
            .unwrap();
        let book = queries::find_book_by_isbn(&pool, isbn).await.unwrap().unwrap();
        let feedback_id = queries::insert_feedback(&pool, user_id, &book, &NewFeedback::new("Sad".to_string(), 2))
            .await
            .unwrap();
        associations::add_pair(&pool, Association::Favourites, user_id, isbn).await.unwrap();

        catalog.delete_book(&ADMIN, isbn).await.unwrap();

        let feedback = queries::find_feedback_by_id(&pool, feedback_id).await.unwrap().unwrap();
        assert_eq!(feedback.book_isbn, None);
        assert_eq!(feedback.book_title_reserved, "Doomed");
        assert!(queries::list_favourite_books(&pool, user_id).await.unwrap().is_empty());
        assert!(catalog.delete_book(&ADMIN, isbn).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_non_admin_is_unauthorized() {
        let catalog = catalog().await;
        let regular = Actor::regular(2);

        let err = catalog
            .create_author(&regular, &author("Chekhov"), &BTreeSet::new())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert!(catalog.find_author("Chekhov").await.unwrap_err().is_not_found());

        catalog.create_genre(&ADMIN, "Drama").await.unwrap();
        assert!(catalog.delete_genre(&regular, "Drama").await.unwrap_err().is_unauthorized());
        assert!(catalog.find_genre("Drama").await.is_ok());
    }

    #[tokio::test]
    async fn test_set_admin() {
        let catalog = catalog().await;
        queries::insert_user(
            catalog.database().pool(),
            &NewUser::new("boris".to_string(), "boris@example.com".to_string()),
        )
        .await
        .unwrap();

        catalog.set_admin(&ADMIN, "boris", true).await.unwrap();
        assert!(catalog.find_user("boris").await.unwrap().is_admin());
        catalog.set_admin(&ADMIN, "boris", false).await.unwrap();
        assert!(!catalog.find_user("boris").await.unwrap().is_admin());

        assert!(catalog.set_admin(&ADMIN, "ghost", true).await.unwrap_err().is_not_found());
    }
}
