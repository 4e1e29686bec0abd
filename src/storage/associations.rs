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


//! Join-table operations
//!
//! Every many-to-many relation is a set of `(owner, isbn)` pairs in its own
//! junction table. The owner side is the author, genre or user; the other
//! side is always a book.
//!
//! Replacing a set never removes-then-readds. The old set is read, the
//! difference against the new set is computed, and only the delta is
//! written. Callers run this inside a transaction so the whole replacement
//! commits or rolls back as one batch.

use crate::error::Result;
use serde::Serialize;
use sqlx::{Executor, Sqlite, SqliteConnection};
use std::collections::BTreeSet;

/// Junction tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    /// Author <-> Book
    BookAuthors,
    /// Genre <-> Book
    BookGenres,
    /// User <-> Book favourites
    Favourites,
}

/// Statements for one junction table
struct PairSql {
    insert: &'static str,
    delete: &'static str,
    contains: &'static str,
    isbns: &'static str,
    owners: &'static str,
}

macro_rules! pair_sql {
    ($table:literal, $owner:literal) => {
        PairSql {
            insert: concat!("INSERT OR IGNORE INTO ", $table, " (", $owner, ", isbn) VALUES (?, ?)"),
            delete: concat!("DELETE FROM ", $table, " WHERE ", $owner, " = ? AND isbn = ?"),
            contains: concat!("SELECT COUNT(*) FROM ", $table, " WHERE ", $owner, " = ? AND isbn = ?"),
            isbns: concat!("SELECT isbn FROM ", $table, " WHERE ", $owner, " = ?"),
            owners: concat!("SELECT ", $owner, " FROM ", $table, " WHERE isbn = ?"),
        }
    };
}

const BOOK_AUTHORS: PairSql = pair_sql!("BookAuthors", "author_id");
const BOOK_GENRES: PairSql = pair_sql!("BookGenres", "genre_id");
const FAVOURITES: PairSql = pair_sql!("Favourites", "user_id");

impl Association {
    fn sql(&self) -> &'static PairSql {
        match self {
            Association::BookAuthors => &BOOK_AUTHORS,
            Association::BookGenres => &BOOK_GENRES,
            Association::Favourites => &FAVOURITES,
        }
    }
}

/// Result of diffing an old member set against a new one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetDiff {
    /// In the new set but not the old one
    pub added: Vec<i64>,
    /// In the old set but not the new one
    pub removed: Vec<i64>,
}

impl SetDiff {
    pub fn compute(old: &BTreeSet<i64>, new: &BTreeSet<i64>) -> Self {
        Self {
            added: new.difference(old).copied().collect(),
            removed: old.difference(new).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Add a pair; returns false if it was already present
pub async fn add_pair<'e, E>(executor: E, assoc: Association, owner_id: i64, isbn: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(assoc.sql().insert)
        .bind(owner_id)
        .bind(isbn)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a pair; returns false if it was not present
pub async fn remove_pair<'e, E>(executor: E, assoc: Association, owner_id: i64, isbn: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(assoc.sql().delete)
        .bind(owner_id)
        .bind(isbn)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn contains_pair<'e, E>(executor: E, assoc: Association, owner_id: i64, isbn: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(assoc.sql().contains)
        .bind(owner_id)
        .bind(isbn)
        .fetch_one(executor)
        .await?;

    Ok(count > 0)
}

/// ISBNs linked to an owner
pub async fn isbns_of<'e, E>(executor: E, assoc: Association, owner_id: i64) -> Result<BTreeSet<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let isbns: Vec<i64> = sqlx::query_scalar(assoc.sql().isbns)
        .bind(owner_id)
        .fetch_all(executor)
        .await?;

    Ok(isbns.into_iter().collect())
}

/// Owners linked to a book
pub async fn owners_of<'e, E>(executor: E, assoc: Association, isbn: i64) -> Result<BTreeSet<i64>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let owners: Vec<i64> = sqlx::query_scalar(assoc.sql().owners)
        .bind(isbn)
        .fetch_all(executor)
        .await?;

    Ok(owners.into_iter().collect())
}

/// Set the books linked to `owner_id` to exactly `isbns`
pub async fn replace_isbns(
    conn: &mut SqliteConnection,
    assoc: Association,
    owner_id: i64,
    isbns: &BTreeSet<i64>,
) -> Result<SetDiff> {
    let old = isbns_of(&mut *conn, assoc, owner_id).await?;
    let diff = SetDiff::compute(&old, isbns);

    for isbn in &diff.removed {
        remove_pair(&mut *conn, assoc, owner_id, *isbn).await?;
    }
    for isbn in &diff.added {
        add_pair(&mut *conn, assoc, owner_id, *isbn).await?;
    }

    Ok(diff)
}

/// Set the owners linked to `isbn` to exactly `owners`
pub async fn replace_owners(
    conn: &mut SqliteConnection,
    assoc: Association,
    isbn: i64,
    owners: &BTreeSet<i64>,
) -> Result<SetDiff> {
    let old = owners_of(&mut *conn, assoc, isbn).await?;
    let diff = SetDiff::compute(&old, owners);

    for owner_id in &diff.removed {
        remove_pair(&mut *conn, assoc, *owner_id, isbn).await?;
    }
    for owner_id in &diff.added {
        add_pair(&mut *conn, assoc, *owner_id, isbn).await?;
    }

    Ok(diff)
}

/// Set the editions attached to a book to exactly `edition_ids`
///
/// An edition belongs to at most one book, so attaching an edition that is
/// currently on another book moves it.
pub async fn replace_book_editions(
    conn: &mut SqliteConnection,
    isbn: i64,
    edition_ids: &BTreeSet<i64>,
) -> Result<SetDiff> {
    let old: Vec<i64> = sqlx::query_scalar("SELECT edition_id FROM Editions WHERE book_isbn = ?")
        .bind(isbn)
        .fetch_all(&mut *conn)
        .await?;
    let old: BTreeSet<i64> = old.into_iter().collect();
    let diff = SetDiff::compute(&old, edition_ids);

    for edition_id in &diff.removed {
        sqlx::query("UPDATE Editions SET book_isbn = NULL WHERE edition_id = ? AND book_isbn = ?")
            .bind(*edition_id)
            .bind(isbn)
            .execute(&mut *conn)
            .await?;
    }
    for edition_id in &diff.added {
        sqlx::query("UPDATE Editions SET book_isbn = ? WHERE edition_id = ?")
            .bind(isbn)
            .bind(*edition_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::Database;
    use crate::storage::models::{NewAuthor, NewBook, NewEdition, NewPublisher};
    use crate::storage::queries;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_set_diff() {
        let diff = SetDiff::compute(&set(&[1, 2]), &set(&[2, 3]));
        assert_eq!(diff.added, vec![3]);
        assert_eq!(diff.removed, vec![1]);

        assert!(SetDiff::compute(&set(&[4, 5]), &set(&[5, 4])).is_empty());
    }

    #[tokio::test]
    async fn test_add_remove_pair_idempotent() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let author_id = queries::insert_author(db.pool(), &NewAuthor::new("Le Guin".to_string()))
            .await
            .unwrap();
        let isbn = queries::insert_book(db.pool(), &NewBook::new("Earthsea".to_string()))
            .await
            .unwrap();

        assert!(add_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());
        assert!(!add_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());
        assert!(contains_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());

        assert!(remove_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());
        assert!(!remove_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());
        assert!(!contains_pair(db.pool(), Association::BookAuthors, author_id, isbn).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_owners_in_transaction() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let isbn = queries::insert_book(db.pool(), &NewBook::new("Good Omens".to_string()))
            .await
            .unwrap();
        let mut ids = Vec::new();
        for name in ["X", "Y", "Z"] {
            ids.push(
                queries::insert_author(db.pool(), &NewAuthor::new(name.to_string()))
                    .await
                    .unwrap(),
            );
        }
        let (x, y, z) = (ids[0], ids[1], ids[2]);

        let mut tx = db.pool().begin().await.unwrap();
        replace_owners(&mut tx, Association::BookAuthors, isbn, &set(&[x, y]))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let diff = replace_owners(&mut tx, Association::BookAuthors, isbn, &set(&[y, z]))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(diff.added, vec![z]);
        assert_eq!(diff.removed, vec![x]);
        assert_eq!(
            owners_of(db.pool(), Association::BookAuthors, isbn).await.unwrap(),
            set(&[y, z])
        );
    }

    #[tokio::test]
    async fn test_replace_book_editions_moves_edition() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let publisher_id = queries::insert_publisher(
            db.pool(),
            &NewPublisher::new("Ace".to_string(), "New York".to_string(), "1234567".to_string()),
        )
        .await
        .unwrap();
        let edition_id = queries::insert_edition(
            db.pool(),
            &NewEdition::new("English".to_string(), "1965".to_string(), publisher_id),
        )
        .await
        .unwrap();
        let first = queries::insert_book(db.pool(), &NewBook::new("First".to_string()))
            .await
            .unwrap();
        let second = queries::insert_book(db.pool(), &NewBook::new("Second".to_string()))
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        replace_book_editions(&mut conn, first, &set(&[edition_id])).await.unwrap();
        replace_book_editions(&mut conn, second, &set(&[edition_id])).await.unwrap();
        drop(conn);

        let edition = queries::find_edition_by_id(db.pool(), edition_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edition.book_isbn, Some(second));
        assert!(queries::list_editions_by_book(db.pool(), first).await.unwrap().is_empty());
    }
}
