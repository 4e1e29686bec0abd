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


//! Per-user favourite books
//!
//! Membership is a set: adding twice or removing something absent leaves
//! the Favourites table unchanged.

use super::{require_book, require_user, Actor, Catalog};
use crate::error::Result;
use crate::storage::associations::{self, Association};
use crate::storage::models::{Book, User};
use crate::storage::queries;

impl Catalog {
    /// Mark a book as a favourite of the acting user
    ///
    /// Returns true if the book was not already a favourite.
    pub async fn add_favourite(&self, actor: &Actor, isbn: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        require_user(&mut *tx, actor.user_id).await?;
        require_book(&mut *tx, isbn).await?;

        let added = associations::add_pair(&mut *tx, Association::Favourites, actor.user_id, isbn).await?;
        tx.commit().await?;

        if added {
            tracing::info!(user_id = actor.user_id, isbn, "added favourite");
        }
        Ok(added)
    }

    /// Returns true if the book was a favourite before the call
    pub async fn remove_favourite(&self, actor: &Actor, isbn: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        require_user(&mut *tx, actor.user_id).await?;
        require_book(&mut *tx, isbn).await?;

        let removed =
            associations::remove_pair(&mut *tx, Association::Favourites, actor.user_id, isbn).await?;
        tx.commit().await?;

        if removed {
            tracing::info!(user_id = actor.user_id, isbn, "removed favourite");
        }
        Ok(removed)
    }

    pub async fn is_favourite(&self, user_id: i64, isbn: i64) -> Result<bool> {
        require_user(self.db.pool(), user_id).await?;
        require_book(self.db.pool(), isbn).await?;
        associations::contains_pair(self.db.pool(), Association::Favourites, user_id, isbn).await
    }

    /// Favourite books of a user, ordered by title
    pub async fn list_favourite_books(&self, user_id: i64) -> Result<Vec<Book>> {
        require_user(self.db.pool(), user_id).await?;
        queries::list_favourite_books(self.db.pool(), user_id).await
    }

    /// Users who favourited a book, ordered by username
    pub async fn favourited_by(&self, isbn: i64) -> Result<Vec<User>> {
        require_book(self.db.pool(), isbn).await?;
        queries::list_users_by_favourite(self.db.pool(), isbn).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{NewBook, NewUser};
    use crate::storage::Database;

    async fn setup() -> (Catalog, Actor) {
        let db = Database::new_in_memory().await.unwrap();
        let user_id = queries::insert_user(
            db.pool(),
            &NewUser::new("reader".to_string(), "reader@example.com".to_string()),
        )
        .await
        .unwrap();
        (Catalog::new(db), Actor::regular(user_id))
    }

    async fn add_book(catalog: &Catalog, title: &str) -> i64 {
        queries::insert_book(catalog.database().pool(), &NewBook::new(title.to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_favourite_is_idempotent() {
        let (catalog, actor) = setup().await;
        let isbn = add_book(&catalog, "Dune").await;

        assert!(catalog.add_favourite(&actor, isbn).await.unwrap());
        assert!(!catalog.add_favourite(&actor, isbn).await.unwrap());

        let books = catalog.list_favourite_books(actor.user_id).await.unwrap();
        assert_eq!(books.len(), 1);
        assert!(catalog.is_favourite(actor.user_id, isbn).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_without_add_is_noop() {
        let (catalog, actor) = setup().await;
        let isbn = add_book(&catalog, "Dune").await;

        assert!(!catalog.remove_favourite(&actor, isbn).await.unwrap());
        assert!(catalog.list_favourite_books(actor.user_id).await.unwrap().is_empty());

        catalog.add_favourite(&actor, isbn).await.unwrap();
        assert!(catalog.remove_favourite(&actor, isbn).await.unwrap());
        assert!(!catalog.is_favourite(actor.user_id, isbn).await.unwrap());
    }

    #[tokio::test]
    async fn test_favourites_are_per_user() {
        let (catalog, a) = setup().await;
        let b_id = queries::insert_user(
            catalog.database().pool(),
            &NewUser::new("other".to_string(), "other@example.com".to_string()),
        )
        .await
        .unwrap();
        let b = Actor::regular(b_id);

        let mut isbns = Vec::new();
        for n in 1..=4 {
            isbns.push(add_book(&catalog, &format!("book #{n}")).await);
        }

        catalog.add_favourite(&a, isbns[3]).await.unwrap();
        catalog.add_favourite(&a, isbns[1]).await.unwrap();
        catalog.add_favourite(&b, isbns[2]).await.unwrap();

        let titles = |books: Vec<Book>| books.into_iter().map(|b| b.title).collect::<Vec<_>>();
        assert_eq!(
            titles(catalog.list_favourite_books(a.user_id).await.unwrap()),
            vec!["book #2", "book #4"]
        );
        assert_eq!(
            titles(catalog.list_favourite_books(b.user_id).await.unwrap()),
            vec!["book #3"]
        );

        let fans = catalog.favourited_by(isbns[2]).await.unwrap();
        assert_eq!(fans.len(), 1);
        assert_eq!(fans[0].username, "other");
    }

    #[tokio::test]
    async fn test_missing_book_or_user() {
        let (catalog, actor) = setup().await;
        let isbn = add_book(&catalog, "Dune").await;

        assert!(catalog.add_favourite(&actor, 999).await.unwrap_err().is_not_found());
        assert!(catalog
            .add_favourite(&Actor::regular(999), isbn)
            .await
            .unwrap_err()
            .is_not_found());
        assert!(catalog.list_favourite_books(999).await.unwrap_err().is_not_found());
        assert!(catalog.is_favourite(actor.user_id, 424242).await.unwrap_err().is_not_found());
        assert!(catalog.is_favourite(999, isbn).await.unwrap_err().is_not_found());
        assert!(catalog
            .landing(Some(&Actor::regular(999)))
            .await
            .unwrap_err()
            .is_not_found());
    }
}
