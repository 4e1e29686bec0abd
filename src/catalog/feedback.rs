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


//! Reader feedback
//!
//! Posting or removing feedback changes the book's rating, so both
//! operations recompute it in the same transaction.

use super::ratings::compute_book_rating;
use super::{require_book, require_user, validation, Actor, Catalog};
use crate::error::{CatalogError, Result};
use crate::storage::models::{Feedback, NewFeedback};
use crate::storage::queries;

impl Catalog {
    /// Post feedback on a book as the acting user; returns the new id
    pub async fn post_feedback(&self, actor: &Actor, isbn: i64, feedback: &NewFeedback) -> Result<i64> {
        validation::validate_new_feedback(feedback)?;

        let mut tx = self.db.pool().begin().await?;
        require_user(&mut *tx, actor.user_id).await?;
        let book = require_book(&mut *tx, isbn).await?;

        let feedback_id = queries::insert_feedback(&mut *tx, actor.user_id, &book, feedback).await?;
        let rating = compute_book_rating(&mut tx, isbn).await?;
        tx.commit().await?;

        tracing::info!(feedback_id, isbn, user_id = actor.user_id, rating, "posted feedback");
        Ok(feedback_id)
    }

    /// Remove a feedback entry (admin only)
    pub async fn remove_feedback(&self, actor: &Actor, feedback_id: i64) -> Result<()> {
        actor.require_admin("remove feedback")?;

        let mut tx = self.db.pool().begin().await?;
        let feedback = queries::find_feedback_by_id(&mut *tx, feedback_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("feedback", feedback_id))?;
        queries::delete_feedback(&mut *tx, feedback_id).await?;

        if let Some(isbn) = feedback.book_isbn {
            if queries::find_book_by_isbn(&mut *tx, isbn).await?.is_some() {
                compute_book_rating(&mut tx, isbn).await?;
            }
        }
        tx.commit().await?;

        tracing::info!(feedback_id, "removed feedback");
        Ok(())
    }

    /// Feedback on a book, newest first
    pub async fn list_feedback_for_book(&self, isbn: i64) -> Result<Vec<Feedback>> {
        require_book(self.db.pool(), isbn).await?;
        queries::list_feedback_by_book(self.db.pool(), isbn).await
    }

    /// Feedback written by a user, newest first
    pub async fn list_feedback_for_user(&self, user_id: i64) -> Result<Vec<Feedback>> {
        require_user(self.db.pool(), user_id).await?;
        queries::list_feedback_by_user(self.db.pool(), user_id).await
    }
}
