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


//! User accounts
//!
//! Password handling stays with the caller: the catalog stores whatever
//! opaque hash it is given and never sees a plaintext password.

use super::{require_user, validation, Actor, Catalog};
use crate::error::{CatalogError, Result};
use crate::storage::models::{NewUser, User};
use crate::storage::queries;

impl Catalog {
    /// Register a new regular user
    pub async fn register_user(&self, user: &NewUser) -> Result<User> {
        validation::validate_new_user(user)?;

        let mut tx = self.db.pool().begin().await?;
        if queries::find_user_by_username(&mut *tx, &user.username).await?.is_some() {
            return Err(CatalogError::duplicate("user", &user.username));
        }
        if queries::find_user_by_email(&mut *tx, &user.email).await?.is_some() {
            return Err(CatalogError::duplicate("email", &user.email));
        }

        let user_id = queries::insert_user(&mut *tx, user).await?;
        let created = require_user(&mut *tx, user_id).await?;
        tx.commit().await?;

        tracing::info!(user_id, username = %created.username, "registered user");
        Ok(created)
    }

    /// Change the actor's own username and about-me text
    pub async fn edit_profile(&self, actor: &Actor, username: &str, about_me: Option<&str>) -> Result<User> {
        validation::require_text("username", username)?;
        validation::validate_about_me(about_me)?;

        let mut tx = self.db.pool().begin().await?;
        let current = require_user(&mut *tx, actor.user_id).await?;
        if username != current.username {
            if let Some(other) = queries::find_user_by_username(&mut *tx, username).await? {
                if other.user_id != current.user_id {
                    return Err(CatalogError::duplicate("user", username));
                }
            }
        }

        queries::update_user_profile(&mut *tx, actor.user_id, username, about_me).await?;
        let updated = require_user(&mut *tx, actor.user_id).await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, "edited profile");
        Ok(updated)
    }

    pub async fn touch_last_seen(&self, actor: &Actor) -> Result<()> {
        if !queries::touch_user_last_seen(self.db.pool(), actor.user_id).await? {
            return Err(CatalogError::not_found("user", actor.user_id));
        }
        Ok(())
    }

    /// Replace the actor's stored password hash
    pub async fn set_password_hash(&self, actor: &Actor, hash: &str) -> Result<()> {
        validation::require_text("password_hash", hash)?;

        let mut tx = self.db.pool().begin().await?;
        require_user(&mut *tx, actor.user_id).await?;
        queries::set_user_password_hash(&mut *tx, actor.user_id, hash).await?;
        tx.commit().await?;

        tracing::info!(user_id = actor.user_id, "password hash updated");
        Ok(())
    }
}
