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


//! Acting identity passed into every mutation

use crate::error::{CatalogError, Result};
use crate::storage::models::{User, UserRole};
use serde::{Deserialize, Serialize};

/// Who is performing an operation
///
/// Built by the caller from whatever session/identity provider it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn regular(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Regular)
    }

    pub fn admin(user_id: i64) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    pub fn from_user(user: &User) -> Self {
        Self::new(user.user_id, user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Unauthorized` unless the actor is an admin
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }

        tracing::warn!(user_id = self.user_id, action, "non-admin attempted privileged action");
        Err(CatalogError::unauthorized(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(Actor::admin(1).require_admin("delete book").is_ok());

        let err = Actor::regular(2).require_admin("delete book").unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Not authorized: delete book");
    }
}
