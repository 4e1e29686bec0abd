//! Database models for the book catalog
//!
//! Row structs (`Book`, `Author`, ...) are what the query layer hands back.
//! `New*` structs carry the caller-editable fields for inserts and for edits,
//! which replace every scalar field at once.
//!
//! # SQLite Adaptations
//! - Enums stored as integers
//! - DateTime stored as TEXT in ISO 8601 format
//! - Many-to-many relationships use junction tables (see `storage::associations`)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// ENUMS
// ============================================================================

/// Role flag stored on every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
pub enum UserRole {
    Regular = 0,
    Admin = 1,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Regular
    }
}

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Book entity
///
/// `rating` is a cache of the feedback average; read it through
/// `catalog::ratings` to get a fresh value.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub isbn: i64,
    pub title: String,
    pub description: String,
    #[sqlx(default)]
    pub image: Option<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub author_id: i64,
    pub name: String,
    #[sqlx(default)]
    pub date_birth: Option<NaiveDate>,
    #[sqlx(default)]
    pub date_death: Option<NaiveDate>,
    #[sqlx(default)]
    pub country: Option<String>,
    #[sqlx(default)]
    pub image: Option<String>,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Genre {
    pub genre_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Publisher {
    pub publisher_id: i64,
    pub name: String,
    /// Empty when the publisher has no website
    pub url: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Edition {
    pub edition_id: i64,
    pub language: String,
    /// Four-digit year, kept as text
    pub year: String,
    pub publisher_id: i64,
    #[sqlx(default)]
    pub book_isbn: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    /// Opaque hash handed over by the identity provider
    #[sqlx(default)]
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[sqlx(default)]
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub role: UserRole,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: i64,
    pub body: String,
    pub rate: i32,
    pub timestamp: DateTime<Utc>,
    /// Title of the book when the feedback was written
    pub book_title_reserved: String,
    pub user_id: i64,
    /// Cleared when the book is deleted
    #[sqlx(default)]
    pub book_isbn: Option<i64>,
}

// ============================================================================
// INSERT / EDIT PAYLOADS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewBook {
    /// Assigned by the store when `None`
    pub isbn: Option<i64>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

impl NewBook {
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    pub fn with_isbn(mut self, isbn: i64) -> Self {
        self.isbn = Some(isbn);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    pub date_birth: Option<NaiveDate>,
    pub date_death: Option<NaiveDate>,
    pub country: Option<String>,
    pub image: Option<String>,
}

impl NewAuthor {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
    pub url: String,
    pub address: String,
    pub phone: String,
}

impl NewPublisher {
    pub fn new(name: String, address: String, phone: String) -> Self {
        Self {
            name,
            url: String::new(),
            address,
            phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdition {
    pub language: String,
    pub year: String,
    pub publisher_id: i64,
}

impl NewEdition {
    pub fn new(language: String, year: String, publisher_id: i64) -> Self {
        Self {
            language,
            year,
            publisher_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
}

impl NewUser {
    pub fn new(username: String, email: String) -> Self {
        Self {
            username,
            email,
            password_hash: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub body: String,
    pub rate: i32,
}

impl NewFeedback {
    pub fn new(body: String, rate: i32) -> Self {
        Self { body, rate }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_flags() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::default().is_admin());
    }

    #[test]
    fn test_user_hash_not_serialized() {
        let user = User {
            user_id: 1,
            username: "john".to_string(),
            email: "john@example.com".to_string(),
            password_hash: Some("secret-hash".to_string()),
            about_me: None,
            last_seen: Utc::now(),
            role: UserRole::Regular,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("john@example.com"));
    }
}
