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


//! Field validation rules
//!
//! Checks run before any write. A failing check returns
//! `CatalogError::Validation` naming the offending field.

use crate::error::{CatalogError, Result};
use crate::storage::models::{NewAuthor, NewBook, NewEdition, NewFeedback, NewPublisher, NewUser};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_IMAGE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 560;
pub const MAX_FEEDBACK_LEN: usize = 560;
pub const MAX_ABOUT_ME_LEN: usize = 140;
pub const MIN_RATE: i32 = 1;
pub const MAX_RATE: i32 = 5;

lazy_static! {
    static ref YEAR_RE: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref PHONE_RE: Regex =
        Regex::new(r"^((8|\+7)[\- ]?)?(\(?\d{3}\)?[\- ]?)?[\d\- ]{7,10}$").unwrap();
    static ref URL_RE: Regex =
        Regex::new(r"^((https?)://)?(www.)?[a-z0-9]+\.[a-z]+(/[a-zA-Z0-9#]+/?)*$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Value must contain something other than whitespace
pub fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "this field is required"));
    }
    Ok(())
}

/// Value must be at most `max` characters long
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(CatalogError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

pub fn validate_year(year: &str) -> Result<()> {
    if !YEAR_RE.is_match(year) {
        return Err(CatalogError::validation("year", "expected a four-digit year"));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<()> {
    require_text("phone", phone)?;
    if !PHONE_RE.is_match(phone) {
        return Err(CatalogError::validation("phone", "not a valid phone number"));
    }
    Ok(())
}

/// Empty means "no website" and is accepted
pub fn validate_url(url: &str) -> Result<()> {
    if !url.is_empty() && !URL_RE.is_match(url) {
        return Err(CatalogError::validation("url", "not a valid URL"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    require_text("email", email)?;
    if !EMAIL_RE.is_match(email) {
        return Err(CatalogError::validation("email", "not a valid email address"));
    }
    Ok(())
}

pub fn validate_rate(rate: i32) -> Result<()> {
    if !(MIN_RATE..=MAX_RATE).contains(&rate) {
        return Err(CatalogError::validation(
            "rate",
            format!("must be between {} and {}", MIN_RATE, MAX_RATE),
        ));
    }
    Ok(())
}

pub fn validate_lifespan(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> Result<()> {
    if let (Some(birth), Some(death)) = (birth, death) {
        if death < birth {
            return Err(CatalogError::validation("date_death", "cannot be before date of birth"));
        }
    }
    Ok(())
}

fn validate_image(image: Option<&str>) -> Result<()> {
    if let Some(image) = image {
        max_len("image", image, MAX_IMAGE_LEN)?;
    }
    Ok(())
}

pub fn validate_new_author(author: &NewAuthor) -> Result<()> {
    require_text("name", &author.name)?;
    if author.date_birth.is_none() {
        return Err(CatalogError::validation("date_birth", "this field is required"));
    }
    require_text("country", author.country.as_deref().unwrap_or_default())?;
    validate_image(author.image.as_deref())?;
    validate_lifespan(author.date_birth, author.date_death)
}

pub fn validate_new_book(book: &NewBook) -> Result<()> {
    require_text("title", &book.title)?;
    max_len("description", &book.description, MAX_DESCRIPTION_LEN)?;
    validate_image(book.image.as_deref())
}

pub fn validate_genre_name(name: &str) -> Result<()> {
    require_text("name", name)
}

pub fn validate_new_publisher(publisher: &NewPublisher) -> Result<()> {
    require_text("name", &publisher.name)?;
    require_text("address", &publisher.address)?;
    validate_url(&publisher.url)?;
    validate_phone(&publisher.phone)
}

pub fn validate_new_edition(edition: &NewEdition) -> Result<()> {
    require_text("language", &edition.language)?;
    validate_year(&edition.year)
}

pub fn validate_new_feedback(feedback: &NewFeedback) -> Result<()> {
    require_text("body", &feedback.body)?;
    max_len("body", &feedback.body, MAX_FEEDBACK_LEN)?;
    validate_rate(feedback.rate)
}

pub fn validate_new_user(user: &NewUser) -> Result<()> {
    require_text("username", &user.username)?;
    validate_email(&user.email)
}

pub fn validate_about_me(about_me: Option<&str>) -> Result<()> {
    if let Some(about_me) = about_me {
        max_len("about_me", about_me, MAX_ABOUT_ME_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: CatalogError) -> &'static str {
        match err {
            CatalogError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_year() {
        assert!(validate_year("1999").is_ok());
        assert_eq!(field_of(validate_year("99").unwrap_err()), "year");
        assert!(validate_year("19999").is_err());
        assert!(validate_year("abcd").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("8 800 555 35 35").is_ok());
        assert!(validate_phone("+7 (495) 123-45-67").is_ok());
        assert!(validate_phone("1234567").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_url() {
        assert!(validate_url("").is_ok());
        assert!(validate_url("https://www.penguin.com").is_ok());
        assert!(validate_url("ast.ru/books/").is_ok());
        assert_eq!(field_of(validate_url("not a url").unwrap_err()), "url");
    }

    #[test]
    fn test_rate_bounds() {
        assert!(validate_rate(1).is_ok());
        assert!(validate_rate(5).is_ok());
        assert!(validate_rate(0).is_err());
        assert!(validate_rate(6).is_err());
    }

    #[test]
    fn test_lengths_count_characters() {
        let cyrillic = "ж".repeat(MAX_ABOUT_ME_LEN);
        assert!(validate_about_me(Some(&cyrillic)).is_ok());
        let too_long = "ж".repeat(MAX_ABOUT_ME_LEN + 1);
        assert!(validate_about_me(Some(&too_long)).is_err());
    }

    #[test]
    fn test_entity_payloads() {
        assert_eq!(field_of(validate_new_book(&NewBook::new("  ".to_string())).unwrap_err()), "title");
        assert!(validate_new_book(&NewBook::new("Dune".to_string())).is_ok());

        let mut author = NewAuthor::new("Pushkin".to_string());
        assert_eq!(field_of(validate_new_author(&author).unwrap_err()), "date_birth");
        author.date_birth = NaiveDate::from_ymd_opt(1799, 6, 6);
        assert_eq!(field_of(validate_new_author(&author).unwrap_err()), "country");
        author.country = Some("  ".to_string());
        assert_eq!(field_of(validate_new_author(&author).unwrap_err()), "country");
        author.country = Some("Russia".to_string());
        assert!(validate_new_author(&author).is_ok());
        author.date_death = NaiveDate::from_ymd_opt(1837, 2, 10);
        assert!(validate_new_author(&author).is_ok());
        author.date_death = NaiveDate::from_ymd_opt(1700, 1, 1);
        assert_eq!(field_of(validate_new_author(&author).unwrap_err()), "date_death");

        let user = NewUser::new("john".to_string(), "john.example.com".to_string());
        assert_eq!(field_of(validate_new_user(&user).unwrap_err()), "email");

        assert!(validate_new_feedback(&NewFeedback::new("Great".to_string(), 6)).is_err());
        assert!(validate_new_feedback(&NewFeedback::new(String::new(), 3)).is_err());
    }
}
