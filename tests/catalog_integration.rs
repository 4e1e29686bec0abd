//! Integration tests for the catalog façade
//!
//! Drives a file-backed database through the public API only: admins seed
//! the catalog, readers favourite books and post feedback, and the landing
//! and search views reflect the result.

use catalog_core::storage::{NewAuthor, NewBook, NewFeedback, NewPublisher, NewUser};
use catalog_core::{logging, Actor, BookLinks, Catalog, CatalogConfig, Database};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tempfile::TempDir;

struct Fixture {
    catalog: Catalog,
    admin: Actor,
    _dir: TempDir,
}

fn author(name: &str) -> NewAuthor {
    NewAuthor {
        date_birth: NaiveDate::from_ymd_opt(1929, 10, 21),
        country: Some("United States".to_string()),
        ..NewAuthor::new(name.to_string())
    }
}

async fn fixture() -> Result<Fixture, Box<dyn std::error::Error>> {
    logging::init_for_tests();

    let dir = TempDir::new()?;
    let config = CatalogConfig {
        database_path: dir.path().join("catalog.db"),
        ..CatalogConfig::default()
    };
    let catalog = Catalog::open(&config).await?;

    let admin = catalog
        .register_user(&NewUser::new("librarian".to_string(), "librarian@example.com".to_string()))
        .await?;
    let operator = Actor::admin(admin.user_id);
    catalog.set_admin(&operator, "librarian", true).await?;
    let admin = Actor::from_user(&catalog.find_user("librarian").await?);
    assert!(admin.is_admin());

    Ok(Fixture {
        catalog,
        admin,
        _dir: dir,
    })
}

async fn reader(catalog: &Catalog, name: &str) -> Result<Actor, Box<dyn std::error::Error>> {
    let user = catalog
        .register_user(&NewUser::new(name.to_string(), format!("{name}@example.com")))
        .await?;
    Ok(Actor::from_user(&user))
}

#[tokio::test]
async fn test_reader_flow_updates_landing() -> Result<(), Box<dyn std::error::Error>> {
    let Fixture { catalog, admin, _dir } = fixture().await?;

    catalog
        .create_author(&admin, &author("Ursula K. Le Guin"), &BTreeSet::new())
        .await?;
    catalog.create_genre(&admin, "Science Fiction").await?;

    let links = BookLinks::new()
        .with_authors(["Ursula K. Le Guin"])
        .with_genres(["Science Fiction"]);
    let dispossessed = catalog
        .create_book(&admin, &NewBook::new("The Dispossessed".to_string()), &links)
        .await?;
    let left_hand = catalog
        .create_book(&admin, &NewBook::new("The Left Hand of Darkness".to_string()), &links)
        .await?;
    let unrelated = catalog
        .create_book(&admin, &NewBook::new("Cookbook".to_string()), &BookLinks::new())
        .await?;

    let alice = reader(&catalog, "alice").await?;
    let bob = reader(&catalog, "bob").await?;

    catalog.post_feedback(&alice, dispossessed, &NewFeedback::new("Superb".to_string(), 5)).await?;
    catalog.post_feedback(&bob, dispossessed, &NewFeedback::new("Good".to_string(), 4)).await?;
    catalog.post_feedback(&bob, left_hand, &NewFeedback::new("Fine".to_string(), 3)).await?;
    catalog.add_favourite(&alice, left_hand).await?;

    let landing = catalog.landing(Some(&alice)).await?;
    let top_titles: Vec<_> = landing.top_books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(top_titles, vec!["The Dispossessed", "The Left Hand of Darkness", "Cookbook"]);
    assert_eq!(landing.top_books[0].rating, 4.5);

    assert_eq!(landing.top_authors.len(), 1);
    assert_eq!(landing.top_authors[0].rating, (4.5 + 3.0) / 2.0);

    let favourites = landing.favourites.expect("authenticated landing has favourites");
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites[0].isbn, left_hand);

    assert!(catalog.landing(None).await?.favourites.is_none());
    assert_eq!(catalog.find_book(unrelated).await?.rating, 0.0);

    Ok(())
}

#[tokio::test]
async fn test_author_set_replacement_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let Fixture { catalog, admin, _dir } = fixture().await?;

    for name in ["X", "Y", "Z"] {
        catalog
            .create_author(&admin, &author(name), &BTreeSet::new())
            .await?;
    }
    let isbn = catalog
        .create_book(
            &admin,
            &NewBook::new("Anthology".to_string()),
            &BookLinks::new().with_authors(["X", "Y"]),
        )
        .await?;

    catalog
        .edit_book(
            &admin,
            isbn,
            &NewBook::new("Anthology".to_string()),
            &BookLinks::new().with_authors(["Y", "Z"]),
        )
        .await?;

    let details = catalog.book_details(isbn).await?;
    let names: Vec<_> = details.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Y", "Z"]);

    assert!(catalog.author_details("X").await?.books.is_empty());

    // Same edit from the author side
    let mut isbns = BTreeSet::new();
    isbns.insert(isbn);
    catalog
        .edit_author(&admin, "X", &author("X"), &isbns)
        .await?;
    assert_eq!(catalog.book_details(isbn).await?.authors.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_and_duplicate_errors() -> Result<(), Box<dyn std::error::Error>> {
    let Fixture { catalog, admin, _dir } = fixture().await?;
    let mallory = reader(&catalog, "mallory").await?;

    let err = catalog.create_genre(&mallory, "Horror").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(err.is_client_error());
    assert!(catalog.list_genres().await?.is_empty());

    let publisher = NewPublisher::new(
        "Penguin".to_string(),
        "London".to_string(),
        "+7 (495) 123-45-67".to_string(),
    );
    catalog.create_publisher(&admin, &publisher).await?;
    let err = catalog.create_publisher(&admin, &publisher).await.unwrap_err();
    assert!(err.is_duplicate_key());
    assert!(!err.user_message().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_reopen_keeps_data() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("catalog.db");

    {
        let catalog = Catalog::new(Database::new(&path).await?);
        let admin = Actor::admin(0);
        catalog.create_genre(&admin, "Poetry").await?;
        catalog.database().clone().close().await?;
    }

    let catalog = Catalog::new(Database::new(&path).await?);
    assert_eq!(catalog.find_genre("Poetry").await?.name, "Poetry");
    assert!(catalog.database().check_integrity().await?);

    Ok(())
}
