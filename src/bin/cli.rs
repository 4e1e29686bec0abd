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


use anyhow::{Context, Result};
use catalog_core::storage::{NewAuthor, NewBook, NewEdition, NewFeedback, NewPublisher, NewUser};
use catalog_core::{logging, Actor, BookLinks, Catalog, CatalogConfig};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Administrative actions from the CLI run as the operator, not as a stored user
const OPERATOR: i64 = 0;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Book Catalog CLI - Desktop maintenance tool", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database file (overrides config and environment)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Listing {
    Books,
    Authors,
    Genres,
    Publishers,
    Editions,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and run migrations
    Init,
    /// Print database statistics and integrity status
    Stats,
    /// Reclaim unused space in the database file
    Vacuum {
        /// Only vacuum when enough space is unused
        #[arg(long)]
        if_needed: bool,
    },
    /// Register a user
    AddUser {
        username: String,
        email: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Add an author
    AddAuthor {
        name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        born: NaiveDate,
        #[arg(long)]
        country: String,
        /// Date of death (YYYY-MM-DD)
        #[arg(long)]
        died: Option<NaiveDate>,
        /// ISBNs of existing books
        #[arg(long = "book")]
        books: Vec<i64>,
    },
    /// Add a book
    AddBook {
        title: String,
        #[arg(long)]
        isbn: Option<i64>,
        #[arg(long, default_value = "")]
        description: String,
        /// Author names (must exist)
        #[arg(long = "author")]
        authors: Vec<String>,
        /// Genre names (must exist)
        #[arg(long = "genre")]
        genres: Vec<String>,
        /// Edition ids to attach
        #[arg(long = "edition")]
        editions: Vec<i64>,
    },
    /// Add a genre
    AddGenre { name: String },
    /// Add a publisher
    AddPublisher {
        name: String,
        address: String,
        phone: String,
        #[arg(long, default_value = "")]
        url: String,
    },
    /// Add an edition under a publisher
    AddEdition {
        publisher: String,
        language: String,
        year: String,
    },
    /// Mark a book as a user's favourite
    Favourite { username: String, isbn: i64 },
    /// Remove a book from a user's favourites
    Unfavourite { username: String, isbn: i64 },
    /// Post feedback on a book
    Feedback {
        username: String,
        isbn: i64,
        rate: i32,
        body: String,
    },
    /// Show a book with its authors, genres, editions and feedback
    Book { isbn: i64 },
    /// Show the landing view
    Landing {
        /// Include this user's favourites
        #[arg(long)]
        username: Option<String>,
    },
    /// Search titles and names
    Search { text: String },
    /// List all entities of one kind
    List {
        #[arg(value_enum)]
        kind: Listing,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CatalogConfig::from_env()?,
    };
    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }
    Ok(config)
}

async fn actor_for(catalog: &Catalog, username: &str) -> Result<Actor> {
    let user = catalog
        .find_user(username)
        .await
        .with_context(|| format!("unknown user '{}'", username))?;
    Ok(Actor::from_user(&user))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.log_filter);

    let catalog = Catalog::open(&config)
        .await
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    let operator = Actor::admin(OPERATOR);

    match cli.command {
        Commands::Init => {
            println!("Database ready at {}", config.database_path.display());
        }
        Commands::Stats => {
            let db = catalog.database();
            let stats = db.get_stats().await?;
            let integrity_ok = db.check_integrity().await?;
            print_json(&serde_json::json!({
                "stats": stats,
                "unused_percentage": stats.unused_percentage(),
                "should_vacuum": stats.should_vacuum(),
                "integrity_ok": integrity_ok,
            }))?;
            if !integrity_ok {
                anyhow::bail!("integrity check failed");
            }
        }
        Commands::Vacuum { if_needed } => {
            let db = catalog.database();
            let before = db.get_stats().await?;
            if if_needed && !before.should_vacuum() {
                println!(
                    "Vacuum not needed ({:.1}% unused)",
                    before.unused_percentage()
                );
            } else {
                db.vacuum().await?;
                let after = db.get_stats().await?;
                println!(
                    "Vacuumed: {} -> {} bytes",
                    before.total_size, after.total_size
                );
            }
        }
        Commands::AddUser { username, email, admin } => {
            let user = catalog.register_user(&NewUser::new(username.clone(), email)).await?;
            if admin {
                catalog.set_admin(&operator, &username, true).await?;
            }
            print_json(&catalog.find_user(&user.username).await?)?;
        }
        Commands::AddAuthor {
            name,
            born,
            country,
            died,
            books,
        } => {
            let author = NewAuthor {
                date_birth: Some(born),
                date_death: died,
                country: Some(country),
                ..NewAuthor::new(name.clone())
            };
            let isbns: BTreeSet<i64> = books.into_iter().collect();
            catalog.create_author(&operator, &author, &isbns).await?;
            print_json(&catalog.author_details(&name).await?)?;
        }
        Commands::AddBook {
            title,
            isbn,
            description,
            authors,
            genres,
            editions,
        } => {
            let mut book = NewBook::new(title);
            book.isbn = isbn;
            book.description = description;
            let links = BookLinks {
                authors,
                genres,
                editions,
            };
            let isbn = catalog.create_book(&operator, &book, &links).await?;
            print_json(&catalog.book_details(isbn).await?)?;
        }
        Commands::AddGenre { name } => {
            catalog.create_genre(&operator, &name).await?;
            print_json(&catalog.find_genre(&name).await?)?;
        }
        Commands::AddPublisher {
            name,
            address,
            phone,
            url,
        } => {
            let publisher = NewPublisher {
                url,
                ..NewPublisher::new(name.clone(), address, phone)
            };
            catalog.create_publisher(&operator, &publisher).await?;
            print_json(&catalog.find_publisher(&name).await?)?;
        }
        Commands::AddEdition {
            publisher,
            language,
            year,
        } => {
            let publisher = catalog.find_publisher(&publisher).await?;
            let edition_id = catalog
                .create_edition(&operator, &NewEdition::new(language, year, publisher.publisher_id))
                .await?;
            print_json(&catalog.find_edition(edition_id).await?)?;
        }
        Commands::Favourite { username, isbn } => {
            let actor = actor_for(&catalog, &username).await?;
            let added = catalog.add_favourite(&actor, isbn).await?;
            println!("{}", if added { "Added to favourites" } else { "Already a favourite" });
        }
        Commands::Unfavourite { username, isbn } => {
            let actor = actor_for(&catalog, &username).await?;
            let removed = catalog.remove_favourite(&actor, isbn).await?;
            println!("{}", if removed { "Removed from favourites" } else { "Not a favourite" });
        }
        Commands::Feedback {
            username,
            isbn,
            rate,
            body,
        } => {
            let actor = actor_for(&catalog, &username).await?;
            catalog.post_feedback(&actor, isbn, &NewFeedback::new(body, rate)).await?;
            let rating = catalog.book_rating(isbn).await?;
            println!("Rating now {}", catalog_core::catalog::format_rating(rating));
        }
        Commands::Book { isbn } => {
            print_json(&catalog.book_details(isbn).await?)?;
        }
        Commands::Landing { username } => {
            let actor = match username {
                Some(username) => Some(actor_for(&catalog, &username).await?),
                None => None,
            };
            print_json(&catalog.landing(actor.as_ref()).await?)?;
        }
        Commands::Search { text } => {
            print_json(&catalog.search(&text).await?)?;
        }
        Commands::List { kind } => match kind {
            Listing::Books => print_json(&catalog.list_books().await?)?,
            Listing::Authors => print_json(&catalog.list_authors().await?)?,
            Listing::Genres => print_json(&catalog.list_genres().await?)?,
            Listing::Publishers => print_json(&catalog.list_publishers().await?)?,
            Listing::Editions => print_json(&catalog.list_editions().await?)?,
        },
    }

    Ok(())
}
