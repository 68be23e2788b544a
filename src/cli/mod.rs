//! Command-line interface for booklend.
//!
//! Provides commands for adding books, borrowing and returning them,
//! searching the catalog, and reviewing the lending history.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, paths, ResolvedConfig};
use crate::domain::{Book, BookId, HistoryRecord};
use crate::library::{CategoryFilter, LendOutcome, Library, ALL_CATEGORIES};
use crate::store::FileStore;

/// booklend - Local book lending tracker
#[derive(Parser, Debug)]
#[command(name = "booklend")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory (overrides BOOKLEND_HOME and the config file)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a book to the catalog
    Add {
        /// Book title
        title: String,

        /// Author name
        #[arg(short, long)]
        author: String,

        /// Category (e.g. fiction, non-fiction, science, history)
        #[arg(short, long)]
        category: String,
    },

    /// Borrow an available book
    Borrow {
        /// Book ID
        book_id: BookId,
    },

    /// Return a borrowed book
    Return {
        /// Book ID
        book_id: BookId,
    },

    /// List books, optionally filtered
    List {
        /// Match title or author (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category to show, or "all"
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },

    /// Show details of a book
    Show {
        /// Book ID
        book_id: BookId,
    },

    /// Show lending history, newest first
    History {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show catalog counts
    Stats,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut cfg = config::config()?.clone();
        if let Some(home) = self.home {
            cfg = cfg.with_home(home);
        }

        if let Commands::Config = self.command {
            show_config(&cfg);
            return Ok(());
        }

        let mut library = open_library(&cfg).await?;

        match self.command {
            Commands::Add {
                title,
                author,
                category,
            } => add_book(&mut library, &title, &author, &category).await,
            Commands::Borrow { book_id } => borrow_book(&mut library, book_id).await,
            Commands::Return { book_id } => return_book(&mut library, book_id).await,
            Commands::List { search, category } => {
                list_books(&library, &search, &category);
                Ok(())
            }
            Commands::Show { book_id } => show_book(&library, book_id),
            Commands::History { limit } => {
                print!("{}", format_history(&library.recent_history(limit)));
                Ok(())
            }
            Commands::Stats => {
                show_stats(&library);
                Ok(())
            }
            Commands::Config => Ok(()),
        }
    }
}

/// Open the file store under the configured home and load the library
pub async fn open_library(cfg: &ResolvedConfig) -> Result<Library> {
    let store_dir = cfg.store_dir();
    let store = FileStore::open(&store_dir)
        .await
        .with_context(|| format!("Failed to open store: {}", store_dir.display()))?;

    Library::load(Arc::new(store), cfg.library_options())
        .await
        .context("Failed to load library")
}

/// Trim a required text field, rejecting blanks
fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{} must not be empty", field);
    }
    Ok(trimmed)
}

/// Add a book
async fn add_book(library: &mut Library, title: &str, author: &str, category: &str) -> Result<()> {
    let title = required(title, "Title")?;
    let author = required(author, "Author")?;
    let category = required(category, "Category")?;

    let book = library.add_book(title, author, category).await?;

    println!("Added \"{}\" (id {})\n", book.title, book.id);
    print!("{}", format_book_table(&library.books().iter().collect::<Vec<_>>()));

    Ok(())
}

/// Borrow a book
async fn borrow_book(library: &mut Library, book_id: BookId) -> Result<()> {
    let outcome = library.borrow_book(book_id).await?;
    print!("{}", format_lend_report(library, book_id, &outcome));
    Ok(())
}

/// Return a book
async fn return_book(library: &mut Library, book_id: BookId) -> Result<()> {
    let outcome = library.return_book(book_id).await?;
    print!("{}", format_lend_report(library, book_id, &outcome));
    Ok(())
}

/// Outcome line, followed by the refreshed catalog and history when
/// something changed
pub fn format_lend_report(library: &Library, book_id: BookId, outcome: &LendOutcome) -> String {
    let mut out = format!("{}
", describe_outcome(book_id, outcome));
    if !outcome.is_change() {
        return out;
    }

    out.push('\n');
    out.push_str(&format_book_table(&library.books().iter().collect::<Vec<_>>()));
    out.push_str("\nHistory:\n");
    out.push_str(&format_history(&library.recent_history(None)));
    out
}

/// Human-readable result of a borrow/return
pub fn describe_outcome(book_id: BookId, outcome: &LendOutcome) -> String {
    match outcome {
        LendOutcome::Borrowed(record) => {
            format!("Borrowed \"{}\" (id {})", record.book_title, record.book_id)
        }
        LendOutcome::Returned(record) => {
            format!("Returned \"{}\" (id {})", record.book_title, record.book_id)
        }
        LendOutcome::NotFound => format!("No book with id {}", book_id),
        LendOutcome::AlreadyInState(status) => {
            format!("Book {} is already {}, nothing changed", book_id, status)
        }
    }
}

/// Books passing the search/category filter, as typed
fn matching_books<'a>(library: &'a Library, search: &str, category: &str) -> Vec<&'a Book> {
    library.filter_books(search, &CategoryFilter::from(category))
}

/// List the catalog through the search/category filter
fn list_books(library: &Library, search: &str, category: &str) {
    let filter = CategoryFilter::from(category);
    let books = matching_books(library, search, category);

    if books.is_empty() {
        if library.is_empty() {
            println!("Catalog is empty. Use 'booklend add <title>' to add a book.");
        } else {
            println!("No books match (search: \"{}\", category: {})", search, filter);
        }
        return;
    }

    print!("{}", format_book_table(&books));
    println!("\nShowing {} of {} books", books.len(), library.len());
}

/// Show details of one book
fn show_book(library: &Library, book_id: BookId) -> Result<()> {
    let book = library
        .get(book_id)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", book_id))?;

    println!("  ID:        {}", book.id);
    println!("  Title:     {}", book.title);
    println!("  Author:    {}", book.author);
    println!("  Category:  {}", book.category);
    println!("  Status:    {}", book.status);
    if let Some(ref borrower) = book.borrowed_by {
        println!("  Borrower:  {}", borrower);
    }
    if let Some(date) = book.borrow_date {
        println!("  Borrowed:  {}", date.format("%Y-%m-%d %H:%M"));
    }
    if let Some(date) = book.return_date {
        println!("  Returned:  {}", date.format("%Y-%m-%d %H:%M"));
    }
    println!("  Cover:     {}", book.cover_url);

    Ok(())
}

fn show_stats(library: &Library) {
    let stats = library.stats();

    println!("Books:      {}", stats.total);
    println!("  Available: {}", stats.available);
    println!("  Borrowed:  {}", stats.borrowed);
    println!("History:    {} entries", stats.history_entries);
    println!();
    println!("Categories:");
    for category in library.categories() {
        let count = library
            .filter_books("", &CategoryFilter::from(category))
            .len();
        println!("  {:<16} {}", category, count);
    }
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig) {
    let config_file = cfg
        .config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none - using defaults)".to_string());

    println!("Config file: {}", config_file);
    println!();
    println!("Paths:");
    println!("  Home:     {}", cfg.home.display());
    println!("  Store:    {}", cfg.store_dir().display());
    println!("  Books:    {}", paths::books_file(&cfg.home).display());
    println!("  History:  {}", paths::history_file(&cfg.home).display());
    println!("  Lock:     {}", paths::lock_file(&cfg.home).display());
    println!();
    println!("Lending:");
    println!("  Borrower:     {}", cfg.lending.borrower);
    println!("  Seed samples: {}", cfg.lending.seed_samples);
}

/// Render books as a fixed-width table
pub fn format_book_table(books: &[&Book]) -> String {
    let mut out = format!(
        "{:<14} {:<40} {:<24} {:<12} {:<10}\n",
        "ID", "TITLE", "AUTHOR", "CATEGORY", "STATUS"
    );
    out.push_str(&"-".repeat(104));
    out.push('\n');

    for book in books {
        out.push_str(&format!(
            "{:<14} {:<40} {:<24} {:<12} {:<10}\n",
            book.id.to_string(),
            truncate(&book.title, 40),
            truncate(&book.author, 24),
            truncate(&book.category, 12),
            book.status.to_string()
        ));
    }

    out
}

/// Render history lines, in the order given
pub fn format_history(records: &[&HistoryRecord]) -> String {
    if records.is_empty() {
        return "No lending history yet.\n".to_string();
    }

    records
        .iter()
        .map(|record| format!("{}\n", record.describe()))
        .collect()
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
