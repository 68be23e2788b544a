//! The library: owns the catalog and the lending history.
//!
//! Both lists live in memory and are written back in full to the store after
//! every mutation. Borrowing a book that is out, returning one that is in, or
//! naming an unknown id changes nothing and writes nothing.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::seed;
use crate::domain::{Book, BookId, BookStatus, HistoryAction, HistoryRecord, IdGenerator};
use crate::store::{KvStore, StoreError};

/// Store key holding the book list
pub const BOOKS_KEY: &str = "books";

/// Store key holding the history list
pub const HISTORY_KEY: &str = "history";

/// Category sentinel meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Default borrower name (there is no user model)
pub const DEFAULT_BORROWER: &str = "User";

/// Errors that can occur while loading or saving the library
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Behaviour switches for a library instance
#[derive(Debug, Clone)]
pub struct LibraryOptions {
    /// Name recorded as `borrowed_by`
    pub borrower: String,

    /// Fill an empty catalog with the sample books on load
    pub seed_samples: bool,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            borrower: DEFAULT_BORROWER.to_string(),
            seed_samples: true,
        }
    }
}

/// Category half of a filter query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,

    /// Exact category name
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_CATEGORIES),
            CategoryFilter::Only(name) => write!(f, "{}", name),
        }
    }
}

/// What a borrow or return call did
#[derive(Debug, Clone, PartialEq)]
pub enum LendOutcome {
    /// The book was lent out; carries the new history entry
    Borrowed(HistoryRecord),

    /// The book came back; carries the new history entry
    Returned(HistoryRecord),

    /// No book has that id
    NotFound,

    /// The book was already in the requested state
    AlreadyInState(BookStatus),
}

impl LendOutcome {
    /// Whether anything was mutated (and persisted)
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Borrowed(_) | Self::Returned(_))
    }

    /// The history entry appended, if any
    pub fn record(&self) -> Option<&HistoryRecord> {
        match self {
            Self::Borrowed(record) | Self::Returned(record) => Some(record),
            Self::NotFound | Self::AlreadyInState(_) => None,
        }
    }
}

/// Counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub available: usize,
    pub borrowed: usize,
    pub history_entries: usize,
}

/// Catalog manager: books, history, and the store they persist to
pub struct Library {
    /// All books, in creation order
    books: Vec<Book>,

    /// Lending events, in chronological order
    history: Vec<HistoryRecord>,

    store: Arc<dyn KvStore>,

    options: LibraryOptions,

    ids: IdGenerator,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("books", &self.books.len())
            .field("history", &self.history.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Library {
    /// Load the library from `store`.
    ///
    /// Missing or unparsable entries are treated as empty. An empty catalog is
    /// seeded with the sample books (unless disabled) and saved right away.
    pub async fn load(
        store: Arc<dyn KvStore>,
        options: LibraryOptions,
    ) -> Result<Self, LibraryError> {
        let books: Vec<Book> = read_list(store.as_ref(), BOOKS_KEY).await?;
        let history: Vec<HistoryRecord> = read_list(store.as_ref(), HISTORY_KEY).await?;

        let mut ids = IdGenerator::default();
        for book in &books {
            ids.observe(book.id.get());
        }
        for record in &history {
            ids.observe(record.id);
        }

        let mut library = Self {
            books,
            history,
            store,
            options,
            ids,
        };

        if library.books.is_empty() && library.options.seed_samples {
            info!("Catalog is empty, adding sample books");
            library.books = seed::sample_books();
            for book in &library.books {
                library.ids.observe(book.id.get());
            }
            library.persist().await?;
        }

        debug!(
            books = library.books.len(),
            history = library.history.len(),
            "Library loaded"
        );

        Ok(library)
    }

    /// Write both lists to the store, books first
    pub async fn persist(&self) -> Result<(), LibraryError> {
        let books = serde_json::to_string(&self.books)?;
        let history = serde_json::to_string(&self.history)?;

        self.store.set(BOOKS_KEY, &books).await?;
        self.store.set(HISTORY_KEY, &history).await?;

        Ok(())
    }

    /// Add a new available book with a fresh id
    pub async fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Book, LibraryError> {
        let id = BookId::new(self.ids.next_id());
        let book = Book::new(id, title, author, category);

        self.books.push(book.clone());
        self.persist().await?;

        info!(book_id = %book.id, title = %book.title, "Book added");
        Ok(book)
    }

    /// Lend out an available book
    pub async fn borrow_book(&mut self, id: BookId) -> Result<LendOutcome, LibraryError> {
        self.transition(id, HistoryAction::Borrowed).await
    }

    /// Take back a borrowed book
    pub async fn return_book(&mut self, id: BookId) -> Result<LendOutcome, LibraryError> {
        self.transition(id, HistoryAction::Returned).await
    }

    async fn transition(
        &mut self,
        id: BookId,
        action: HistoryAction,
    ) -> Result<LendOutcome, LibraryError> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == id) else {
            debug!(book_id = %id, %action, "No such book, ignoring");
            return Ok(LendOutcome::NotFound);
        };

        let now = Utc::now();
        match action {
            HistoryAction::Borrowed => {
                if !book.is_available() {
                    debug!(book_id = %id, "Book already borrowed, ignoring");
                    return Ok(LendOutcome::AlreadyInState(book.status));
                }
                book.mark_borrowed(&self.options.borrower, now);
            }
            HistoryAction::Returned => {
                if !book.is_borrowed() {
                    debug!(book_id = %id, "Book not borrowed, ignoring");
                    return Ok(LendOutcome::AlreadyInState(book.status));
                }
                book.mark_returned(now);
            }
        }

        let record = HistoryRecord::new(self.ids.next_id(), book, action, now);
        self.history.push(record.clone());
        self.persist().await?;

        info!(book_id = %id, %action, "Lending state changed");

        Ok(match action {
            HistoryAction::Borrowed => LendOutcome::Borrowed(record),
            HistoryAction::Returned => LendOutcome::Returned(record),
        })
    }

    /// Books matching `term` (title or author, case-insensitive) and `category`.
    ///
    /// Keeps catalog order. An empty term matches every book.
    pub fn filter_books(&self, term: &str, category: &CategoryFilter) -> Vec<&Book> {
        let term_lower = term.to_lowercase();

        self.books
            .iter()
            .filter(|book| book.matches_term(&term_lower) && category.matches(&book.category))
            .collect()
    }

    /// All books, in creation order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// All history entries, oldest first
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    /// Get a book by id
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// History entries, newest first
    pub fn recent_history(&self, limit: Option<usize>) -> Vec<&HistoryRecord> {
        let newest_first = self.history.iter().rev();
        match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        }
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for book in &self.books {
            if !seen.contains(&book.category.as_str()) {
                seen.push(&book.category);
            }
        }
        seen
    }

    pub fn stats(&self) -> LibraryStats {
        let borrowed = self.books.iter().filter(|b| b.is_borrowed()).count();

        LibraryStats {
            total: self.books.len(),
            available: self.books.len() - borrowed,
            borrowed,
            history_entries: self.history.len(),
        }
    }

    /// Get the number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Read a JSON list from the store, treating absent or bad data as empty
async fn read_list<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Vec<T>, LibraryError> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(Vec::new()),
        Err(StoreError::NotUtf8(_)) => {
            warn!(key, "Stored value is not UTF-8, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!(key, error = %e, "Stored value is not valid, starting empty");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn empty_library() -> Library {
        let options = LibraryOptions {
            seed_samples: false,
            ..Default::default()
        };
        Library::load(Arc::new(MemoryStore::new()), options)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_book() {
        let mut library = empty_library().await;
        let book = library
            .add_book("Dune", "Frank Herbert", "fiction")
            .await
            .unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.get(book.id), Some(&book));
        assert!(book.is_available());
    }

    #[tokio::test]
    async fn test_added_ids_are_unique() {
        let mut library = empty_library().await;
        let a = library.add_book("A", "X", "fiction").await.unwrap();
        let b = library.add_book("B", "Y", "fiction").await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_borrow_unknown_id_is_noop() {
        let mut library = empty_library().await;
        let outcome = library.borrow_book(BookId::new(404)).await.unwrap();

        assert_eq!(outcome, LendOutcome::NotFound);
        assert!(!outcome.is_change());
        assert!(library.history().is_empty());
    }

    #[tokio::test]
    async fn test_history_record_matches_book_dates() {
        let mut library = empty_library().await;
        let book = library
            .add_book("Cosmos", "Carl Sagan", "science")
            .await
            .unwrap();

        let outcome = library.borrow_book(book.id).await.unwrap();
        let record = outcome.record().unwrap();
        let stored = library.get(book.id).unwrap();

        assert_eq!(Some(record.date), stored.borrow_date);
        assert_eq!(record.book_title, "Cosmos");
        assert_eq!(record.action, HistoryAction::Borrowed);
    }

    #[tokio::test]
    async fn test_category_filter_parsing() {
        assert_eq!(
            "all".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::All
        );
        assert_eq!(
            CategoryFilter::from("science"),
            CategoryFilter::Only("science".to_string())
        );
        assert!(CategoryFilter::All.matches("anything"));
        assert!(!CategoryFilter::from("science").matches("Science"));
    }

    #[tokio::test]
    async fn test_recent_history_newest_first() {
        let mut library = empty_library().await;
        let book = library
            .add_book("Cosmos", "Carl Sagan", "science")
            .await
            .unwrap();
        library.borrow_book(book.id).await.unwrap();
        library.return_book(book.id).await.unwrap();

        let recent = library.recent_history(None);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, HistoryAction::Returned);
        assert_eq!(recent[1].action, HistoryAction::Borrowed);

        assert_eq!(library.recent_history(Some(1)).len(), 1);
    }

    #[tokio::test]
    async fn test_categories_and_stats() {
        let mut library = empty_library().await;
        let dune = library
            .add_book("Dune", "Frank Herbert", "fiction")
            .await
            .unwrap();
        library
            .add_book("Cosmos", "Carl Sagan", "science")
            .await
            .unwrap();
        library
            .add_book("Emma", "Jane Austen", "fiction")
            .await
            .unwrap();
        library.borrow_book(dune.id).await.unwrap();

        assert_eq!(library.categories(), vec!["fiction", "science"]);
        assert_eq!(
            library.stats(),
            LibraryStats {
                total: 3,
                available: 2,
                borrowed: 1,
                history_entries: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_borrower_option_is_recorded() {
        let options = LibraryOptions {
            borrower: "Ada".to_string(),
            seed_samples: false,
        };
        let mut library = Library::load(Arc::new(MemoryStore::new()), options)
            .await
            .unwrap();
        let book = library
            .add_book("Dune", "Frank Herbert", "fiction")
            .await
            .unwrap();
        library.borrow_book(book.id).await.unwrap();

        let stored = library.get(book.id).unwrap();
        assert_eq!(stored.borrowed_by.as_deref(), Some("Ada"));
    }
}
