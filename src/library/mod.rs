//! Book catalog and lending management.
//!
//! The library keeps every book and every borrow/return event, and saves
//! both after each change.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.booklend/
//! └── store/
//!     ├── books.json      # Array of books, creation order
//!     ├── history.json    # Array of lending events, oldest first
//!     └── .lock           # Held while a value is being written
//! ```

pub mod catalog;
pub mod seed;

pub use catalog::{
    CategoryFilter, LendOutcome, Library, LibraryError, LibraryOptions, LibraryStats,
    ALL_CATEGORIES, BOOKS_KEY, DEFAULT_BORROWER, HISTORY_KEY,
};
pub use seed::{sample_books, SAMPLE_CATEGORIES};
