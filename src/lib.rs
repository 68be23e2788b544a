//! booklend - Local book lending tracker
//!
//! Keeps a catalog of books with borrow/return status and a chronological
//! log of every lending event, persisted to a small key-value store.
//!
//! # Architecture
//!
//! The library state is two lists held in memory:
//! - Books, in creation order, each either available or borrowed
//! - History, an append-only log of borrow/return events
//!
//! Every change rewrites both lists to the store. Borrowing a book that is
//! already out (or returning one that is in) is a no-op.
//!
//! # Modules
//!
//! - `domain`: Data structures (Book, HistoryRecord, ids)
//! - `store`: Key-value persistence (FileStore, MemoryStore)
//! - `library`: The catalog manager and sample data
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Add a book
//! booklend add "Dune" --author "Frank Herbert" --category fiction
//!
//! # Search the catalog
//! booklend list --search dune --category all
//!
//! # Lend it out and bring it back
//! booklend borrow <book-id>
//! booklend return <book-id>
//!
//! # Review what happened
//! booklend history
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod library;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{Book, BookId, BookStatus, HistoryAction, HistoryRecord};
pub use library::{CategoryFilter, LendOutcome, Library, LibraryError, LibraryOptions};
pub use store::{FileStore, KvStore, MemoryStore, StoreError};
