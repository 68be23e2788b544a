//! Domain types for the lending tracker.
//!
//! This module contains the core data structures:
//! - Book: A catalog entry and its lending state
//! - HistoryRecord: Immutable records of borrow/return events
//! - IdGenerator: Time-based id allocation

pub mod book;
pub mod history;
pub mod ids;

// Re-export commonly used types
pub use book::{cover_for, Book, BookId, BookStatus};
pub use history::{HistoryAction, HistoryRecord};
pub use ids::IdGenerator;
