//! Lending history entries.
//!
//! The history is an append-only log; an entry is never edited once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::book::{Book, BookId};

/// A single borrow/return event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// Unique identifier (creation time in milliseconds)
    pub id: u64,

    /// The book this event refers to (weak reference)
    pub book_id: BookId,

    /// Title at the time of the event
    pub book_title: String,

    /// What happened
    pub action: HistoryAction,

    /// When it happened
    pub date: DateTime<Utc>,
}

impl HistoryRecord {
    /// Record an action on `book`, copying its title
    pub fn new(id: u64, book: &Book, action: HistoryAction, date: DateTime<Utc>) -> Self {
        Self {
            id,
            book_id: book.id,
            book_title: book.title.clone(),
            action,
            date,
        }
    }

    /// One-line description, e.g. "Cosmos was borrowed on 2024-03-01"
    pub fn describe(&self) -> String {
        format!(
            "{} was {} on {}",
            self.book_title,
            self.action,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Types of lending actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Borrowed,
    Returned,
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryAction::Borrowed => write!(f, "borrowed"),
            HistoryAction::Returned => write!(f, "returned"),
        }
    }
}
