//! Book records and their lending state.
//!
//! A book is created `available` and alternates between `available` and
//! `borrowed` for the rest of its life. Books are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback cover used for any id outside the fixed table
const DEFAULT_COVER: &str = "https://images.unsplash.com/photo-1541963463532-d68292c34b19";

/// Cover images keyed by book id (the 16 sample books)
const COVERS: [(u64, &str); 16] = [
    (1, "https://images.unsplash.com/photo-1541963463532-d68292c34b19"),
    (2, "https://images.unsplash.com/photo-1589829085413-56de8ae18c73"),
    (3, "https://images.unsplash.com/photo-1544931170-3ca1337cce88"),
    (4, "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c"),
    (5, "https://images.unsplash.com/photo-1532012197267-da84d127e765"),
    (6, "https://images.unsplash.com/photo-1541963463532-d68292c34b19"),
    (7, "https://images.unsplash.com/photo-1532094349884-543bc11b234d"),
    (8, "https://images.unsplash.com/photo-1505664194779-8beaceb93744"),
    (9, "https://images.unsplash.com/photo-1532012197267-da84d127e765"),
    (10, "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c"),
    (11, "https://images.unsplash.com/photo-1589829085413-56de8ae18c73"),
    (12, "https://images.unsplash.com/photo-1544931170-3ca1337cce88"),
    (13, "https://images.unsplash.com/photo-1541963463532-d68292c34b19"),
    (14, "https://images.unsplash.com/photo-1532012197267-da84d127e765"),
    (15, "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c"),
    (16, "https://images.unsplash.com/photo-1505664194779-8beaceb93744"),
];

/// Book identifier (creation time in milliseconds, or 1-16 for samples)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw integer value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BookId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self)
    }
}

/// Lending status of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// On the shelf
    #[default]
    Available,

    /// Lent out
    Borrowed,
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookStatus::Available => write!(f, "available"),
            BookStatus::Borrowed => write!(f, "borrowed"),
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,

    pub title: String,

    pub author: String,

    pub category: String,

    #[serde(default)]
    pub status: BookStatus,

    /// Who holds the book (set only while borrowed)
    #[serde(default)]
    pub borrowed_by: Option<String>,

    /// Start of the most recent borrow cycle
    #[serde(default)]
    pub borrow_date: Option<DateTime<Utc>>,

    /// End of the most recent borrow cycle (overwritten each cycle)
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,

    /// Display-only cover reference
    #[serde(default)]
    pub cover_url: String,
}

impl Book {
    /// Create an available book with its cover derived from the id
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: category.into(),
            status: BookStatus::Available,
            borrowed_by: None,
            borrow_date: None,
            return_date: None,
            cover_url: cover_for(id).to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    pub fn is_borrowed(&self) -> bool {
        self.status == BookStatus::Borrowed
    }

    /// Mark the book as lent to `borrower` at `at`.
    ///
    /// Callers must check availability first; this does not.
    pub(crate) fn mark_borrowed(&mut self, borrower: &str, at: DateTime<Utc>) {
        self.status = BookStatus::Borrowed;
        self.borrowed_by = Some(borrower.to_string());
        self.borrow_date = Some(at);
    }

    /// Mark the book as back on the shelf at `at`.
    ///
    /// `borrow_date` is kept so the last cycle can still be displayed.
    pub(crate) fn mark_returned(&mut self, at: DateTime<Utc>) {
        self.status = BookStatus::Available;
        self.borrowed_by = None;
        self.return_date = Some(at);
    }

    /// Whether the lending fields agree with the status
    pub fn is_consistent(&self) -> bool {
        match self.status {
            BookStatus::Borrowed => self.borrowed_by.is_some() && self.borrow_date.is_some(),
            BookStatus::Available => self.borrowed_by.is_none(),
        }
    }

    /// Case-insensitive substring match on title or author.
    ///
    /// `term_lower` must already be lowercased. An empty term matches everything.
    pub fn matches_term(&self, term_lower: &str) -> bool {
        term_lower.is_empty()
            || self.title.to_lowercase().contains(term_lower)
            || self.author.to_lowercase().contains(term_lower)
    }
}

/// Look up the cover for a book id
pub fn cover_for(id: BookId) -> &'static str {
    COVERS
        .iter()
        .find(|(key, _)| *key == id.get())
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_COVER)
}
