//! Sample books used to populate an empty library.

use crate::domain::{Book, BookId};

/// Categories the sample set covers (four books each)
pub const SAMPLE_CATEGORIES: [&str; 4] = ["fiction", "non-fiction", "science", "history"];

/// (id, title, author, category)
const SAMPLES: [(u64, &str, &str, &str); 16] = [
    (1, "The Great Gatsby", "F. Scott Fitzgerald", "fiction"),
    (2, "1984", "George Orwell", "fiction"),
    (3, "To Kill a Mockingbird", "Harper Lee", "fiction"),
    (4, "Pride and Prejudice", "Jane Austen", "fiction"),
    (5, "Think and Grow Rich", "Napoleon Hill", "non-fiction"),
    (6, "The 7 Habits of Highly Effective People", "Stephen R. Covey", "non-fiction"),
    (7, "Atomic Habits", "James Clear", "non-fiction"),
    (8, "Sapiens: A Brief History of Humankind", "Yuval Noah Harari", "non-fiction"),
    (9, "A Brief History of Time", "Stephen Hawking", "science"),
    (10, "Cosmos", "Carl Sagan", "science"),
    (11, "The Selfish Gene", "Richard Dawkins", "science"),
    (12, "The Double Helix", "James D. Watson", "science"),
    (13, "The World War II", "Winston Churchill", "history"),
    (14, "Guns, Germs, and Steel", "Jared Diamond", "history"),
    (15, "The Rise and Fall of the Third Reich", "William L. Shirer", "history"),
    (16, "A People's History of the United States", "Howard Zinn", "history"),
];

/// Build the 16 sample books, all available
pub fn sample_books() -> Vec<Book> {
    SAMPLES
        .iter()
        .map(|&(id, title, author, category)| Book::new(BookId::new(id), title, author, category))
        .collect()
}
