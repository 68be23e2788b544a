//! Canonical paths for booklend data.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use booklend::config::{self, paths};
//!
//! let cfg = config::config()?;
//! let books = paths::books_file(&cfg.home);
//! ```
//!
//! ## Layout
//!
//! | Path | Purpose |
//! |------|---------|
//! | `<home>/store/` | Key-value files |
//! | `<home>/store/books.json` | Book list |
//! | `<home>/store/history.json` | Lending history |
//! | `<home>/store/.lock` | Write lock |

use std::path::{Path, PathBuf};

use crate::library::{BOOKS_KEY, HISTORY_KEY};
use crate::store::file::LOCK_FILE;

/// Get the key-value store directory (<home>/store/)
pub fn store_dir(home: &Path) -> PathBuf {
    home.join("store")
}

/// Get the file backing the book list
pub fn books_file(home: &Path) -> PathBuf {
    store_dir(home).join(format!("{}.json", BOOKS_KEY))
}

/// Get the file backing the history list
pub fn history_file(home: &Path) -> PathBuf {
    store_dir(home).join(format!("{}.json", HISTORY_KEY))
}

/// Get the lock file taken during writes
pub fn lock_file(home: &Path) -> PathBuf {
    store_dir(home).join(LOCK_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_store_dir() {
        let home = PathBuf::from("/data/.booklend");

        assert_eq!(store_dir(&home), PathBuf::from("/data/.booklend/store"));
        assert_eq!(books_file(&home), PathBuf::from("/data/.booklend/store/books.json"));
        assert_eq!(history_file(&home), PathBuf::from("/data/.booklend/store/history.json"));
        assert_eq!(lock_file(&home), PathBuf::from("/data/.booklend/store/.lock"));
    }
}
