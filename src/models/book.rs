//! Book (catalog record) model and related types

use std::fmt;

use serde::Serialize;
use validator::Validate;

/// A catalog entry: one title and its copy counts.
///
/// `available_copies` never exceeds `total_copies`; the counts only move
/// through [`Book::check_out`] and [`Book::check_in`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    #[serde(rename = "BookID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: String,
    #[serde(rename = "TotalCopies")]
    total_copies: u32,
    #[serde(rename = "AvailableCopies")]
    available_copies: u32,
}

impl Book {
    /// Create a freshly acquired book with every copy on the shelf
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        copies: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            total_copies: copies,
            available_copies: copies,
        }
    }

    /// Build a book from untrusted text fields (e.g. a stored row).
    ///
    /// Counts that fail to parse, are negative, or break
    /// `available <= total` degrade to `(0, 0)` instead of failing.
    pub fn from_fields(id: &str, title: &str, author: &str, total: &str, available: &str) -> Self {
        let counts = match (total.trim().parse::<u32>(), available.trim().parse::<u32>()) {
            (Ok(total), Ok(available)) if available <= total => Some((total, available)),
            _ => None,
        };

        let (total_copies, available_copies) = counts.unwrap_or_else(|| {
            tracing::warn!(
                "Book {}: unusable copy counts (total={:?}, available={:?}), zeroing",
                id, total, available
            );
            (0, 0)
        });

        Self {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            total_copies,
            available_copies,
        }
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    /// Number of copies currently out
    pub fn checked_out_copies(&self) -> u32 {
        self.total_copies - self.available_copies
    }

    /// Take one copy off the shelf. Returns `false` when none are left.
    pub fn check_out(&mut self) -> bool {
        if self.available_copies > 0 {
            self.available_copies -= 1;
            true
        } else {
            false
        }
    }

    /// Put one copy back. Returns `false` when every copy is already in.
    pub fn check_in(&mut self) -> bool {
        if self.available_copies < self.total_copies {
            self.available_copies += 1;
            true
        } else {
            false
        }
    }

    /// Case-insensitive exact id match or title substring match
    pub fn matches_exact_id_or_title(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.id.to_lowercase() == query || self.title.to_lowercase().contains(&query)
    }

    /// Case-insensitive substring match on id or title
    pub fn matches_id_or_title(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.id.to_lowercase().contains(&query) || self.title.to_lowercase().contains(&query)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:<5} | Title: {:<30} | Author: {:<20} | Total: {:<3} | Available: {:<3}",
            self.id, self.title, self.author, self.total_copies, self.available_copies
        )
    }
}

/// Add book request
#[derive(Debug, Clone, Validate)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[validate(range(min = 1, message = "Quantity must be a positive number"))]
    pub copies: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_out_then_in_restores() {
        let mut book = Book::new("1234", "Dune", "Herbert", 2);
        assert!(book.check_out());
        assert_eq!(book.available_copies(), 1);
        assert!(book.check_in());
        assert_eq!(book.available_copies(), 2);
    }

    #[test]
    fn test_check_out_exhausted_is_noop() {
        let mut book = Book::new("1234", "Dune", "Herbert", 1);
        assert!(book.check_out());
        assert!(!book.check_out());
        assert_eq!(book.available_copies(), 0);
        assert_eq!(book.checked_out_copies(), 1);
    }

    #[test]
    fn test_check_in_full_is_noop() {
        let mut book = Book::new("1234", "Dune", "Herbert", 1);
        assert!(!book.check_in());
        assert_eq!(book.available_copies(), 1);
    }

    // Unparseable counts are zeroed rather than rejected.
    #[test]
    fn test_from_fields_degrades_bad_counts() {
        let book = Book::from_fields("1", "Dune", "Herbert", "three", "2");
        assert_eq!((book.total_copies(), book.available_copies()), (0, 0));

        let book = Book::from_fields("1", "Dune", "Herbert", "-1", "0");
        assert_eq!((book.total_copies(), book.available_copies()), (0, 0));

        let book = Book::from_fields("1", "Dune", "Herbert", "2", "5");
        assert_eq!((book.total_copies(), book.available_copies()), (0, 0));

        let book = Book::from_fields("1", "Dune", "Herbert", " 3 ", "2");
        assert_eq!((book.total_copies(), book.available_copies()), (3, 2));
    }

    #[test]
    fn test_matching() {
        let book = Book::new("1234", "The Lord of the Rings", "Tolkien", 1);
        assert!(book.matches_id_or_title("lord"));
        assert!(book.matches_id_or_title("23"));
        assert!(book.matches_exact_id_or_title("LORD"));
        assert!(book.matches_exact_id_or_title("1234"));
        assert!(!book.matches_exact_id_or_title("23"));
    }

    #[test]
    fn test_display_layout() {
        let book = Book::new("1234", "Dune", "Herbert", 3);
        assert_eq!(
            book.to_string(),
            format!(
                "ID: 1234  | Title: {:<30} | Author: {:<20} | Total: 3   | Available: 3  ",
                "Dune", "Herbert"
            )
        );
    }

    #[test]
    fn test_new_book_validation() {
        let request = NewBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            copies: 0,
        };
        assert!(request.validate().is_err());
        let request = NewBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            copies: 3,
        };
        assert!(request.validate().is_ok());
    }
}
