//! Book Entity Module
//!
//! Defines the book record managed by the library store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pagination::Sequenced;

// == Book ==
/// A book in the library catalog.
///
/// `seq` is the monotonic ordering key used by pagination; `id` is the
/// stable public identifier derived from it. `updated_at` is the
/// last-modified marker feeding content fingerprints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Public identifier ("b{seq}")
    pub id: String,
    /// Monotonic ordering key
    pub seq: u64,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Whether the book can currently be borrowed
    pub available: bool,
    /// Last-modified marker
    pub updated_at: DateTime<Utc>,
}

impl Book {
    // == Constructor ==
    /// Creates a new available book with the given sequence number.
    pub fn new(seq: u64, title: String, author: String) -> Self {
        Self {
            id: format!("b{}", seq),
            seq,
            title,
            author,
            available: true,
            updated_at: Utc::now(),
        }
    }

    // == Touch ==
    /// Bumps the last-modified marker.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Sequenced for Book {
    fn seq(&self) -> u64 {
        self.seq
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_new() {
        let book = Book::new(7, "Clean Code".to_string(), "Robert C. Martin".to_string());
        assert_eq!(book.id, "b7");
        assert_eq!(book.seq, 7);
        assert!(book.available);
    }

    #[test]
    fn test_book_touch_advances_marker() {
        let mut book = Book::new(1, "t".to_string(), "a".to_string());
        let before = book.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(5));
        book.touch();
        assert!(book.updated_at > before);
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book::new(1, "t".to_string(), "a".to_string());
        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"available\":true"));
    }
}
