//! Loan Entity Module
//!
//! Defines the loan record tracking a borrowed book.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pagination::Sequenced;

// == Loan ==
/// A loan of one book to one borrower.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Public identifier ("l{seq}")
    pub id: String,
    /// Monotonic ordering key
    pub seq: u64,
    /// Borrowed book id
    pub book_id: String,
    /// Borrower name
    pub user: String,
    /// Whether the book has been returned
    pub returned: bool,
    /// Last-modified marker
    pub updated_at: DateTime<Utc>,
}

impl Loan {
    // == Constructor ==
    /// Creates a new open loan with the given sequence number.
    pub fn new(seq: u64, book_id: String, user: String) -> Self {
        Self {
            id: format!("l{}", seq),
            seq,
            book_id,
            user,
            returned: false,
            updated_at: Utc::now(),
        }
    }

    // == Touch ==
    /// Bumps the last-modified marker.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Sequenced for Loan {
    fn seq(&self) -> u64 {
        self.seq
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_new() {
        let loan = Loan::new(3, "b1".to_string(), "Alice".to_string());
        assert_eq!(loan.id, "l3");
        assert_eq!(loan.book_id, "b1");
        assert!(!loan.returned);
    }

    #[test]
    fn test_loan_serializes_camel_case() {
        let loan = Loan::new(1, "b1".to_string(), "Alice".to_string());
        let json = serde_json::to_string(&loan).unwrap();
        assert!(json.contains("\"bookId\":\"b1\""));
        assert!(json.contains("\"returned\":false"));
    }
}
