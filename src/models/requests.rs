//! Request DTOs for the library API
//!
//! Defines the structure of incoming HTTP request bodies. Fields arrive
//! optional and are validated explicitly so a missing field produces a
//! 400 naming it, not a deserialization rejection.

use serde::Deserialize;

use crate::error::{ApiError, Result};

// == Create Book Request ==
/// Request body for POST /books
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookRequest {
    /// Book title
    #[serde(default)]
    pub title: Option<String>,
    /// Book author
    #[serde(default)]
    pub author: Option<String>,
}

impl CreateBookRequest {
    /// Validates the request and returns the trimmed (title, author).
    pub fn validate(&self) -> Result<(String, String)> {
        let title = required_field("title", &self.title)?;
        let author = required_field("author", &self.author)?;
        Ok((title, author))
    }
}

// == Update Book Request ==
/// Request body for PATCH /books/{id}. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl UpdateBookRequest {
    /// Rejects present-but-empty text fields.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.title.as_deref().map(str::trim), Some("")) {
            return Err(ApiError::Validation("'title' must not be empty".to_string()));
        }
        if matches!(self.author.as_deref().map(str::trim), Some("")) {
            return Err(ApiError::Validation("'author' must not be empty".to_string()));
        }
        Ok(())
    }
}

// == Create Loan Request ==
/// Request body for POST /loans (borrow a book)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    /// Book to borrow
    #[serde(default, alias = "book_id")]
    pub book_id: Option<String>,
    /// Borrower name
    #[serde(default)]
    pub user: Option<String>,
}

impl CreateLoanRequest {
    /// Validates the request and returns the trimmed (book_id, user).
    pub fn validate(&self) -> Result<(String, String)> {
        let book_id = required_field("bookId", &self.book_id)?;
        let user = required_field("user", &self.user)?;
        Ok((book_id, user))
    }
}

/// A required string field: present and non-blank after trimming.
fn required_field(name: &str, value: &Option<String>) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::Validation(format!("missing '{}'", name)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_book_deserialize_and_validate() {
        let json = r#"{"title": "Clean Code", "author": "Robert C. Martin"}"#;
        let req: CreateBookRequest = serde_json::from_str(json).unwrap();
        let (title, author) = req.validate().unwrap();
        assert_eq!(title, "Clean Code");
        assert_eq!(author, "Robert C. Martin");
    }

    #[test]
    fn test_create_book_missing_title() {
        let req: CreateBookRequest = serde_json::from_str(r#"{"author": "A"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_create_book_blank_author_rejected() {
        let req: CreateBookRequest =
            serde_json::from_str(r#"{"title": "T", "author": "   "}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_book_all_fields_optional() {
        let req: UpdateBookRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_book_empty_title_rejected() {
        let req: UpdateBookRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_loan_accepts_both_field_spellings() {
        let camel: CreateLoanRequest =
            serde_json::from_str(r#"{"bookId": "b1", "user": "Alice"}"#).unwrap();
        let snake: CreateLoanRequest =
            serde_json::from_str(r#"{"book_id": "b1", "user": "Alice"}"#).unwrap();
        assert_eq!(camel.validate().unwrap(), snake.validate().unwrap());
    }

    #[test]
    fn test_create_loan_missing_book() {
        let req: CreateLoanRequest = serde_json::from_str(r#"{"user": "Alice"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("bookId"));
    }
}
