//! Library Store Module
//!
//! In-memory store owning the book catalog and loan records. Handlers
//! share it behind `Arc<RwLock<LibraryStore>>`; every check-then-act
//! sequence (duplicate guard, borrow, delete-while-loaned) runs inside a
//! single `&mut self` method, so it is atomic with respect to other
//! requests holding the write lock.

use std::collections::HashMap;

use crate::error::{ApiError, Result};
use crate::pagination::Sequenced;
use crate::store::{Book, Loan};

// == Library Store ==
/// Mutable collection of books and loans with store-owned id sequences.
#[derive(Debug, Default)]
pub struct LibraryStore {
    /// Books by public id
    books: HashMap<String, Book>,
    /// Loans by public id
    loans: HashMap<String, Loan>,
    /// Next book sequence number
    next_book: u64,
    /// Next loan sequence number
    next_loan: u64,
}

impl LibraryStore {
    // == Constructor ==
    /// Creates an empty store. Sequences start at 1.
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
            loans: HashMap::new(),
            next_book: 1,
            next_loan: 1,
        }
    }

    // == Seed ==
    /// Loads the demo catalog. Intended for the binary's startup path;
    /// tests build their own fixtures.
    pub fn seed_demo(&mut self) {
        let _ = self.create_book("Clean Code".to_string(), "Robert C. Martin".to_string());
        let _ = self.create_book("The Pragmatic Programmer".to_string(), "Andrew Hunt".to_string());
    }

    // == List Books ==
    /// Returns a snapshot of all books sorted ascending by ordering key.
    ///
    /// Sorting is performed fresh per call; pagination relies on this
    /// order being stable for a fixed set of sequence numbers.
    pub fn list_books(&self) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.values().cloned().collect();
        books.sort_by_key(|b| b.seq());
        books
    }

    // == List Loans ==
    /// Returns a snapshot of all loans sorted ascending by ordering key.
    pub fn list_loans(&self) -> Vec<Loan> {
        let mut loans: Vec<Loan> = self.loans.values().cloned().collect();
        loans.sort_by_key(|l| l.seq());
        loans
    }

    // == Get Book ==
    /// Looks up a book by public id.
    pub fn get_book(&self, id: &str) -> Result<Book> {
        self.books
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("book '{}' does not exist", id)))
    }

    // == Get Loan ==
    /// Looks up a loan by public id.
    pub fn get_loan(&self, id: &str) -> Result<Loan> {
        self.loans
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("loan '{}' does not exist", id)))
    }

    // == Create Book ==
    /// Adds a new book to the catalog.
    ///
    /// Rejects a (title, author) pair that already exists; the catalog
    /// treats that pair as one unique edition.
    pub fn create_book(&mut self, title: String, author: String) -> Result<Book> {
        let duplicate = self
            .books
            .values()
            .any(|b| b.title == title && b.author == author);
        if duplicate {
            return Err(ApiError::Validation(format!(
                "book '{}' by '{}' already exists",
                title, author
            )));
        }

        let seq = self.next_book;
        self.next_book += 1;

        let book = Book::new(seq, title, author);
        self.books.insert(book.id.clone(), book.clone());
        Ok(book)
    }

    // == Update Book ==
    /// Partially updates a book. Absent fields are left untouched.
    /// Bumps the last-modified marker, so the book's fingerprint changes.
    pub fn update_book(
        &mut self,
        id: &str,
        title: Option<String>,
        author: Option<String>,
        available: Option<bool>,
    ) -> Result<Book> {
        let book = self
            .books
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("book '{}' does not exist", id)))?;

        if let Some(title) = title {
            book.title = title;
        }
        if let Some(author) = author {
            book.author = author;
        }
        if let Some(available) = available {
            book.available = available;
        }
        book.touch();

        Ok(book.clone())
    }

    // == Delete Book ==
    /// Removes a book and its loan history.
    ///
    /// Refused while the book has an open loan.
    pub fn delete_book(&mut self, id: &str) -> Result<()> {
        if !self.books.contains_key(id) {
            return Err(ApiError::NotFound(format!("book '{}' does not exist", id)));
        }

        let on_loan = self
            .loans
            .values()
            .any(|l| l.book_id == id && !l.returned);
        if on_loan {
            return Err(ApiError::Conflict(format!(
                "book '{}' is currently on loan",
                id
            )));
        }

        self.loans.retain(|_, l| l.book_id != id);
        self.books.remove(id);
        Ok(())
    }

    // == Borrow Book ==
    /// Creates a loan for an available book.
    ///
    /// The availability check and the mark-unavailable write form one
    /// atomic unit under the caller's write lock: of two concurrent
    /// borrows for the same book, exactly one succeeds and the other
    /// gets a Conflict.
    pub fn borrow_book(&mut self, book_id: &str, user: String) -> Result<Loan> {
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| ApiError::NotFound(format!("book '{}' does not exist", book_id)))?;

        if !book.available {
            return Err(ApiError::Conflict(format!(
                "book '{}' is already on loan",
                book_id
            )));
        }

        book.available = false;
        book.touch();

        let seq = self.next_loan;
        self.next_loan += 1;

        let loan = Loan::new(seq, book_id.to_string(), user);
        self.loans.insert(loan.id.clone(), loan.clone());
        Ok(loan)
    }

    // == Return Loan ==
    /// Marks a loan returned and restores the book's availability.
    ///
    /// Returning an already-returned loan is a no-op that succeeds, so
    /// client retries are harmless.
    pub fn return_loan(&mut self, id: &str) -> Result<Loan> {
        let loan = self
            .loans
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound(format!("loan '{}' does not exist", id)))?;

        if loan.returned {
            return Ok(loan.clone());
        }

        loan.returned = true;
        loan.touch();
        let loan = loan.clone();

        if let Some(book) = self.books.get_mut(&loan.book_id) {
            book.available = true;
            book.touch();
        }

        Ok(loan)
    }

    // == Counts ==
    /// Returns the number of books in the catalog.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Returns the number of loan records.
    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }
}
