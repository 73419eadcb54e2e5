//! Store Module
//!
//! In-memory book catalog and loan records behind an explicit store type.

mod book;
mod library;
mod loan;

// Re-export public types
pub use book::Book;
pub use library::LibraryStore;
pub use loan::Loan;
