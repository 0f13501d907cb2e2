//! Data models for Librarian

pub mod book;
pub mod loan;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use loan::{Loan, ReturnOutcome};
