//! Repository layer for catalog file storage

pub mod books;

pub use books::{BooksRepository, LoadReport, RowDiagnostic, HEADER};
