//! Business logic services

pub mod catalog;

pub use catalog::{generate_book_id, Catalog};
