//! Librarian - Library Catalog Manager
//!
//! A single-user catalog of books and their copy counts, with checkout,
//! return and overdue fines, persisted to a comma-delimited text file.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Catalog;
