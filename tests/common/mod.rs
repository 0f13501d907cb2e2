//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use librarian::{
    config::LoanConfig, models::NewBook, repository::BooksRepository, Catalog,
};
use rand::{rngs::StdRng, SeedableRng};

/// Fresh data file path in its own temporary directory
pub fn temp_data_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("librarian-it-{}", uuid::Uuid::new_v4()))
        .join("library_data.txt")
}

pub fn open_catalog(path: &PathBuf) -> Catalog {
    Catalog::with_rng(
        BooksRepository::new(path.clone()),
        LoanConfig::default(),
        StdRng::seed_from_u64(42),
    )
}

pub fn add_book(catalog: &mut Catalog, title: &str, author: &str, copies: i64) -> String {
    catalog
        .add_book(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            copies,
        })
        .expect("Failed to add book")
        .id
        .clone()
}

pub fn issue_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 9, 30, 0).unwrap()
}
