//! Catalog file load/save behaviour

mod common;

use std::fs;

use chrono::Duration;

use librarian::AppError;

use common::{add_book, issue_time, open_catalog, temp_data_file};

#[test]
fn test_save_then_load_round_trip() {
    let path = temp_data_file();
    let mut catalog = open_catalog(&path);
    add_book(&mut catalog, "Dune", "Herbert", 3);
    add_book(&mut catalog, "Guns, Germs, and Steel", "Jared \"J.\" Diamond", 2);
    add_book(&mut catalog, "Emma", "Austen", 1);
    catalog.issue_book_at("Emma", issue_time()).expect("Failed to issue");
    catalog.issue_book_at("Dune", issue_time()).expect("Failed to issue");
    catalog.save_books().expect("Failed to save");

    let reloaded = open_catalog(&path);
    assert_eq!(reloaded.books(), catalog.books());
    assert!(reloaded.load_diagnostics().is_empty());
    // Loans live in memory only
    assert_eq!(reloaded.loans().count(), 0);
}

#[test]
fn test_missing_row_field_is_skipped_with_diagnostic() {
    let path = temp_data_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "BookID,Title,Author,TotalCopies,AvailableCopies\n\
         1234,Dune,Herbert,3,3\n\
         5678,Emma,Austen,2\n",
    )
    .unwrap();

    let catalog = open_catalog(&path);
    assert_eq!(catalog.books().len(), 1);
    assert_eq!(catalog.books()[0].title, "Dune");
    assert_eq!(catalog.load_diagnostics().len(), 1);
    assert_eq!(catalog.load_diagnostics()[0].line, Some(3));
}

#[test]
fn test_non_numeric_counts_load_as_zero() {
    let path = temp_data_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "BookID,Title,Author,TotalCopies,AvailableCopies\n\
         1234,Dune,Herbert,many,3\n",
    )
    .unwrap();

    let mut catalog = open_catalog(&path);
    let book = &catalog.books()[0];
    assert_eq!((book.total_copies(), book.available_copies()), (0, 0));
    assert!(catalog.load_diagnostics().is_empty());

    let err = catalog.issue_book_at("Dune", issue_time()).unwrap_err();
    assert!(err.is_state_conflict());
}

#[test]
fn test_save_is_full_overwrite() {
    let path = temp_data_file();
    let mut catalog = open_catalog(&path);
    add_book(&mut catalog, "Dune", "Herbert", 1);
    catalog.save_books().expect("Failed to save");

    // Stale content written by something else disappears on the next save
    fs::write(
        &path,
        "BookID,Title,Author,TotalCopies,AvailableCopies\n9999,Ghost,Nobody,1,1\n",
    )
    .unwrap();
    catalog.save_books().expect("Failed to save");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("Ghost"));
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn test_reload_keeps_loans() {
    let path = temp_data_file();
    let mut catalog = open_catalog(&path);
    let id = add_book(&mut catalog, "Dune", "Herbert", 2);
    catalog.issue_book_at("Dune", issue_time()).expect("Failed to issue");
    catalog.save_books().expect("Failed to save");

    catalog.load_books();
    assert_eq!(catalog.find_book(&id).unwrap().available_copies(), 1);
    assert_eq!(
        catalog.loan(&id).map(|l| l.due_at),
        Some(issue_time() + Duration::days(14))
    );
}

#[test]
fn test_save_into_directory_fails_without_panicking() {
    let path = temp_data_file();
    fs::create_dir_all(&path).unwrap();

    let mut catalog = open_catalog(&path);
    assert!(catalog.books().is_empty());
    add_book(&mut catalog, "Dune", "Herbert", 1);

    let err = catalog.save_books().unwrap_err();
    assert!(matches!(err, AppError::Csv(_) | AppError::Io(_)));
    assert!(path.is_dir());
    // The catalog in memory is untouched by the failed save
    assert_eq!(catalog.books().len(), 1);
}
