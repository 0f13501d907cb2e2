//! Catalog management service

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::{rngs::StdRng, Rng, SeedableRng};
use validator::Validate;

use crate::{
    config::LoanConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, NewBook},
        loan::{Loan, ReturnOutcome},
    },
    repository::books::{BooksRepository, RowDiagnostic},
};

/// Width of the rule printed around the catalog listing
const RULE_WIDTH: usize = 80;

/// Draw random 4-digit ids until one is not in `existing`.
///
/// Retries without bound, so it only returns once a free id is found.
pub fn generate_book_id<R: Rng + ?Sized>(existing: &HashSet<&str>, rng: &mut R) -> String {
    loop {
        let candidate = rng.gen_range(1000..=9999).to_string();
        if !existing.contains(candidate.as_str()) {
            return candidate;
        }
        tracing::debug!("Book id {} already taken, drawing again", candidate);
    }
}

/// The library catalog: books in insertion order plus active loans
#[derive(Debug)]
pub struct Catalog {
    repository: BooksRepository,
    policy: LoanConfig,
    books: Vec<Book>,
    loans: IndexMap<String, Loan>,
    load_diagnostics: Vec<RowDiagnostic>,
    rng: StdRng,
}

impl Catalog {
    /// Open the catalog stored in `repository`, creating the file if needed
    pub fn open(repository: BooksRepository, policy: LoanConfig) -> Self {
        Self::with_rng(repository, policy, StdRng::from_entropy())
    }

    /// Same as [`Catalog::open`] with a caller-supplied id source
    pub fn with_rng(repository: BooksRepository, policy: LoanConfig, rng: StdRng) -> Self {
        let mut catalog = Self {
            repository,
            policy,
            books: Vec::new(),
            loans: IndexMap::new(),
            load_diagnostics: Vec::new(),
            rng,
        };
        catalog.load_books();
        catalog
    }

    /// Replace the in-memory books with the stored ones.
    ///
    /// Loans are kept; they are not part of the stored file.
    pub fn load_books(&mut self) -> &[RowDiagnostic] {
        let report = self.repository.load();
        self.books = report.books;
        self.load_diagnostics = report.diagnostics;
        &self.load_diagnostics
    }

    /// Rows skipped by the last load
    pub fn load_diagnostics(&self) -> &[RowDiagnostic] {
        &self.load_diagnostics
    }

    /// Overwrite the stored file with the current books
    pub fn save_books(&self) -> AppResult<()> {
        self.repository.save(&self.books)?;
        tracing::info!(
            "Catalog saved: {} book(s) to {}",
            self.books.len(),
            self.repository.path().display()
        );
        Ok(())
    }

    /// Path of the stored catalog file
    pub fn data_file(&self) -> &Path {
        self.repository.path()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    pub fn loan(&self, book_id: &str) -> Option<&Loan> {
        self.loans.get(book_id)
    }

    pub fn count_overdue(&self, now: DateTime<Utc>) -> usize {
        self.loans.values().filter(|loan| loan.is_overdue(now)).count()
    }

    pub fn policy(&self) -> &LoanConfig {
        &self.policy
    }

    /// A random 4-digit id not used by any current book
    pub fn next_id(&mut self) -> String {
        let existing: HashSet<&str> = self.books.iter().map(|b| b.id.as_str()).collect();
        generate_book_id(&existing, &mut self.rng)
    }

    /// Book with exactly this id
    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// First book whose id equals `query` or whose title contains it, ignoring case
    pub fn find_book(&self, query: &str) -> Option<&Book> {
        self.find_index(query).map(|idx| &self.books[idx])
    }

    fn find_index(&self, query: &str) -> Option<usize> {
        self.books.iter().position(|b| b.matches_exact_id_or_title(query))
    }

    /// Every book whose id or title contains `query`, ignoring case
    pub fn search_books(&self, query: &str) -> AppResult<Vec<&Book>> {
        let query = non_empty(query)?;
        Ok(self
            .books
            .iter()
            .filter(|b| b.matches_id_or_title(query))
            .collect())
    }

    /// Add a book under a fresh id with all copies available
    pub fn add_book(&mut self, request: NewBook) -> AppResult<&Book> {
        request.validate()?;
        let copies = u32::try_from(request.copies)
            .map_err(|_| AppError::Validation("Quantity is too large".to_string()))?;

        let id = self.next_id();
        let book = Book::new(id, request.title.trim(), request.author.trim(), copies);
        tracing::info!("Book '{}' added with ID {}", book.title, book.id);

        let idx = self.books.len();
        self.books.push(book);
        Ok(&self.books[idx])
    }

    /// Issue one copy now
    pub fn issue_book(&mut self, query: &str) -> AppResult<Loan> {
        self.issue_book_at(query, Utc::now())
    }

    /// Issue one copy of the first matching book at `now`.
    ///
    /// The new loan replaces any earlier loan recorded for the same id.
    pub fn issue_book_at(&mut self, query: &str, now: DateTime<Utc>) -> AppResult<Loan> {
        let query = non_empty(query)?;
        let idx = self
            .find_index(query)
            .ok_or_else(|| AppError::NotFound(format!("No book matching '{}'", query)))?;
        let due_at = self.policy.due_date(now)?;
        let book = &mut self.books[idx];

        if !book.check_out() {
            return Err(AppError::NoCopiesAvailable {
                id: book.id.clone(),
                title: book.title.clone(),
            });
        }

        let loan = Loan::new(book.id.clone(), now, due_at);
        if let Some(previous) = self.loans.insert(book.id.clone(), loan.clone()) {
            tracing::warn!(
                "Book {} issued again before return; due date {} replaced",
                book.id,
                previous.due_at.format("%Y-%m-%d")
            );
        }
        tracing::info!(
            "Issued '{}' (ID {}), due {}",
            book.title,
            book.id,
            loan.due_at.format("%Y-%m-%d")
        );

        Ok(loan)
    }

    /// Return one copy now
    pub fn return_book(&mut self, query: &str) -> AppResult<ReturnOutcome> {
        self.return_book_at(query, Utc::now())
    }

    /// Return one copy of the first matching book at `now` and compute the fine.
    ///
    /// Without a recorded loan the copy is still put back when possible.
    /// If every copy is already in, the loan stays recorded.
    pub fn return_book_at(&mut self, query: &str, now: DateTime<Utc>) -> AppResult<ReturnOutcome> {
        let query = non_empty(query)?;
        let idx = self
            .find_index(query)
            .ok_or_else(|| AppError::NotFound(format!("No book matching '{}'", query)))?;
        let book = &mut self.books[idx];

        if !self.loans.contains_key(&book.id) {
            let restocked = book.check_in();
            tracing::warn!(
                "Book ID {} was not recorded as issued (copy restocked: {})",
                book.id,
                restocked
            );
            return Ok(ReturnOutcome::Untracked {
                book: book.clone(),
                restocked,
            });
        }

        if !book.check_in() {
            return Err(AppError::AlreadyFullyStocked {
                id: book.id.clone(),
                title: book.title.clone(),
            });
        }

        let loan = self
            .loans
            .shift_remove(&book.id)
            .ok_or_else(|| AppError::NotFound(format!("Loan for book {}", book.id)))?;
        let overdue_days = loan.overdue_days(now);
        let fine = loan.fine(now, self.policy.fine_per_day);
        tracing::info!(
            "Returned '{}' (ID {}), {} day(s) overdue, fine {}",
            book.title,
            book.id,
            overdue_days,
            fine
        );

        Ok(ReturnOutcome::Returned {
            book: book.clone(),
            loan,
            overdue_days,
            fine,
        })
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.books.is_empty() {
            return writeln!(f, "The library catalog is currently empty.");
        }
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(f, "{}", rule)?;
        for book in &self.books {
            writeln!(f, "{}", book)?;
        }
        writeln!(f, "{}", rule)
    }
}

fn non_empty(query: &str) -> AppResult<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Please enter a book ID or title".to_string()));
    }
    Ok(query)
}
