//! Loan (issued book) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::book::Book;

/// Active loan, keyed by book id in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub book_id: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

impl Loan {
    pub fn new(
        book_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            issued_at,
            due_at,
        }
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }

    /// Whole days by which `now` is past the due date, 0 when on time
    pub fn overdue_days(&self, now: DateTime<Utc>) -> i64 {
        if self.is_overdue(now) {
            (now - self.due_at).num_days()
        } else {
            0
        }
    }

    /// Flat per-day fine for returning at `now`, never negative
    pub fn fine(&self, now: DateTime<Utc>, fine_per_day: Decimal) -> Decimal {
        Decimal::from(self.overdue_days(now)) * fine_per_day.max(Decimal::ZERO)
    }
}

/// Result of a return
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    /// A tracked loan was closed
    Returned {
        book: Book,
        loan: Loan,
        overdue_days: i64,
        fine: Decimal,
    },
    /// No loan was recorded for the book. `restocked` tells whether a
    /// copy was put back anyway.
    Untracked { book: Book, restocked: bool },
}

impl ReturnOutcome {
    pub fn book(&self) -> &Book {
        match self {
            ReturnOutcome::Returned { book, .. } | ReturnOutcome::Untracked { book, .. } => book,
        }
    }

    /// Fine owed, zero for untracked returns
    pub fn fine(&self) -> Decimal {
        match self {
            ReturnOutcome::Returned { fine, .. } => *fine,
            ReturnOutcome::Untracked { .. } => Decimal::ZERO,
        }
    }
}
