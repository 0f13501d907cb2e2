//! Error types for Librarian

use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("All copies of '{title}' (ID {id}) are currently checked out")]
    NoCopiesAvailable { id: String, title: String },

    #[error("Cannot return '{title}' (ID {id}): available copies already equal total copies")]
    AlreadyFullyStocked { id: String, title: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    /// Business-rule failures on copy counts, as opposed to lookup misses
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            AppError::NoCopiesAvailable { .. } | AppError::AlreadyFullyStocked { .. }
        )
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
