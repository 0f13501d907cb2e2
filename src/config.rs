//! Configuration management for Librarian

use chrono::{DateTime, Duration, Utc};
use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Validate)]
#[serde(default)]
pub struct LoanConfig {
    #[validate(range(
        min = 1,
        max = 36500,
        message = "Loan duration must be 1 to 36500 days"
    ))]
    pub duration_days: i64,
    #[validate(custom(function = "non_negative"))]
    pub fine_per_day: Decimal,
    pub currency: String,
}

impl LoanConfig {
    /// Due date of a loan issued at `issued_at`
    pub fn due_date(&self, issued_at: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        self.validate()?;
        Duration::try_days(self.duration_days)
            .and_then(|duration| issued_at.checked_add_signed(duration))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Due date out of range for a {} day loan",
                    self.duration_days
                ))
            })
    }
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("Fine per day must not be negative".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub loans: LoanConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables.
    ///
    /// The loan policy is validated here so bad values stop startup.
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Optional base file, then the environment-specific one
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables (with prefix LIBRARIAN_)
            .add_source(
                Environment::with_prefix("LIBRARIAN")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override the data file from LIBRARY_DATA_FILE if present
            .set_override_option("storage.data_file", env::var("LIBRARY_DATA_FILE").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.loans.validate()?;
        Ok(config)
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.logging.format.eq_ignore_ascii_case("json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("library_data.txt"),
        }
    }
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            duration_days: 14,
            fine_per_day: Decimal::from(10),
            currency: "Rs".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
