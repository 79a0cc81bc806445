//! Error types shared by the engine, the store and the binary.

use chrono::NaiveDate;
use thiserror::Error;

/// Input validation failures from a prediction request.
///
/// These are expected, recoverable outcomes; callers render them back to the
/// user rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("product name and manufacture date are both required")]
    MissingInput,

    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("invalid manufacture date: {0}")]
    InvalidDate(String),

    #[error("manufacture date {mfg_date} is later than today ({today})")]
    FutureDate { mfg_date: NaiveDate, today: NaiveDate },
}

impl ValidationError {
    /// Message shown to the person filling in the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingInput => {
                "Please enter both product name and manufacture date."
            }
            ValidationError::UnknownProduct(_) => "Product not found. Try another product.",
            ValidationError::InvalidDate(_) => "Manufacture date is not a valid date.",
            ValidationError::FutureDate { .. } => "Manufacture date cannot be in the future.",
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Persistence error for key {key}: {message}")]
    Persistence { key: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn persistence(key: &str, message: impl std::fmt::Display) -> Self {
        Error::Persistence {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}
