//! Error types
//!
//! Fatal errors for parsing, unit conversion, aggregation and the food database client.
//! Non-fatal parse problems live in [`crate::models::ParseIssue`].

use thiserror::Error;

/// Fatal error for a whole parse call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Input too large: {bytes} bytes / {lines} lines (limit {max_bytes} bytes / {max_lines} lines)")]
    InputTooLarge {
        bytes: usize,
        lines: usize,
        max_bytes: usize,
        max_lines: usize,
    },
}

/// A single quantity/unit could not be converted to grams
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("Unknown unit '{unit}' for ingredient '{ingredient}'")]
    UnknownUnit { ingredient: String, unit: String },
}

/// Errors that make an aggregation result meaningless
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    #[error("Total ingredient weight is zero")]
    ZeroWeight,

    #[error("Invalid yield multiplier {0} (must be > 0 and <= 2)")]
    InvalidYield(f64),

    #[error("Invalid serving size {0} g (must be > 0)")]
    InvalidServingSize(f64),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Result type for nutrition calculations
pub type NutritionResult<T> = Result<T, NutritionError>;

/// Food database collaborator errors
#[derive(Debug, Error)]
pub enum FoodDatabaseError {
    #[error("Food database is not configured (set NUTRILABEL_FDC_API_KEY)")]
    NotConfigured,

    #[error("Food database request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Food database returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Food {0} not found")]
    NotFound(String),

    #[error("Could not decode food database response: {0}")]
    Decode(String),

    #[error("Lookup task failed: {0}")]
    Task(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
